//! Reads the results of the online process scheduling solver.
//!
//! The input is the text obtained by selecting and copying the whole solver
//! page after it computed a Round-Robin schedule. Two parts of it are used:
//! the Gantt chart, one token per line (process names and times), and the
//! result table, one row per process ending with its waiting time.
//!
//! The same chart can also be read from the page saved as HTML, see
//! [`html`].
//!
//! The adapter knows nothing about the simulation engine; it only reuses the
//! [`Summary`] of the metrics so that both sides can be compared.

use std::collections::HashSet;
use std::fmt::{self, Display};

use log::{debug, warn};
use regex::Regex;
use scheduler::Summary;
use thiserror::Error;

pub mod html;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("the solver output is not for the Round-Robin algorithm")]
    NotRoundRobin,
    #[error("could not find {0} in the solver output")]
    MissingSection(&'static str),
    #[error("invalid token in the Gantt chart: {0:?}")]
    InvalidToken(String),
    #[error("malformed table row: {0:?}")]
    MalformedRow(String),
    #[error("process {0} is in the table but never ran in the Gantt chart")]
    UnknownPid(String),
    #[error("process {0} runs before it arrives")]
    RunsBeforeArrival(String),
    #[error("invalid selector: {0}")]
    Selector(String),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// One cell of the Gantt chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Process(String),
    Idle,
}

impl Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Process(pid) => write!(f, "{}", pid),
            Slot::Idle => write!(f, "_"),
        }
    }
}

/// The Gantt chart: slot `i` runs from `times[i]` to `times[i + 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GanttChart {
    pub slots: Vec<Slot>,
    pub times: Vec<usize>,
}

impl GanttChart {
    /// The process names of the non-idle slots, in chart order.
    pub fn pids(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Process(pid) => Some(pid.as_str()),
                Slot::Idle => None,
            })
            .collect()
    }

    /// The start of the first slot of `pid`.
    pub fn first_execution(&self, pid: &str) -> Option<usize> {
        self.slots
            .iter()
            .zip(&self.times)
            .find(|(slot, _)| matches!(slot, Slot::Process(name) if name == pid))
            .map(|(_, &time)| time)
    }
}

/// The times of one process, as reported by the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTimes {
    pub pid: String,
    pub arrival_time: usize,
    pub first_exec_time: usize,
    pub waiting_time: usize,
}

impl ProcessTimes {
    pub fn response_time(&self) -> usize {
        self.first_exec_time - self.arrival_time
    }
}

/// Everything extracted from one solver page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverRun {
    pub chart: GanttChart,
    /// In table order.
    pub processes: Vec<ProcessTimes>,
}

impl SolverRun {
    pub fn summary(&self) -> Summary {
        Summary::from_samples(
            self.processes
                .iter()
                .map(|times| (times.response_time(), times.waiting_time)),
        )
    }
}

/// Whether "Round-Robin, RR" was the selected algorithm.
pub fn is_round_robin(text: &str) -> Result<bool> {
    Ok(Regex::new(r"(?m)^Round-Robin, RR$")?.is_match(text))
}

/// The number of processes, from the `Average` row of the table.
///
/// ```text
/// Average	5587 / 30 = 186.233	5284 / 30 = 176.133
/// ```
pub fn num_processes(text: &str) -> Result<usize> {
    Regex::new(r"(?m)^Average\s+\d+ / (\d+).+$")?
        .captures(text)
        .and_then(|captures| captures[1].parse().ok())
        .ok_or(SolverError::MissingSection("the Average table row"))
}

/// Splits the page into the Gantt chart part and the table rows.
pub fn split_sections(text: &str) -> Result<(&str, &str)> {
    let header = Regex::new(r"(?m)^Gantt Chart$")?
        .find(text)
        .ok_or(SolverError::MissingSection("the Gantt Chart header"))?;
    let text = &text[header.end()..];

    let average = Regex::new(r"(?m)^Average.+$")?
        .find(text)
        .ok_or(SolverError::MissingSection("the Average table row"))?;
    let text = &text[..average.start()];

    let table_header = Regex::new(r"(?m)^Job.+$")?
        .find(text)
        .ok_or(SolverError::MissingSection("the table header"))?;

    Ok((&text[..table_header.start()], &text[table_header.end()..]))
}

/// Parses the Gantt chart tokens.
///
/// Processes are named `A` to `Z`, then `10`, `11`, ... when there are more
/// than 26 of them. Such a number is a process name when it is not greater
/// than the last time seen, since times never decrease. A time repeated
/// where the chart wraps to a new row is only kept once.
pub fn parse_gantt_chart(chart: &str, num_entries: usize) -> Result<GanttChart> {
    let numeric_pids = (0..num_entries.saturating_sub(26))
        .map(|offset| (10 + offset).to_string())
        .collect::<HashSet<_>>();

    let mut parsed = GanttChart::default();
    for token in chart.lines().map(str::trim).filter(|token| !token.is_empty()) {
        if numeric_pids.contains(token) {
            let value = token.parse::<usize>().ok();
            if parsed.times.last().copied() >= value {
                parsed.slots.push(Slot::Process(token.to_string()));
                continue;
            }
        }

        if token == "_" {
            parsed.slots.push(Slot::Idle);
        } else if token.chars().all(|c| c.is_ascii_alphabetic()) {
            parsed.slots.push(Slot::Process(token.to_string()));
        } else if let Ok(time) = token.parse::<usize>() {
            if parsed.times.last() != Some(&time) {
                parsed.times.push(time);
            }
        } else {
            return Err(SolverError::InvalidToken(token.to_string()));
        }
    }

    debug!(
        "gantt chart: {} slots, {} times",
        parsed.slots.len(),
        parsed.times.len()
    );
    Ok(parsed)
}

/// Joins the table rows with the first execution times from the chart.
///
/// A row is `pid arrival ... waiting`, whitespace separated.
pub fn process_times(chart: &GanttChart, table: &str) -> Result<Vec<ProcessTimes>> {
    table
        .lines()
        .filter(|row| !row.trim().is_empty())
        .map(|row| {
            let malformed = || SolverError::MalformedRow(row.to_string());
            let tokens = row.split_whitespace().collect::<Vec<_>>();
            let [pid, arrival, .., waiting] = tokens[..] else {
                return Err(malformed());
            };

            let arrival_time = arrival.parse::<usize>().map_err(|_| malformed())?;
            let waiting_time = waiting.parse::<usize>().map_err(|_| malformed())?;
            let first_exec_time = chart
                .first_execution(pid)
                .ok_or_else(|| SolverError::UnknownPid(pid.to_string()))?;
            if first_exec_time < arrival_time {
                return Err(SolverError::RunsBeforeArrival(pid.to_string()));
            }

            Ok(ProcessTimes {
                pid: pid.to_string(),
                arrival_time,
                first_exec_time,
                waiting_time,
            })
        })
        .collect()
}

/// Parses a whole solver page.
pub fn parse(text: &str) -> Result<SolverRun> {
    if !is_round_robin(text)? {
        return Err(SolverError::NotRoundRobin);
    }

    let (chart, table) = split_sections(text)?;
    let num_entries = num_processes(text)?;
    let chart = parse_gantt_chart(chart, num_entries)?;
    let processes = process_times(&chart, table)?;

    if processes.len() != num_entries {
        warn!(
            "the Average row counts {} processes, the table has {}",
            num_entries,
            processes.len()
        );
    }

    Ok(SolverRun { chart, processes })
}
