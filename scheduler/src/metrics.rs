//! Waiting and response time statistics of a completed run.
//!
//! Totals are kept as integers and averages as exact ratios; conversion to
//! floating point only happens when a caller asks for it, for display.

use num::rational::Ratio;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::{Pid, Process};

/// Timing figures of one completed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub arrival_time: usize,
    pub burst_time: usize,
    pub first_dispatch_time: usize,
    pub completion_time: usize,
    /// From arrival to first dispatch.
    pub response_time: usize,
    /// Time spent ready but not running.
    pub waiting_time: usize,
    /// From arrival to completion.
    pub turnaround_time: usize,
}

impl ProcessMetrics {
    pub fn new(process: &Process) -> Result<ProcessMetrics> {
        let incomplete = Error::Incomplete { pid: process.pid() };
        let (Some(first_dispatch_time), Some(completion_time)) =
            (process.first_dispatch_time(), process.completion_time())
        else {
            return Err(incomplete);
        };

        let turnaround_time = completion_time - process.arrival_time();
        Ok(ProcessMetrics {
            pid: process.pid(),
            arrival_time: process.arrival_time(),
            burst_time: process.burst_time(),
            first_dispatch_time,
            completion_time,
            response_time: first_dispatch_time - process.arrival_time(),
            waiting_time: turnaround_time - process.burst_time(),
            turnaround_time,
        })
    }
}

/// Aggregate waiting and response times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub count: u64,
    pub total_waiting_time: u64,
    pub total_response_time: u64,
}

impl Summary {
    /// Builds a summary from `(response_time, waiting_time)` pairs.
    ///
    /// Totals saturate at `u64::MAX`.
    pub fn from_samples<I>(samples: I) -> Summary
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        samples
            .into_iter()
            .fold(Summary::default(), |summary, (response, waiting)| Summary {
                count: summary.count.saturating_add(1),
                total_waiting_time: summary.total_waiting_time.saturating_add(waiting as u64),
                total_response_time: summary
                    .total_response_time
                    .saturating_add(response as u64),
            })
    }

    /// The exact average waiting time, zero when there are no samples.
    pub fn average_waiting_time(&self) -> Ratio<u64> {
        self.average(self.total_waiting_time)
    }

    /// The exact average response time, zero when there are no samples.
    pub fn average_response_time(&self) -> Ratio<u64> {
        self.average(self.total_response_time)
    }

    fn average(&self, total: u64) -> Ratio<u64> {
        if self.count == 0 {
            Ratio::from_integer(0)
        } else {
            Ratio::new(total, self.count)
        }
    }
}

/// Converts an exact average for display.
pub fn to_f64(ratio: Ratio<u64>) -> f64 {
    *ratio.numer() as f64 / *ratio.denom() as f64
}

/// Per-process metrics, in input order, and their summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub processes: Vec<ProcessMetrics>,
    pub summary: Summary,
}

impl Metrics {
    /// Fails if any of the processes has not completed.
    pub fn compute(processes: &[Process]) -> Result<Metrics> {
        let processes = processes
            .iter()
            .map(ProcessMetrics::new)
            .collect::<Result<Vec<_>>>()?;
        let summary = Summary::from_samples(
            processes
                .iter()
                .map(|metrics| (metrics.response_time, metrics.waiting_time)),
        );

        Ok(Metrics { processes, summary })
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|metrics| metrics.pid == pid)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Config, ProcessSpec, RoundRobin, Scheduler};

    fn simulate(specs: &[(i64, i64, i64)], quantum: usize) -> Vec<Process> {
        RoundRobin::new(
            specs.iter().copied().map(ProcessSpec::from),
            Config::new(quantum),
        )
        .unwrap()
        .run()
        .processes
    }

    #[test]
    fn three_processes() {
        let metrics = Metrics::compute(&simulate(&[(1, 0, 5), (2, 1, 3), (3, 2, 1)], 2)).unwrap();

        let times = metrics
            .processes
            .iter()
            .map(|m| (m.pid.get(), m.response_time, m.waiting_time))
            .collect::<Vec<_>>();
        assert_eq!(times, vec![(1, 0, 4), (2, 1, 4), (3, 2, 2)]);

        assert_eq!(metrics.summary.average_response_time(), Ratio::new(1, 1));
        assert_eq!(metrics.summary.average_waiting_time(), Ratio::new(10, 3));
        assert_eq!(format!("{:.2}", to_f64(metrics.summary.average_waiting_time())), "3.33");
    }

    #[test]
    fn single_process() {
        let metrics = Metrics::compute(&simulate(&[(1, 0, 4)], 10)).unwrap();
        let pid = Pid::new(1).unwrap();

        assert_eq!(metrics.get(pid).unwrap().response_time, 0);
        assert_eq!(metrics.get(pid).unwrap().waiting_time, 0);
        assert_eq!(metrics.get(pid).unwrap().turnaround_time, 4);
    }

    #[test]
    fn no_processes() {
        let metrics = Metrics::compute(&[]).unwrap();

        assert!(metrics.processes.is_empty());
        assert_eq!(metrics.summary.average_waiting_time(), Ratio::from_integer(0));
        assert_eq!(to_f64(metrics.summary.average_response_time()), 0.0);
    }

    #[test]
    fn incomplete_process() {
        let process = Process::from_spec(ProcessSpec::new(5, 0, 1)).unwrap();
        assert_eq!(
            Metrics::compute(&[process]),
            Err(Error::Incomplete {
                pid: Pid::new(5).unwrap()
            })
        );
    }

    #[test]
    fn compute_is_repeatable() {
        let processes = simulate(&[(1, 0, 7), (2, 2, 3), (3, 2, 4), (4, 9, 1)], 3);

        assert_eq!(
            Metrics::compute(&processes).unwrap(),
            Metrics::compute(&processes).unwrap()
        );
    }

    #[test]
    fn summary_from_samples() {
        let summary = Summary::from_samples([(1, 2), (3, 4), (0, 0), (2, 1)]);

        assert_eq!(summary.count, 4);
        assert_eq!(summary.total_response_time, 6);
        assert_eq!(summary.total_waiting_time, 7);
        assert_eq!(summary.average_response_time(), Ratio::new(3, 2));
        assert_eq!(to_f64(summary.average_waiting_time()), 1.75);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn summary_saturates() {
        let summary = Summary::from_samples([(usize::MAX, usize::MAX), (1, usize::MAX)]);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_response_time, u64::MAX);
        assert_eq!(summary.total_waiting_time, u64::MAX);
        assert_eq!(summary.average_waiting_time(), Ratio::new(u64::MAX, 2));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn longest_run_metrics() {
        let processes = simulate(&[(1, 0, i64::MAX), (2, 0, i64::MAX)], usize::MAX);
        let metrics = Metrics::compute(&processes).unwrap();

        assert_eq!(metrics.processes[1].waiting_time, usize::MAX / 2);
        assert_eq!(metrics.summary.total_waiting_time, u64::MAX / 2);
        assert_eq!(metrics.summary.total_response_time, u64::MAX / 2);
    }
}
