//! A processor simulation library
//!
//! This is used for driving a scheduler from the [`scheduler`] crate to
//! completion while recording what it did at every iteration, and for the
//! pieces around a simulation: the input file format, random test cases
//! and the final report.

use std::fmt::{self, Display};

use log::info;
use scheduler::{
    Pid, Process, ProcessState, Scheduler, SchedulingDecision, Simulation, Stop,
};

pub mod generate;
pub mod input;
mod report;

pub use report::{format_averages, Report};

/// Running iteration log
#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    /// The simulated time at which the decision was taken.
    pub clock: usize,

    /// The action requested by the scheduler.
    pub decision: SchedulingDecision,

    /// What happened to the dispatched process.
    pub stop: Option<Stop>,

    /// The ready queue right after the decision, front first.
    pub ready: Vec<Pid>,

    /// The process records right after the decision, in input order.
    pub processes: Vec<ProcessInfo>,
}

impl Display for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "t={}: {}", self.clock, self.decision)?;
        writeln!(f, "PID\tSTATE\tARRIVAL\tBURST\tREMAIN\tFIRST\tDONE")?;
        for process in &self.processes {
            writeln!(f, "{}", process)?;
        }
        let ready = self
            .ready
            .iter()
            .map(Pid::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(f, "READY [{}]", ready)?;
        if let Some(stop) = self.stop {
            writeln!(f, "{}", stop)?;
        }
        Ok(())
    }
}

/// Information about a process state.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    /// The PID of the process.
    pub pid: Pid,

    /// The process state.
    pub state: ProcessState,

    pub arrival_time: usize,
    pub burst_time: usize,
    pub remaining_time: usize,
    pub first_dispatch_time: Option<usize>,
    pub completion_time: Option<usize>,
}

impl From<&Process> for ProcessInfo {
    fn from(process: &Process) -> Self {
        ProcessInfo {
            pid: process.pid(),
            state: process.state(),
            arrival_time: process.arrival_time(),
            burst_time: process.burst_time(),
            remaining_time: process.remaining_time(),
            first_dispatch_time: process.first_dispatch_time(),
            completion_time: process.completion_time(),
        }
    }
}

fn optional(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

impl Display for ProcessInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.pid,
            self.state,
            self.arrival_time,
            self.burst_time,
            self.remaining_time,
            optional(self.first_dispatch_time),
            optional(self.completion_time)
        )
    }
}

/// The processor simulator.
pub struct Processor<S: Scheduler> {
    scheduler: S,
    logs: Vec<Log>,
}

impl<S: Scheduler> Processor<S> {
    /// Runs a scheduler until it has nothing left to schedule.
    ///
    /// * `scheduler` - the scheduler to use for the simulation.
    ///
    /// Returns the final simulation and one [`Log`] per iteration.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use processor::Processor;
    ///
    /// let specs: [(i64, i64, i64); 2] = [(1, 0, 3), (2, 1, 2)];
    /// let scheduler = scheduler::round_robin(specs, 2).unwrap();
    /// let (simulation, logs) = Processor::run(scheduler);
    ///
    /// assert_eq!(simulation.end_time, 5);
    /// assert_eq!(logs.len(), 4);
    /// ```
    pub fn run(scheduler: S) -> (Simulation, Vec<Log>) {
        let mut processor = Processor {
            scheduler,
            logs: vec![],
        };

        while processor.step() {}

        let Processor { scheduler, logs } = processor;
        let simulation = scheduler.into_simulation();
        info!(
            "simulation finished at {} after {} iterations, {} slices",
            simulation.end_time,
            logs.len(),
            simulation.trace.len()
        );
        (simulation, logs)
    }

    /// Performs one iteration, returns `false` once the scheduler is done.
    fn step(&mut self) -> bool {
        let clock = self.scheduler.clock();
        let decision = self.scheduler.next();
        let ready = self.scheduler.ready();
        let processes = self
            .scheduler
            .processes()
            .iter()
            .map(ProcessInfo::from)
            .collect();

        let stop = match decision {
            SchedulingDecision::Run { .. } => self.scheduler.stop(),
            SchedulingDecision::Idle(_) | SchedulingDecision::Done => None,
        };

        self.logs.push(Log {
            clock,
            decision,
            stop,
            ready,
            processes,
        });
        decision != SchedulingDecision::Done
    }
}

/// Format the [`Processor`]'s logs to a [`String`].
///
/// * `logs` - the logs returned by the [`Processor`].
pub fn format_logs(logs: &[Log]) -> String {
    let mut s = String::new();
    for (iteration, log) in logs.iter().enumerate() {
        // writing to a String cannot fail
        let _ = fmt::write(
            &mut s,
            format_args!("===== Iteration: {} =====\n{}\n", iteration + 1, log),
        );
    }
    s
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use pretty_assertions::assert_eq;
    use scheduler::{round_robin, StopReason};

    use super::*;

    fn pid(pid: usize) -> Pid {
        Pid::new(pid).unwrap()
    }

    #[test]
    fn logs_every_iteration() {
        let specs: [(i64, i64, i64); 2] = [(1, 0, 2), (2, 4, 1)];
        let (simulation, logs) = Processor::run(round_robin(specs, 2).unwrap());

        let decisions = logs.iter().map(|log| log.decision).collect::<Vec<_>>();
        assert_eq!(
            decisions,
            vec![
                SchedulingDecision::Run {
                    pid: pid(1),
                    start: 0,
                    timeslice: NonZeroUsize::new(2).unwrap()
                },
                SchedulingDecision::Idle(NonZeroUsize::new(2).unwrap()),
                SchedulingDecision::Run {
                    pid: pid(2),
                    start: 4,
                    timeslice: NonZeroUsize::new(1).unwrap()
                },
                SchedulingDecision::Done,
            ]
        );
        assert_eq!(logs[0].stop.map(|stop| stop.reason), Some(StopReason::Completed));
        assert_eq!(logs[1].stop, None);
        assert_eq!(logs[2].clock, 4);
        assert_eq!(simulation.end_time, 5);
    }

    #[test]
    fn snapshot_is_taken_after_the_decision() {
        let specs: [(i64, i64, i64); 2] = [(1, 0, 3), (2, 0, 1)];
        let (_, logs) = Processor::run(round_robin(specs, 2).unwrap());

        assert_eq!(logs[0].processes[0].state, ProcessState::Running);
        assert_eq!(logs[0].processes[1].state, ProcessState::Ready);
        assert_eq!(logs[0].ready, vec![pid(2)]);
    }

    #[test]
    fn format_log() {
        let specs: [(i64, i64, i64); 1] = [(7, 1, 3)];
        let (_, logs) = Processor::run(round_robin(specs, 2).unwrap());

        assert_eq!(
            logs[0].to_string(),
            "t=1: Run 7 at 1 for 2 units\n\
             PID\tSTATE\tARRIVAL\tBURST\tREMAIN\tFIRST\tDONE\n\
             7\tRUNNING\t1\t3\t3\t1\t-\n\
             READY []\n\
             Expired 7 [1, 3)\n"
        );
        assert!(format_logs(&logs).starts_with("===== Iteration: 1 =====\nt=1: Run 7"));
    }
}
