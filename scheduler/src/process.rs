use serde::Serialize;

use crate::error::{Error, ProcessFault, Result};
use crate::{Pid, ProcessState};

/// One process as supplied by the caller, before validation.
///
/// The fields are signed so that malformed input can be reported
/// instead of silently wrapped or clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessSpec {
    pub pid: i64,
    pub arrival_time: i64,
    pub burst_time: i64,
}

impl ProcessSpec {
    pub fn new(pid: i64, arrival_time: i64, burst_time: i64) -> Self {
        ProcessSpec {
            pid,
            arrival_time,
            burst_time,
        }
    }
}

impl From<(i64, i64, i64)> for ProcessSpec {
    fn from((pid, arrival_time, burst_time): (i64, i64, i64)) -> Self {
        ProcessSpec::new(pid, arrival_time, burst_time)
    }
}

/// A validated process record.
///
/// The pid, arrival and burst times are fixed. The remaining fields are
/// only changed by the scheduler that owns the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    pid: Pid,
    arrival_time: usize,
    burst_time: usize,
    remaining_time: usize,
    first_dispatch_time: Option<usize>,
    completion_time: Option<usize>,
    state: ProcessState,
}

impl Process {
    /// Validates a [`ProcessSpec`].
    ///
    /// Duplicate pids can only be detected over the whole set, see
    /// [`crate::RoundRobin::new`].
    pub fn from_spec(spec: ProcessSpec) -> Result<Process> {
        let invalid = |fault| Error::InvalidProcess {
            pid: spec.pid,
            fault,
        };

        let pid = usize::try_from(spec.pid)
            .ok()
            .and_then(Pid::new)
            .ok_or_else(|| invalid(ProcessFault::NonPositivePid))?;
        let arrival_time = usize::try_from(spec.arrival_time)
            .map_err(|_| invalid(ProcessFault::NegativeArrival(spec.arrival_time)))?;
        let burst_time = usize::try_from(spec.burst_time)
            .ok()
            .filter(|burst| *burst > 0)
            .ok_or_else(|| invalid(ProcessFault::NonPositiveBurst(spec.burst_time)))?;

        Ok(Process {
            pid,
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            first_dispatch_time: None,
            completion_time: None,
            state: ProcessState::Pending,
        })
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn arrival_time(&self) -> usize {
        self.arrival_time
    }

    pub fn burst_time(&self) -> usize {
        self.burst_time
    }

    pub fn remaining_time(&self) -> usize {
        self.remaining_time
    }

    /// The first time the process was given the CPU.
    pub fn first_dispatch_time(&self) -> Option<usize> {
        self.first_dispatch_time
    }

    pub fn completion_time(&self) -> Option<usize> {
        self.completion_time
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == ProcessState::Completed
    }

    pub(crate) fn admit(&mut self) {
        debug_assert_eq!(self.state, ProcessState::Pending);
        self.state = ProcessState::Ready;
    }

    /// Marks the process as running at `now`.
    pub(crate) fn dispatch(&mut self, now: usize) {
        debug_assert_eq!(self.state, ProcessState::Ready);
        debug_assert!(now >= self.arrival_time);
        self.state = ProcessState::Running;
        self.first_dispatch_time.get_or_insert(now);
    }

    /// Accounts `amount` units of CPU time, ending at `now`.
    ///
    /// The process either completes or goes back to the ready state.
    pub(crate) fn execute(&mut self, amount: usize, now: usize) -> ProcessState {
        debug_assert_eq!(self.state, ProcessState::Running);
        debug_assert!(amount <= self.remaining_time);
        self.remaining_time -= amount;
        if self.remaining_time == 0 {
            self.completion_time = Some(now);
            self.state = ProcessState::Completed;
        } else {
            self.state = ProcessState::Ready;
        }
        self.state
    }
}
