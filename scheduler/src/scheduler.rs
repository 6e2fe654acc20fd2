use std::fmt::{self, Display};
use std::num::NonZeroUsize;

use serde::Serialize;

use crate::process::Process;
use crate::trace::{ExecutionTrace, Slice};

/// The PID of a process
///
/// The PID cannot be 0, PIDs start from 1.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Ord, PartialOrd, Serialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Pid(NonZeroUsize);

impl Pid {
    /// Returns `None` for 0.
    pub fn new(pid: usize) -> Option<Pid> {
        NonZeroUsize::new(pid).map(Pid)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl PartialEq<usize> for Pid {
    fn eq(&self, other: &usize) -> bool {
        self.0.get() == *other
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The action that the scheduler asks the CPU to take.
///
/// This is returned by the [`Scheduler::next`] function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum SchedulingDecision {
    /// Run the process with PID `pid`, starting at `start`, for exactly
    /// `timeslice` time units.
    ///
    /// The timeslice is the quantum, or the remaining burst of the process
    /// when that is shorter.
    Run {
        pid: Pid,
        start: usize,
        timeslice: NonZeroUsize,
    },

    /// Nothing is ready to run. The clock has jumped forward by the given
    /// amount, up to the next arrival.
    Idle(NonZeroUsize),

    /// Every process has completed.
    Done,
}

impl Display for SchedulingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingDecision::Run {
                pid,
                start,
                timeslice,
            } => {
                write!(f, "Run {} at {} for {} units", pid, start, timeslice)
            }
            SchedulingDecision::Idle(amount) => {
                write!(f, "Idle for {} units", amount)
            }
            SchedulingDecision::Done => {
                write!(f, "Done, no more processes")
            }
        }
    }
}

/// The reason that the running process left the CPU.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The timeslice has expired and the process was placed back at the
    /// end of the ready queue, behind anything that arrived meanwhile.
    Expired,

    /// The process used up its burst and left the system.
    Completed,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Expired => write!(f, "Expired"),
            StopReason::Completed => write!(f, "Completed"),
        }
    }
}

/// What happened to the process that was running when
/// [`Scheduler::stop`] was called.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Stop {
    /// The interval the process has just occupied the CPU for.
    pub slice: Slice,

    pub reason: StopReason,
}

impl Display for Stop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.reason, self.slice.pid, self.slice)
    }
}

/// The state of a process.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ProcessState {
    /// The process has not arrived yet, or has arrived but was not
    /// admitted into the ready queue yet.
    Pending,

    /// The process is in the ready queue.
    Ready,

    /// The process is currently scheduled.
    Running,

    /// The process has finished and will never be scheduled again.
    Completed,
}

impl Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessState::Pending => write!(f, "PENDING"),
            ProcessState::Ready => write!(f, "READY"),
            ProcessState::Running => write!(f, "RUNNING"),
            ProcessState::Completed => write!(f, "DONE"),
        }
    }
}

/// The result of driving a scheduler until every process completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    /// The process records, in input order.
    pub processes: Vec<Process>,

    /// The CPU occupancy intervals, in dispatch order.
    pub trace: ExecutionTrace,

    /// The clock value when the last process completed.
    pub end_time: usize,
}

/// The trait that a single CPU scheduler has to implement.
///
/// A simulation step is split in two: [`Scheduler::next`] picks what the
/// CPU does, [`Scheduler::stop`] tells the scheduler that the dispatched
/// process has used its timeslice.
pub trait Scheduler: Send {
    /// Returns the action that the CPU has to perform next.
    fn next(&mut self) -> SchedulingDecision;

    /// Runs the dispatched process for its timeslice and reports why it left
    /// the CPU.
    ///
    /// Returns `None` if no process is running.
    fn stop(&mut self) -> Option<Stop>;

    /// The current simulated time.
    fn clock(&self) -> usize;

    /// Returns the process records, in input order.
    fn processes(&self) -> &[Process];

    /// Returns the PIDs of the ready queue, front first.
    fn ready(&self) -> Vec<Pid>;

    /// Returns the execution trace accumulated so far.
    fn trace(&self) -> &ExecutionTrace;

    /// Consumes the scheduler, returning its records and trace.
    fn into_simulation(self) -> Simulation
    where
        Self: Sized;

    /// Drives the scheduler until it returns [`SchedulingDecision::Done`].
    fn run(mut self) -> Simulation
    where
        Self: Sized,
    {
        loop {
            match self.next() {
                SchedulingDecision::Run { .. } => {
                    self.stop();
                }
                SchedulingDecision::Idle(_) => {}
                SchedulingDecision::Done => break,
            }
        }
        self.into_simulation()
    }
}
