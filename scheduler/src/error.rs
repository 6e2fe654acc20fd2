use thiserror::Error;

use crate::Pid;

/// Why a process record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProcessFault {
    #[error("pid must be a positive integer")]
    NonPositivePid,
    #[error("pid is used by another process")]
    DuplicatePid,
    #[error("arrival time {0} is negative")]
    NegativeArrival(i64),
    #[error("burst time {0} is not positive")]
    NonPositiveBurst(i64),
    #[error("the run would last past the largest representable time")]
    TimeOverflow,
}

/// Errors raised by the scheduling core.
///
/// Everything except [`Error::EmptyQueue`] and [`Error::Incomplete`] is
/// reported while building a scheduler, before any simulated time passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid process {pid}: {fault}")]
    InvalidProcess { pid: i64, fault: ProcessFault },

    #[error("invalid quantum {0}: the quantum must be positive")]
    InvalidQuantum(usize),

    #[error("no processes to schedule")]
    EmptyInput,

    #[error("the ready queue is empty")]
    EmptyQueue,

    #[error("process {pid} has not completed")]
    Incomplete { pid: Pid },
}

pub type Result<T> = std::result::Result<T, Error>;
