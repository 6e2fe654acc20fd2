//! A single CPU scheduling simulator.
//!
//! This library validates a fixed set of processes, simulates them under
//! preemptive Round-Robin on integer time units and computes waiting and
//! response times from the result.
//!
//! ```
//! use scheduler::{round_robin, Metrics, Scheduler};
//!
//! let specs: [(i64, i64, i64); 3] = [(1, 0, 5), (2, 1, 3), (3, 2, 1)];
//! let simulation = round_robin(specs, 2).unwrap().run();
//! let metrics = Metrics::compute(&simulation.processes).unwrap();
//!
//! assert_eq!(simulation.trace.len(), 6);
//! assert_eq!(metrics.summary.total_waiting_time, 10);
//! ```

mod config;
mod error;
pub mod metrics;
mod process;
mod queue;
mod scheduler;
mod schedulers;
mod trace;

pub use crate::config::{Config, TieBreak};
pub use crate::error::{Error, ProcessFault, Result};
pub use crate::metrics::{Metrics, ProcessMetrics, Summary};
pub use crate::process::{Process, ProcessSpec};
pub use crate::queue::ReadyQueue;
pub use crate::scheduler::{
    Pid, ProcessState, Scheduler, SchedulingDecision, Simulation, Stop, StopReason,
};
pub use crate::schedulers::RoundRobin;
pub use crate::trace::{ExecutionTrace, Slice};

/// Returns a Round-Robin scheduler with the default configuration and the
/// given quantum.
///
/// * `specs` - the processes, in input order
/// * `quantum` - the time units a process can run before it is preempted
pub fn round_robin<I>(specs: I, quantum: usize) -> Result<RoundRobin>
where
    I: IntoIterator,
    I::Item: Into<ProcessSpec>,
{
    RoundRobin::new(specs, Config::new(quantum))
}

/// Validates the input and runs it to completion under `config`.
pub fn simulate<I>(specs: I, config: Config) -> Result<Simulation>
where
    I: IntoIterator,
    I::Item: Into<ProcessSpec>,
{
    Ok(RoundRobin::new(specs, config)?.run())
}
