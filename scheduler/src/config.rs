use serde::Serialize;

/// How processes arriving at the same instant are ordered in the ready queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TieBreak {
    /// Keep the order of the input.
    #[default]
    InputOrder,
    /// Lowest pid first.
    Pid,
}

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Maximum number of time units a process runs before it is preempted.
    pub quantum: usize,
    /// Ordering of simultaneous arrivals.
    pub tie_break: TieBreak,
    /// Reject an empty process set instead of producing an empty run.
    pub require_processes: bool,
}

impl Config {
    pub fn new(quantum: usize) -> Self {
        Config {
            quantum,
            ..Config::default()
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_require_processes(mut self, require_processes: bool) -> Self {
        self.require_processes = require_processes;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quantum: 2,
            tie_break: TieBreak::InputOrder,
            require_processes: false,
        }
    }
}
