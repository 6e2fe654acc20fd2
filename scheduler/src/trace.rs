use std::fmt::{self, Display};

use serde::Serialize;

use crate::Pid;

/// A continuous run of one process on the CPU, covering `[start, end)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub pid: Pid,
    pub start: usize,
    pub end: usize,
}

impl Slice {
    pub fn duration(&self) -> usize {
        self.end - self.start
    }
}

impl Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The Gantt sequence of a simulation, one [`Slice`] per dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExecutionTrace {
    slices: Vec<Slice>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, slice: Slice) {
        debug_assert!(slice.start < slice.end);
        debug_assert!(self.slices.last().map_or(true, |last| last.end <= slice.start));
        self.slices.push(slice);
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slice> {
        self.slices.iter()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Total CPU time given to `pid`.
    pub fn busy_time(&self, pid: Pid) -> usize {
        self.iter()
            .filter(|slice| slice.pid == pid)
            .map(Slice::duration)
            .sum()
    }

    /// The start of the first slice of `pid`.
    pub fn first_start(&self, pid: Pid) -> Option<usize> {
        self.iter()
            .find(|slice| slice.pid == pid)
            .map(|slice| slice.start)
    }

    /// The order in which processes were dispatched.
    pub fn pids(&self) -> Vec<Pid> {
        self.iter().map(|slice| slice.pid).collect()
    }
}

impl<'a> IntoIterator for &'a ExecutionTrace {
    type Item = &'a Slice;
    type IntoIter = std::slice::Iter<'a, Slice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}
