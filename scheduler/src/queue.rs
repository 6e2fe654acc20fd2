use std::collections::VecDeque;

use crate::error::{Error, Result};

/// The ready queue.
///
/// A FIFO of process references: dequeued from the front, enqueued at the
/// back. Ordering policy (who gets enqueued first) belongs to the caller, and
/// so does making sure an item is queued at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyQueue<T> {
    queue: VecDeque<T>,
}

impl<T> ReadyQueue<T> {
    pub fn new() -> Self {
        ReadyQueue {
            queue: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn push_back(&mut self, item: T) {
        self.queue.push_back(item);
    }

    /// Enqueues every item, keeping their relative order.
    pub fn push_back_many<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.push_back(item);
        }
    }

    pub fn pop_front(&mut self) -> Result<T> {
        self.queue.pop_front().ok_or(Error::EmptyQueue)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.iter()
    }
}

impl<T> Default for ReadyQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
