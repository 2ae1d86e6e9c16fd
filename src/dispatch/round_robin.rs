// src/dispatch/round_robin.rs
use crate::dispatch::BackendSet;

/// Cycle position over a backend set. One instance per run; the position
/// is never shared.
pub struct RoundRobinCycle<'a> {
    backends: &'a [String],
    position: usize,
}

impl<'a> RoundRobinCycle<'a> {
    pub fn new(backends: &'a BackendSet) -> Self {
        Self {
            backends: backends.as_slice(),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Current target, then advance by exactly one step.
    pub fn select_backend(&mut self) -> &'a str {
        let target = &self.backends[self.position];
        self.position = (self.position + 1) % self.backends.len();
        target
    }
}

impl<'a> Iterator for RoundRobinCycle<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        Some(self.select_backend())
    }
}
