use std::collections::HashMap;

/// Predicate and combinator calls.
pub const CALLS: &str = "calls";
/// Retries of the frame on top of the stack.
pub const RETRIES: &str = "retries";
pub const FRAMES_PUSHED: &str = "frames_pushed";
/// Frames removed with their trail span undone.
pub const FRAMES_POPPED: &str = "frames_popped";
/// Frames removed while keeping their bindings.
pub const FRAMES_RETIRED: &str = "frames_retired";
/// Trail entries recorded by unification.
pub const BINDINGS: &str = "bindings";
pub const BINDINGS_UNDONE: &str = "bindings_undone";
/// Frames discarded by `Once`.
pub const COMMITS: &str = "commits";
/// Deepest call stack seen.
pub const MAX_DEPTH: &str = "max_depth";

/// Named counters maintained by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    counters: HashMap<&'static str, u64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, name: &'static str) -> u64 {
        self.increment_by(name, 1)
    }

    pub fn increment_by(&mut self, name: &'static str, amount: u64) -> u64 {
        let entry = self.counters.entry(name).or_insert(0);
        *entry += amount;
        *entry
    }

    /// Raise a counter to `value` if it is currently lower.
    pub fn record_max(&mut self, name: &'static str, value: u64) {
        let entry = self.counters.entry(name).or_insert(0);
        *entry = (*entry).max(value);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.counters.get(name).copied()
    }

    pub fn reset(&mut self, name: &str) {
        self.counters.remove(name);
    }

    pub fn clear(&mut self) {
        self.counters.clear();
    }
}
