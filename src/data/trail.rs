use super::{Term, Var};

/// Trail entry recording a variable's binding slot before it was changed.
#[derive(Clone, Debug)]
pub struct TrailEntry {
    pub variable: Var,
    pub previous: Option<Term>,
}

/// Trail stack used to undo bindings on backtracking.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    entries: Vec<TrailEntry>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `variable`'s current value. Must be called immediately before
    /// the variable's binding slot is changed.
    pub fn record(&mut self, variable: &Var) {
        self.entries.push(TrailEntry {
            variable: variable.clone(),
            previous: variable.binding(),
        });
    }

    /// Restore bindings in LIFO order until only `mark` entries remain.
    ///
    /// Returns the number of entries undone.
    pub fn backtrack(&mut self, mark: usize) -> usize {
        let mut undone = 0;
        while self.entries.len() > mark {
            if let Some(entry) = self.entries.pop() {
                entry.variable.restore(entry.previous);
                undone += 1;
            }
        }
        undone
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
