use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Board and score as they were before a committed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub score: u64,
}

/// Undo stack. Unbounded unless a limit is given, in which case the oldest
/// snapshot is dropped to make room.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<Snapshot>,
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        History {
            entries: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.limit == Some(0) {
            return;
        }
        self.entries.push_back(snapshot);
        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                self.entries.pop_front();
            }
        }
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
