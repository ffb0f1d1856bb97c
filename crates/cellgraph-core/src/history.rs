//! Undo history.
//!
//! Every accepted edit pushes the edited cell's prior formula and value.
//! Undo pops the newest entry; each entry is consumed exactly once.

use cellgraph_engine::engine::{Cell, CellId, CellValue};

/// A cell's state as it was before an edit.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub cell: CellId,
    pub value: CellValue,
    pub formula: String,
}

impl Snapshot {
    pub fn of(cell: &Cell) -> Snapshot {
        Snapshot {
            cell: cell.id,
            value: cell.value,
            formula: cell.formula.clone(),
        }
    }
}

/// Stack of snapshots, newest last.
#[derive(Clone, Debug, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
    limit: Option<usize>,
}

impl History {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` entries, dropping the oldest.
    pub fn with_limit(limit: Option<usize>) -> Self {
        History {
            snapshots: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
        if let Some(limit) = self.limit {
            if self.snapshots.len() > limit {
                let excess = self.snapshots.len() - limit;
                self.snapshots.drain(..excess);
            }
        }
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
