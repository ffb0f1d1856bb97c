//! Link maintenance and propagation passes.

use std::collections::{BTreeMap, BTreeSet};

use super::Document;
use cellgraph_engine::engine::{CellError, CellId, CellValue, evaluate, substitute_references};

/// Cells whose display changed during one pass, in notification order.
#[derive(Debug, Default)]
pub(crate) struct Changes {
    ids: Vec<CellId>,
}

impl Changes {
    pub(crate) fn mark(&mut self, id: CellId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub(crate) fn into_ids(self) -> Vec<CellId> {
        self.ids
    }
}

impl Document {
    /// Replace a cell's subjects, updating each affected observer set.
    pub(crate) fn rewire(&mut self, id: CellId, subjects: BTreeSet<CellId>) {
        let Some(cell) = self.grid.get_mut(&id) else {
            return;
        };
        let old = std::mem::take(&mut cell.subjects);

        for added in subjects.difference(&old) {
            if let Some(subject) = self.grid.get_mut(added) {
                subject.observers.insert(id);
            }
        }
        for removed in old.difference(&subjects) {
            if let Some(subject) = self.grid.get_mut(removed) {
                subject.observers.remove(&id);
            }
        }

        if let Some(cell) = self.grid.get_mut(&id) {
            cell.subjects = subjects;
        }
    }

    /// Compute a cell's value from its formula and current subject values.
    ///
    /// A subject in error passes its error on without evaluating.
    pub(crate) fn compute(&self, id: CellId) -> CellValue {
        let Some(cell) = self.grid.get(&id) else {
            return CellValue::Error(CellError::MalformedExpression);
        };

        let upstream = cell
            .subjects
            .iter()
            .filter_map(|s| self.grid.get(s))
            .find_map(|s| match s.value {
                CellValue::Error(e) => Some(e),
                CellValue::Number(_) => None,
            });
        if let Some(err) = upstream {
            return CellValue::Error(err);
        }

        let expression = substitute_references(&cell.formula, |r| {
            self.grid.get(&r).and_then(|c| c.value.as_number())
        });
        match evaluate(&expression) {
            Ok(n) => CellValue::Number(n),
            Err(e) => {
                tracing::debug!(cell = %id, error = %e, "formula failed");
                CellValue::Error(CellError::from(&e))
            }
        }
    }

    /// Store a value, returning whether it differs from the previous one.
    pub(crate) fn store_value(&mut self, id: CellId, value: CellValue) -> bool {
        match self.grid.get_mut(&id) {
            Some(cell) if cell.value != value => {
                cell.value = value;
                true
            }
            _ => false,
        }
    }

    /// Every cell that transitively reads `origin`, excluding `origin` itself.
    pub(crate) fn transitive_observers(&self, origin: CellId) -> BTreeSet<CellId> {
        let mut found = BTreeSet::new();
        let mut stack = vec![origin];
        while let Some(current) = stack.pop() {
            let Some(cell) = self.grid.get(&current) else {
                continue;
            };
            for &obs in &cell.observers {
                if obs != origin && found.insert(obs) {
                    stack.push(obs);
                }
            }
        }
        found
    }

    /// Recompute everything downstream of `origin`.
    pub(crate) fn propagate_from(&mut self, origin: CellId, changes: &mut Changes) {
        let affected = self.transitive_observers(origin);
        tracing::trace!(cell = %origin, dependents = affected.len(), "propagating");
        self.recompute_in_order(affected, changes);
    }

    /// Recompute `affected` in dependency order, each cell at most once.
    ///
    /// A cell becomes ready once none of its subjects are still pending.
    /// Cells that never become ready sit on, or downstream of, a cycle and
    /// are marked as such without evaluating.
    pub(crate) fn recompute_in_order(&mut self, affected: BTreeSet<CellId>, changes: &mut Changes) {
        let mut pending: BTreeMap<CellId, usize> = affected
            .iter()
            .map(|&id| {
                let waiting = self
                    .grid
                    .get(&id)
                    .map(|c| c.subjects.iter().filter(|s| affected.contains(s)).count())
                    .unwrap_or(0);
                (id, waiting)
            })
            .collect();
        let mut ready: BTreeSet<CellId> = pending
            .iter()
            .filter(|(_, waiting)| **waiting == 0)
            .map(|(id, _)| *id)
            .collect();

        while let Some(id) = ready.pop_first() {
            pending.remove(&id);
            let value = self.compute(id);
            if self.store_value(id, value) {
                changes.mark(id);
            }

            let observers = match self.grid.get(&id) {
                Some(cell) => cell.observers.clone(),
                None => continue,
            };
            for obs in observers {
                if let Some(waiting) = pending.get_mut(&obs) {
                    debug_assert!(*waiting > 0, "observer {} counted twice", obs);
                    *waiting = waiting.saturating_sub(1);
                    if *waiting == 0 {
                        ready.insert(obs);
                    }
                }
            }
        }

        for id in pending.into_keys() {
            tracing::debug!(cell = %id, "unresolved dependency, marking cyclic");
            if self.store_value(id, CellValue::Error(CellError::CyclicDependency)) {
                changes.mark(id);
            }
        }
    }

    /// Invoke every listener once per changed cell.
    pub(crate) fn notify(&mut self, changes: &Changes) {
        if self.listeners.is_empty() {
            return;
        }
        for id in &changes.ids {
            let Some(cell) = self.grid.get(id) else {
                continue;
            };
            let display = cell.display();
            for listener in self.listeners.iter_mut() {
                listener(*id, &display);
            }
        }
    }
}
