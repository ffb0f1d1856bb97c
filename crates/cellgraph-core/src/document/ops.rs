use std::collections::BTreeSet;

use super::Document;
use super::recalc::Changes;
use crate::error::{Result, SheetError};
use crate::history::Snapshot;
use cellgraph_engine::engine::{
    CellError, CellId, CellValue, extract_references, find_cycle, normalize_formula,
};

impl Document {
    /// Replace a cell's formula and bring every dependent up to date.
    ///
    /// Blank input becomes the default formula. Input equal to the current
    /// formula is ignored. Otherwise the prior state is pushed onto the undo
    /// history, links are rewired, and the cell plus its transitive dependents
    /// are recomputed before this returns. Formula faults and cycles are
    /// stored on the affected cells as [`CellValue::Error`].
    ///
    /// Returns the ids passed to listeners, in notification order.
    pub fn apply_edit(&mut self, id: CellId, input: &str) -> Result<Vec<CellId>> {
        let formula = normalize_formula(input);
        let cell = self.grid.get(&id).ok_or(SheetError::UnknownCell(id))?;
        if cell.formula == formula {
            tracing::trace!(cell = %id, "formula unchanged, skipping edit");
            return Ok(Vec::new());
        }

        tracing::debug!(cell = %id, formula = %formula, "applying edit");
        self.history.push(Snapshot::of(cell));

        let subjects = self.resolve_subjects(&formula);
        self.rewire(id, subjects);
        if let Some(cell) = self.grid.get_mut(&id) {
            cell.formula = formula;
        }

        let value = match find_cycle(id, &self.grid) {
            Some(path) => {
                let path: Vec<String> = path.iter().map(CellId::to_string).collect();
                tracing::warn!(cell = %id, cycle = %path.join(" -> "), "cyclic dependency");
                CellValue::Error(CellError::CyclicDependency)
            }
            None => self.compute(id),
        };

        // The formula changed, so the edited cell is always re-rendered.
        let mut changes = Changes::default();
        self.store_value(id, value);
        changes.mark(id);
        self.propagate_from(id, &mut changes);
        Ok(self.finish_pass(changes))
    }

    /// Restore the most recently edited cell to its prior formula and value.
    ///
    /// Link sets are left as they are; only dependents are recomputed. Undoing
    /// an edit that changed which cells a formula references therefore leaves
    /// the links describing the newer formula.
    ///
    /// Returns the restored cell, or [`SheetError::EmptyHistory`] without
    /// touching anything when there is nothing to undo.
    pub fn undo(&mut self) -> Result<CellId> {
        let snapshot = self.history.pop().ok_or(SheetError::EmptyHistory)?;
        let id = snapshot.cell;
        let cell = self.grid.get_mut(&id).ok_or(SheetError::UnknownCell(id))?;

        let mut changes = Changes::default();
        if cell.formula != snapshot.formula || cell.value != snapshot.value {
            changes.mark(id);
        }
        tracing::debug!(cell = %id, formula = %snapshot.formula, "undo");
        cell.formula = snapshot.formula;
        cell.value = snapshot.value;

        self.propagate_from(id, &mut changes);
        self.finish_pass(changes);
        Ok(id)
    }

    /// Re-derive every cell's links from its formula, then recompute every
    /// cell in dependency order.
    ///
    /// This repairs links left behind by [`Document::undo`]. Cells on a
    /// cycle, or reading from one, end up as `Error(CyclicDependency)`.
    /// Returns the ids passed to listeners.
    pub fn recalculate_all(&mut self) -> Vec<CellId> {
        let all: BTreeSet<CellId> = self.grid.keys().copied().collect();
        for &id in &all {
            let Some(cell) = self.grid.get(&id) else {
                continue;
            };
            let subjects = self.resolve_subjects(&cell.formula);
            if subjects != cell.subjects {
                tracing::debug!(cell = %id, "relinking");
                self.rewire(id, subjects);
            }
        }

        let mut changes = Changes::default();
        self.recompute_in_order(all, &mut changes);
        self.finish_pass(changes)
    }

    /// References in `formula` that name existing cells.
    fn resolve_subjects(&self, formula: &str) -> BTreeSet<CellId> {
        extract_references(formula)
            .into_iter()
            .filter(|r| self.grid.contains_key(r))
            .collect()
    }

    fn finish_pass(&mut self, changes: Changes) -> Vec<CellId> {
        debug_assert!(self.links_consistent(), "subject/observer links out of sync");
        self.notify(&changes);
        changes.into_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::config::SheetConfig;
    use crate::error::SheetError;
    use cellgraph_engine::engine::{CellError, CellId, CellValue};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn id(name: &str) -> CellId {
        CellId::from_str(name).unwrap()
    }

    fn doc() -> Document {
        Document::with_config(&SheetConfig::default()).unwrap()
    }

    fn value(doc: &Document, name: &str) -> CellValue {
        doc.display(id(name)).unwrap().value
    }

    fn number(doc: &Document, name: &str) -> f64 {
        value(doc, name).as_number().unwrap()
    }

    #[test]
    fn test_with_config_creates_named_cells() {
        let doc = doc();
        let names: String = doc.cell_ids().map(|c| c.letter()).collect();
        assert_eq!(names, "ABCDEFGHI");
        assert_eq!(doc.display(id("A")).unwrap().formula, "0.0");
        assert_eq!(value(&doc, "A"), CellValue::Number(0.0));
    }

    #[test]
    fn test_create_cell_rejects_duplicates() {
        let mut doc = Document::new();
        doc.create_cell(id("A")).unwrap();
        assert_eq!(doc.create_cell(id("A")), Err(SheetError::DuplicateCell(id("A"))));
    }

    #[test]
    fn test_edit_unknown_cell() {
        let mut doc = doc();
        assert_eq!(
            doc.apply_edit(id("Z"), "1"),
            Err(SheetError::UnknownCell(id("Z")))
        );
        assert_eq!(doc.history_len(), 0);
    }

    #[test]
    fn test_chain_of_dependents() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "10").unwrap();
        doc.apply_edit(id("B"), "A 2 *").unwrap();
        doc.apply_edit(id("C"), "A B *").unwrap();
        assert_eq!(number(&doc, "A"), 10.0);
        assert_eq!(number(&doc, "B"), 20.0);
        assert_eq!(number(&doc, "C"), 200.0);

        let changed = doc.apply_edit(id("A"), "1").unwrap();
        assert_eq!(changed, vec![id("A"), id("B"), id("C")]);
        assert_eq!(number(&doc, "B"), 2.0);
        assert_eq!(number(&doc, "C"), 2.0);
    }

    #[test]
    fn test_diamond_reads_fresh_values() {
        // D reads both B and C, C also reads B.
        let mut doc = doc();
        doc.apply_edit(id("B"), "A 1 +").unwrap();
        doc.apply_edit(id("C"), "B A +").unwrap();
        doc.apply_edit(id("D"), "C B *").unwrap();
        doc.apply_edit(id("A"), "3").unwrap();
        assert_eq!(number(&doc, "B"), 4.0);
        assert_eq!(number(&doc, "C"), 7.0);
        assert_eq!(number(&doc, "D"), 28.0);
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let mut doc = doc();
        doc.apply_edit(id("B"), "A 1 +").unwrap();
        doc.apply_edit(id("A"), "A 1 +").unwrap();
        assert_eq!(value(&doc, "A"), CellValue::Error(CellError::CyclicDependency));
        assert_eq!(value(&doc, "B"), CellValue::Error(CellError::CyclicDependency));
        assert!(doc.links_consistent());
    }

    #[test]
    fn test_breaking_a_cycle_recovers() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "B 2 +").unwrap();
        doc.apply_edit(id("B"), "C 1 -").unwrap();
        doc.apply_edit(id("C"), "A 12 *").unwrap();
        for name in ["A", "B", "C"] {
            assert!(value(&doc, name).is_error(), "{} should be in error", name);
        }

        doc.apply_edit(id("C"), "5").unwrap();
        assert_eq!(number(&doc, "C"), 5.0);
        assert_eq!(number(&doc, "B"), 4.0);
        assert_eq!(number(&doc, "A"), 6.0);
    }

    #[test]
    fn test_cell_outside_cycle_reading_it_is_error() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "B").unwrap();
        doc.apply_edit(id("B"), "A").unwrap();
        doc.apply_edit(id("D"), "A 1 +").unwrap();
        assert_eq!(value(&doc, "D"), CellValue::Error(CellError::CyclicDependency));
    }

    #[test]
    fn test_evaluation_errors_are_contained() {
        let mut doc = doc();
        doc.apply_edit(id("B"), "A 2 *").unwrap();
        doc.apply_edit(id("A"), "1 0 /").unwrap();
        assert_eq!(value(&doc, "A"), CellValue::Error(CellError::DivisionByZero));
        assert_eq!(value(&doc, "B"), CellValue::Error(CellError::DivisionByZero));

        doc.apply_edit(id("A"), "1 +").unwrap();
        assert_eq!(value(&doc, "A"), CellValue::Error(CellError::MalformedExpression));

        doc.apply_edit(id("A"), "4").unwrap();
        assert_eq!(number(&doc, "B"), 8.0);
    }

    #[test]
    fn test_blank_edit_becomes_default_formula() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "7").unwrap();
        doc.apply_edit(id("A"), "   ").unwrap();
        let display = doc.display(id("A")).unwrap();
        assert_eq!(display.formula, "0.0");
        assert_eq!(display.value, CellValue::Number(0.0));
    }

    #[test]
    fn test_unchanged_formula_is_a_no_op() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "A").unwrap();
        assert_eq!(doc.history_len(), 1);
        assert!(doc.apply_edit(id("A"), "A").unwrap().is_empty());
        assert_eq!(doc.history_len(), 1);
    }

    #[test]
    fn test_reference_to_missing_cell_is_zero() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "Z 5 +").unwrap();
        assert_eq!(number(&doc, "A"), 5.0);
        assert!(doc.cell(id("A")).unwrap().subjects.is_empty());
    }

    #[test]
    fn test_literal_overwrite_drops_observer_links() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "10").unwrap();
        doc.apply_edit(id("B"), "A 1 +").unwrap();
        assert!(doc.cell(id("A")).unwrap().observers.contains(&id("B")));
        doc.apply_edit(id("B"), "1").unwrap();
        assert_eq!(number(&doc, "B"), 1.0);
        assert!(doc.cell(id("A")).unwrap().observers.is_empty());
        assert!(doc.cell(id("B")).unwrap().subjects.is_empty());
    }

    #[test]
    fn test_undo_restores_and_repropagates() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "200").unwrap();
        doc.apply_edit(id("B"), "40").unwrap();
        doc.apply_edit(id("C"), "A B /").unwrap();
        doc.apply_edit(id("B"), "20").unwrap();
        doc.apply_edit(id("A"), "150").unwrap();
        assert_eq!(number(&doc, "C"), 7.5);

        assert_eq!(doc.undo(), Ok(id("A")));
        assert_eq!(number(&doc, "A"), 200.0);
        assert_eq!(number(&doc, "C"), 10.0);

        assert_eq!(doc.undo(), Ok(id("B")));
        assert_eq!(number(&doc, "B"), 40.0);
        assert_eq!(number(&doc, "C"), 5.0);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut doc = doc();
        assert_eq!(doc.undo(), Err(SheetError::EmptyHistory));
        doc.apply_edit(id("A"), "1").unwrap();
        assert_eq!(doc.undo(), Ok(id("A")));
        assert_eq!(doc.undo(), Err(SheetError::EmptyHistory));
        assert_eq!(number(&doc, "A"), 0.0);
    }

    #[test]
    fn test_undo_keeps_links_of_newer_formula() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "5").unwrap();
        doc.apply_edit(id("B"), "A 1 +").unwrap();
        doc.undo().unwrap();

        let b = doc.cell(id("B")).unwrap();
        assert_eq!(b.formula, "0.0");
        assert!(b.subjects.contains(&id("A")));
        assert!(doc.links_consistent());
    }

    #[test]
    fn test_recalculate_all_refreshes_stale_links() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "5").unwrap();
        doc.apply_edit(id("B"), "A 1 +").unwrap();
        doc.undo().unwrap();
        assert!(doc.cell(id("B")).unwrap().subjects.contains(&id("A")));

        assert!(doc.recalculate_all().is_empty());
        assert!(doc.cell(id("B")).unwrap().subjects.is_empty());
        assert!(doc.cell(id("A")).unwrap().observers.is_empty());
        assert!(doc.links_consistent());

        // With the stale link gone, A may read B without a cycle.
        doc.apply_edit(id("A"), "B").unwrap();
        assert_eq!(value(&doc, "A"), CellValue::Number(0.0));
    }

    #[test]
    fn test_undo_of_cyclic_edit_restores_numbers() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "B").unwrap();
        doc.apply_edit(id("B"), "A").unwrap();
        assert!(value(&doc, "A").is_error());
        assert!(value(&doc, "B").is_error());

        assert_eq!(doc.undo(), Ok(id("B")));
        assert_eq!(doc.display(id("B")).unwrap().formula, "0.0");
        assert_eq!(value(&doc, "B"), CellValue::Number(0.0));
        assert_eq!(value(&doc, "A"), CellValue::Number(0.0));

        // B still carries the link from the undone formula until relinked.
        assert!(doc.cell(id("B")).unwrap().subjects.contains(&id("A")));
        doc.recalculate_all();
        assert!(doc.cell(id("B")).unwrap().subjects.is_empty());
        assert_eq!(value(&doc, "A"), CellValue::Number(0.0));
    }

    #[test]
    fn test_recalculate_all_marks_existing_cycles() {
        let mut doc = doc();
        doc.apply_edit(id("A"), "B").unwrap();
        doc.apply_edit(id("B"), "A").unwrap();
        doc.apply_edit(id("C"), "2 3 *").unwrap();
        doc.recalculate_all();
        assert!(value(&doc, "A").is_error());
        assert!(value(&doc, "B").is_error());
        assert_eq!(number(&doc, "C"), 6.0);
    }

    #[test]
    fn test_listeners_see_each_changed_cell_once() {
        let mut doc = doc();
        let seen: Rc<RefCell<Vec<(CellId, CellValue)>>> = Rc::default();
        let sink = seen.clone();
        doc.on_cell_changed(move |id, display| sink.borrow_mut().push((id, display.value)));

        doc.apply_edit(id("A"), "2").unwrap();
        doc.apply_edit(id("B"), "A A *").unwrap();
        doc.apply_edit(id("C"), "B A +").unwrap();
        seen.borrow_mut().clear();

        doc.apply_edit(id("A"), "3").unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                (id("A"), CellValue::Number(3.0)),
                (id("B"), CellValue::Number(9.0)),
                (id("C"), CellValue::Number(12.0)),
            ]
        );
    }

    #[test]
    fn test_listeners_skip_dependents_with_unchanged_value() {
        let mut doc = doc();
        let seen: Rc<RefCell<Vec<CellId>>> = Rc::default();
        let sink = seen.clone();
        doc.on_cell_changed(move |id, _| sink.borrow_mut().push(id));

        doc.apply_edit(id("B"), "A 0 *").unwrap();
        seen.borrow_mut().clear();
        doc.apply_edit(id("A"), "5").unwrap();
        assert_eq!(*seen.borrow(), vec![id("A")]);
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = SheetConfig {
            cells: 2,
            history_limit: Some(1),
        };
        let mut doc = Document::with_config(&config).unwrap();
        doc.apply_edit(id("A"), "1").unwrap();
        doc.apply_edit(id("A"), "2").unwrap();
        assert_eq!(doc.history_len(), 1);
        doc.undo().unwrap();
        assert_eq!(number(&doc, "A"), 1.0);
        assert_eq!(doc.undo(), Err(SheetError::EmptyHistory));
    }
}
