use crate::config::SheetConfig;
use crate::error::{Result, SheetError};
use crate::history::History;
use cellgraph_engine::engine::{Cell, CellDisplay, CellId, Grid};

/// Callback invoked once per changed cell after each propagation pass.
pub type Listener = Box<dyn FnMut(CellId, &CellDisplay)>;

/// UI-agnostic document: the cell graph, its undo history and change listeners.
///
/// The document is the only owner of cell state. Collaborators read through
/// [`Document::display`] and mutate through [`Document::apply_edit`],
/// [`Document::undo`] and [`Document::recalculate_all`].
pub struct Document {
    pub(crate) grid: Grid,
    pub(crate) history: History,
    pub(crate) listeners: Vec<Listener>,
}

impl Document {
    /// Create an empty document with unbounded history.
    pub fn new() -> Self {
        Document {
            grid: Grid::new(),
            history: History::new(),
            listeners: Vec::new(),
        }
    }

    /// Create a document holding the configured cells, `A` onward.
    pub fn with_config(config: &SheetConfig) -> Result<Self> {
        config.validate()?;
        let mut doc = Document {
            grid: Grid::new(),
            history: History::with_limit(config.history_limit),
            listeners: Vec::new(),
        };
        for index in 0..config.cells {
            let id = CellId::from_index(index).ok_or_else(|| {
                SheetError::Config(format!("no cell name for index {}", index))
            })?;
            doc.create_cell(id)?;
        }
        Ok(doc)
    }

    /// Register a new cell with the default formula and a value of zero.
    pub fn create_cell(&mut self, id: CellId) -> Result<CellId> {
        if self.grid.contains_key(&id) {
            return Err(SheetError::DuplicateCell(id));
        }
        self.grid.insert(id, Cell::new(id));
        tracing::trace!(cell = %id, "created cell");
        Ok(id)
    }

    /// Read-only snapshot of a cell for rendering.
    pub fn display(&self, id: CellId) -> Result<CellDisplay> {
        self.cell(id).map(Cell::display)
    }

    /// Read-only access to a cell, including its link sets.
    pub fn cell(&self, id: CellId) -> Result<&Cell> {
        self.grid.get(&id).ok_or(SheetError::UnknownCell(id))
    }

    /// Cell ids in order.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.grid.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Register a callback for changed cells.
    pub fn on_cell_changed<F>(&mut self, listener: F)
    where
        F: FnMut(CellId, &CellDisplay) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Number of undo entries stored.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether every observer link has a matching subject link and vice versa.
    pub fn links_consistent(&self) -> bool {
        self.grid.values().all(|cell| {
            cell.observers.iter().all(|o| {
                self.grid
                    .get(o)
                    .is_some_and(|other| other.subjects.contains(&cell.id))
            }) && cell.subjects.iter().all(|s| {
                self.grid
                    .get(s)
                    .is_some_and(|other| other.observers.contains(&cell.id))
            })
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
