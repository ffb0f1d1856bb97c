//! Cellgraph - reactive cell-dependency engine.
//!
//! The engine keeps a set of named cells consistent under edits. A host
//! application renders cells, forwards edits to [`Document::apply_edit`] and
//! [`Document::undo`], and redraws whatever [`Document::on_cell_changed`]
//! reports.

pub mod config;
pub mod view;

pub use cellgraph_core::{
    CellDisplay, CellError, CellId, CellValue, Document, History, Listener, Result, SheetConfig,
    SheetError, Snapshot,
};
pub use cellgraph_engine::engine::{evaluate, format_number, format_value};
pub use config::load_config;
pub use view::{DisplayMode, render};
