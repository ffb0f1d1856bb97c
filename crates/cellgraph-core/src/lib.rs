//! cellgraph-core - UI-agnostic document model, recalculation and undo.

pub mod config;
pub mod document;
pub mod error;
pub mod history;

pub use config::SheetConfig;
pub use document::{Document, Listener};
pub use error::{Result, SheetError};
pub use history::{History, Snapshot};

pub use cellgraph_engine::engine::{CellDisplay, CellError, CellId, CellValue};
