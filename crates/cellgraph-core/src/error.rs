//! Error types for Cellgraph core.

use thiserror::Error;

use cellgraph_engine::engine::CellId;

/// Errors returned by document operations.
///
/// Formula faults are not here: they are stored on the cell as
/// `CellValue::Error` and the document stays usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Unknown cell: {0}")]
    UnknownCell(CellId),

    #[error("Cell already exists: {0}")]
    DuplicateCell(CellId),

    #[error("Nothing to undo")]
    EmptyHistory,

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SheetError>;
