//! Cell graph engine API.
//!
//! This module provides the building blocks the document layer assembles:
//!
//! - [`Cell`], [`CellValue`], [`Grid`] - Data structures for cell storage
//! - [`CellId`] - Single-letter cell identifiers
//! - [`find_cycle`] - Circular dependency detection
//! - [`extract_references`] / [`substitute_references`] - Formula references
//! - [`evaluate`] - Postfix formula evaluation
//! - [`format_value`] - Format values for display

mod cell;
mod cell_id;
mod cycle;
mod deps;
mod eval;
mod format;
mod ops;

pub use cell::{Cell, CellDisplay, CellError, CellValue, DEFAULT_FORMULA, Grid, normalize_formula};
pub use cell_id::{CellId, MAX_CELLS};
pub use cycle::find_cycle;
pub use deps::{extract_references, substitute_references};
pub use eval::{EvalError, Token, evaluate, tokenize};
pub use format::{ERROR_TEXT, format_number, format_value};
pub use ops::{OPERATORS, Operator, lookup_operator};
