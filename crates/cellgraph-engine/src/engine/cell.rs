//! Cell data structures for the dependency graph.
//!
//! This module provides the core data types for representing cells:
//! - [`CellValue`] - A computed number or an error marker
//! - [`Cell`] - A cell with its formula, value and both link sets
//! - [`CellDisplay`] - Read-only snapshot handed to renderers
//! - [`Grid`] - Ordered storage for cells keyed by id

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::cell_id::CellId;
use super::eval::EvalError;

/// Formula stored in a cell that has never been edited or was left blank.
pub const DEFAULT_FORMULA: &str = "0.0";

/// Why a cell holds no number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CellError {
    CyclicDependency,
    MalformedExpression,
    DivisionByZero,
}

impl From<&EvalError> for CellError {
    fn from(err: &EvalError) -> Self {
        match err {
            EvalError::MalformedExpression(_) => CellError::MalformedExpression,
            EvalError::DivisionByZero => CellError::DivisionByZero,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CellError::CyclicDependency => "cyclic dependency",
            CellError::MalformedExpression => "malformed expression",
            CellError::DivisionByZero => "division by zero",
        };
        f.write_str(s)
    }
}

/// The computed state of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail")]
pub enum CellValue {
    Number(f64),
    Error(CellError),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Number(0.0)
    }
}

/// A named slot in the graph.
///
/// `subjects` are the cells this formula reads; `observers` are the cells
/// whose formulas read this one. Across a grid the two are inverses.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub formula: String,
    pub value: CellValue,
    pub subjects: BTreeSet<CellId>,
    pub observers: BTreeSet<CellId>,
}

impl Cell {
    pub fn new(id: CellId) -> Cell {
        Cell {
            id,
            formula: DEFAULT_FORMULA.to_string(),
            value: CellValue::default(),
            subjects: BTreeSet::new(),
            observers: BTreeSet::new(),
        }
    }

    pub fn display(&self) -> CellDisplay {
        CellDisplay {
            id: self.id,
            formula: self.formula.clone(),
            value: self.value,
        }
    }
}

/// What a renderer needs to draw one cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellDisplay {
    pub id: CellId,
    pub formula: String,
    pub value: CellValue,
}

/// Ordered cell storage; iteration follows id order.
pub type Grid = BTreeMap<CellId, Cell>;

/// Map blank input to the default formula, otherwise trim it.
pub fn normalize_formula(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_FORMULA.to_string()
    } else {
        trimmed.to_string()
    }
}
