//! Cell identifier parsing and formatting.
//!
//! Cells are named by a single uppercase letter, assigned by position:
//! index 0 is `A`, index 25 is `Z`.
//!
//! # Examples
//!
//! ```ignore
//! let id = CellId::from_str("C").unwrap();
//! assert_eq!(id.index(), 2);
//! assert_eq!(id.to_string(), "C");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct cell names available.
pub const MAX_CELLS: usize = 26;

/// A stable identifier for a cell, displayed as its letter.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellId(u8);

impl CellId {
    /// Identifier for the cell at `index` (0 -> A). Returns None past `Z`.
    pub fn from_index(index: usize) -> Option<CellId> {
        if index < MAX_CELLS {
            Some(CellId(index as u8))
        } else {
            None
        }
    }

    /// Parse a single uppercase letter. Anything else is rejected.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellId> {
        let mut chars = name.chars();
        let letter = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_letter(letter)
    }

    pub fn from_letter(letter: char) -> Option<CellId> {
        if letter.is_ascii_uppercase() {
            Some(CellId(letter as u8 - b'A'))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }
}

impl std::str::FromStr for CellId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellId::from_str(s).ok_or_else(|| format!("Invalid cell id: {}", s))
    }
}

impl TryFrom<String> for CellId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> String {
        id.to_string()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
