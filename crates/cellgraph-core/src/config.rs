//! Document configuration.

use serde::Deserialize;

use cellgraph_engine::engine::MAX_CELLS;

use crate::error::{Result, SheetError};

/// Cells created by default, `A` through `I`.
pub const DEFAULT_CELLS: usize = 9;

/// Settings for a new [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// How many cells to create, named `A`, `B`, ... in order.
    pub cells: usize,
    /// Maximum undo entries kept. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            cells: DEFAULT_CELLS,
            history_limit: None,
        }
    }
}

impl SheetConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SheetConfig =
            toml::from_str(content).map_err(|e| SheetError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cells > MAX_CELLS {
            return Err(SheetError::Config(format!(
                "cells must be at most {}, got {}",
                MAX_CELLS, self.cells
            )));
        }
        if self.history_limit == Some(0) {
            return Err(SheetError::Config(
                "history_limit must be positive; omit it for unbounded history".to_string(),
            ));
        }
        Ok(())
    }
}
