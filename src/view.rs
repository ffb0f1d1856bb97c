//! Display modes for rendering cells.
//!
//! The document exposes both the formula and the computed value of every
//! cell; which one to show is the host's choice. The mode is passed into
//! [`render`] explicitly rather than held as shared state.

use serde::{Deserialize, Serialize};

use cellgraph_core::CellDisplay;
use cellgraph_engine::engine::format_value;

/// What a cell shows.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// The raw formula text.
    #[default]
    Formula,
    /// The computed value, or `Error`.
    Value,
}

impl DisplayMode {
    pub fn toggled(self) -> DisplayMode {
        match self {
            DisplayMode::Formula => DisplayMode::Value,
            DisplayMode::Value => DisplayMode::Formula,
        }
    }

    /// Label for a control that switches to the other mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            DisplayMode::Formula => "Value View",
            DisplayMode::Value => "Formula View",
        }
    }
}

/// Text to draw for a cell in the given mode.
pub fn render(mode: DisplayMode, display: &CellDisplay) -> String {
    match mode {
        DisplayMode::Formula => display.formula.clone(),
        DisplayMode::Value => format_value(&display.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgraph_core::{CellError, CellId, CellValue};

    fn display(formula: &str, value: CellValue) -> CellDisplay {
        CellDisplay {
            id: CellId::from_str("A").unwrap(),
            formula: formula.to_string(),
            value,
        }
    }

    #[test]
    fn test_render_modes() {
        let d = display("A B /", CellValue::Number(7.5));
        assert_eq!(render(DisplayMode::Formula, &d), "A B /");
        assert_eq!(render(DisplayMode::Value, &d), "7.5");
    }

    #[test]
    fn test_render_error_value() {
        let d = display("A 1 +", CellValue::Error(CellError::CyclicDependency));
        assert_eq!(render(DisplayMode::Value, &d), "Error");
        assert_eq!(render(DisplayMode::Formula, &d), "A 1 +");
    }

    #[test]
    fn test_toggle() {
        let mode = DisplayMode::default();
        assert_eq!(mode, DisplayMode::Formula);
        assert_eq!(mode.toggled(), DisplayMode::Value);
        assert_eq!(mode.toggled().toggled(), mode);
        assert_eq!(mode.toggle_label(), "Value View");
    }
}
