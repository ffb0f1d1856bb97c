//! Reference extraction and substitution for formula strings.
//!
//! A reference is a lone uppercase letter (`A`, `B`, ...) standing as its own
//! word. Operator keywords are lowercase (`lg`, `sin`) so they never collide.

use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::OnceLock;

use super::cell_id::CellId;

/// Extract every cell reference named in a formula.
///
/// The result may name cells that do not exist; callers filter against
/// their own cell set.
pub fn extract_references(formula: &str) -> BTreeSet<CellId> {
    cell_id_re()
        .find_iter(formula)
        .filter_map(|m| CellId::from_str(m.as_str()))
        .collect()
}

/// Replace every reference in `formula` with the number `lookup` yields for it.
///
/// References `lookup` cannot resolve are substituted as `0`.
pub fn substitute_references<F>(formula: &str, lookup: F) -> String
where
    F: Fn(CellId) -> Option<f64>,
{
    cell_id_re()
        .replace_all(formula, |caps: &Captures| {
            let value = CellId::from_str(&caps[0]).and_then(&lookup).unwrap_or(0.0);
            value.to_string()
        })
        .into_owned()
}

fn cell_id_re() -> &'static Regex {
    static CELL_ID_RE: OnceLock<Regex> = OnceLock::new();
    CELL_ID_RE.get_or_init(|| {
        Regex::new(r"\b[A-Z]\b").expect("cell reference regex must compile")
    })
}
