//! Circular dependency detection for formula cells.
//!
//! After a formula's subjects are committed we search the subjects relation
//! breadth-first for a path leading back to the edited cell.

use std::collections::{HashMap, VecDeque};

use super::{CellId, Grid};

/// Look for a cycle through `origin`.
///
/// Returns `Some(path)` where `path` starts and ends with `origin` and each
/// cell reads the next one, or `None` if `origin` is not on a cycle.
pub fn find_cycle(origin: CellId, grid: &Grid) -> Option<Vec<CellId>> {
    let start = grid.get(&origin)?;
    if start.subjects.contains(&origin) {
        return Some(vec![origin, origin]);
    }

    // Discovered cell -> the cell whose subjects led to it.
    let mut parent: HashMap<CellId, CellId> = HashMap::new();
    let mut queue: VecDeque<CellId> = VecDeque::new();
    for &subject in &start.subjects {
        parent.insert(subject, origin);
        queue.push_back(subject);
    }

    while let Some(current) = queue.pop_front() {
        let Some(cell) = grid.get(&current) else {
            continue;
        };
        for &dep in &cell.subjects {
            if dep == origin {
                return Some(trace_path(origin, current, &parent));
            }
            if !parent.contains_key(&dep) {
                parent.insert(dep, current);
                queue.push_back(dep);
            }
        }
    }

    None
}

fn trace_path(origin: CellId, last: CellId, parent: &HashMap<CellId, CellId>) -> Vec<CellId> {
    let mut path = vec![origin, last];
    let mut current = last;
    while let Some(&prev) = parent.get(&current) {
        if prev == origin {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.push(origin);
    path.reverse();
    path
}
