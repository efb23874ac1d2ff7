//! Grid distance model and cell coordinate lookup.
//!
//! Movement is constrained to orthogonal aisles, so Manhattan (L1) distance
//! is the cost metric for every solver and for constraint enforcement.

use std::collections::HashMap;

use crate::route::{Cell, RouteStep};

/// Manhattan distance between two grid coordinates.
pub fn manhattan(a: (i32, i32), b: (i32, i32)) -> u32 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Lookup from a cell id to its grid coordinates.
///
/// Steps carry only cell ids; anything that needs geometry (nearest-checkout
/// selection, distance reconciliation) resolves coordinates through this.
#[derive(Debug, Clone)]
pub struct CellIndex {
    coords: HashMap<String, (i32, i32)>,
}

impl CellIndex {
    pub fn new(cells: &[Cell]) -> Self {
        let mut coords = HashMap::with_capacity(cells.len());
        for cell in cells {
            coords.insert(cell.id.clone(), (cell.x, cell.y));
        }
        Self { coords }
    }

    pub fn coords(&self, cell_id: &str) -> Option<(i32, i32)> {
        self.coords.get(cell_id).copied()
    }

    pub fn contains(&self, cell_id: &str) -> bool {
        self.coords.contains_key(cell_id)
    }
}

/// Manhattan length of a step sequence, resolved through the index.
///
/// Steps whose cell is unknown to the index contribute nothing; validated
/// requests never hit that case.
pub fn path_distance(steps: &[RouteStep], index: &CellIndex) -> f64 {
    let mut total = 0u64;
    for pair in steps.windows(2) {
        if let (Some(from), Some(to)) = (index.coords(&pair[0].cell_id), index.coords(&pair[1].cell_id)) {
            total += u64::from(manhattan(from, to));
        }
    }
    total as f64
}
