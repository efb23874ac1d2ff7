//! Local heuristic route solver (nearest-neighbor baseline).
//!
//! Greedy open-path construction over the occupied cells of a shopping list.
//! O(n²) in occupied-cell count, which is fine for admin-configured grids
//! (bounded at 20x20).

use std::collections::HashMap;

use crate::grid::CellIndex;
use crate::route::{Product, RouteResult, RouteSource, RouteStep};

#[derive(Debug)]
struct Stop {
    cell_id: String,
    coords: (i32, i32),
    products: Vec<String>,
}

/// Builds a route over every cell referenced by `products`.
///
/// Determinism: distinct cells are grouped in the order they are first
/// encountered scanning the product list, and that order seeds the traversal.
/// Nearest-neighbor selection scans the remaining set in that same order and
/// takes the first strict improvement, never replacing on equal distance.
pub fn solve(products: &[Product], index: &CellIndex) -> RouteResult {
    let mut remaining = group_by_cell(products, index);

    if remaining.is_empty() {
        return RouteResult {
            steps: Vec::new(),
            total_distance: 0.0,
            source: RouteSource::Local,
        };
    }

    let mut current = remaining.remove(0);
    let mut path = Vec::with_capacity(remaining.len() + 1);
    let mut total = 0u64;

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_dist = u32::MAX;
        for (i, stop) in remaining.iter().enumerate() {
            let dist = crate::grid::manhattan(current.coords, stop.coords);
            if dist < best_dist {
                best_dist = dist;
                best_index = i;
            }
        }
        total += u64::from(best_dist);
        path.push(current);
        current = remaining.remove(best_index);
    }
    path.push(current);

    let steps = path
        .into_iter()
        .enumerate()
        .map(|(i, stop)| RouteStep {
            order: (i + 1) as u32,
            cell_id: stop.cell_id,
            products: stop.products,
        })
        .collect();

    RouteResult {
        steps,
        total_distance: total as f64,
        source: RouteSource::Local,
    }
}

/// Groups products by cell, preserving first-encounter order of distinct
/// cells. Products pointing at a cell the index does not know are skipped
/// (the engine rejects such requests before calling the solver).
fn group_by_cell(products: &[Product], index: &CellIndex) -> Vec<Stop> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut stops: Vec<Stop> = Vec::new();

    for product in products {
        let Some(coords) = index.coords(&product.cell_id) else {
            tracing::debug!(cell_id = %product.cell_id, product = %product.name, "skipping product on unknown cell");
            continue;
        };
        match seen.get(product.cell_id.as_str()).copied() {
            Some(position) => stops[position].products.push(product.name.clone()),
            None => {
                seen.insert(product.cell_id.as_str(), stops.len());
                stops.push(Stop {
                    cell_id: product.cell_id.clone(),
                    coords,
                    products: vec![product.name.clone()],
                });
            }
        }
    }

    stops
}
