//! Boundary-constraint enforcement on a raw route.
//!
//! Pins the mandatory entrance at the front and a checkout at the back of
//! whichever raw path a solver produced, without re-optimizing the interior.
//! Inserted endpoints are not jointly optimized with the rest of the tour;
//! entrance/checkout cells sit near the grid boundary, so the deviation from
//! optimal stays small.

use std::collections::VecDeque;

use crate::grid::{self, CellIndex};
use crate::route::{RouteResult, RouteStep, StoreConstraints};

/// Enforces entrance/checkout constraints and renumbers steps.
///
/// Empty raw paths pass through unchanged: no synthetic boundary steps are
/// fabricated for an empty shopping list.
///
/// Distance policy: whenever enforcement changes the step sequence, the
/// reported `total_distance` is recomputed as the Manhattan length of the
/// final path. An untouched sequence keeps the distance the solver reported,
/// so a second application is a no-op.
pub fn enforce_constraints(
    raw: RouteResult,
    constraints: &StoreConstraints,
    index: &CellIndex,
) -> RouteResult {
    if raw.steps.is_empty() {
        return raw;
    }

    let mut steps: VecDeque<RouteStep> = raw.steps.into();
    let mut modified = false;

    if let Some(entrance) = &constraints.entrance_cell {
        match steps.iter().position(|step| step.cell_id == *entrance) {
            Some(0) => {}
            Some(position) => {
                // Relocate, keeping its products and everyone else's order.
                if let Some(step) = steps.remove(position) {
                    steps.push_front(step);
                    modified = true;
                }
            }
            None => {
                steps.push_front(synthetic_step(entrance));
                modified = true;
            }
        }
    }

    if let Some(checkout) = missing_checkout(&steps, constraints, index) {
        steps.push_back(synthetic_step(&checkout));
        modified = true;
    }

    let mut steps: Vec<RouteStep> = steps.into();
    for (i, step) in steps.iter_mut().enumerate() {
        step.order = (i + 1) as u32;
    }

    let total_distance = if modified {
        grid::path_distance(&steps, index)
    } else {
        raw.total_distance
    };

    RouteResult {
        steps,
        total_distance,
        source: raw.source,
    }
}

/// Picks the checkout cell to append, if any is needed.
///
/// A route already visiting any checkout cell (anywhere, not necessarily
/// last) satisfies the constraint. Otherwise the checkout nearest to the
/// current last step wins, ties broken by constraint enumeration order.
fn missing_checkout(
    steps: &VecDeque<RouteStep>,
    constraints: &StoreConstraints,
    index: &CellIndex,
) -> Option<String> {
    if constraints.checkout_cells.is_empty() {
        return None;
    }
    let satisfied = steps
        .iter()
        .any(|step| constraints.checkout_cells.iter().any(|c| *c == step.cell_id));
    if satisfied {
        return None;
    }

    let from = index.coords(&steps.back()?.cell_id)?;
    let mut best: Option<(&String, u32)> = None;
    for cell_id in &constraints.checkout_cells {
        let Some(to) = index.coords(cell_id) else {
            continue;
        };
        let dist = grid::manhattan(from, to);
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((cell_id, dist));
        }
    }

    best.map(|(cell_id, _)| cell_id.clone())
}

fn synthetic_step(cell_id: &str) -> RouteStep {
    RouteStep {
        order: 0,
        cell_id: cell_id.to_string(),
        products: Vec::new(),
    }
}
