//! Route planning orchestration.
//!
//! Pure, synchronous composition: validate the request, try the external
//! provider if one is configured, fall back to the local nearest-neighbor
//! solver, then enforce boundary constraints. No state survives a call;
//! concurrent requests share nothing.

use std::collections::HashSet;
use std::fmt;

use crate::gemini::GeminiRouteProvider;
use crate::grid::CellIndex;
use crate::postprocess::enforce_constraints;
use crate::route::{RouteRequest, RouteResult};
use crate::solver;
use crate::traits::RouteProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The request carried no store layout.
    MissingStoreLayout,
    /// A product, entrance, or checkout references a cell outside the grid.
    UnknownCell(String),
    /// Solving and constraint enforcement produced no steps. A reportable
    /// condition ("no route could be generated"), not a system fault.
    EmptyRoute,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::MissingStoreLayout => write!(f, "request has no store cells"),
            PlanError::UnknownCell(id) => write!(f, "cell '{id}' is not part of the store grid"),
            PlanError::EmptyRoute => write!(f, "no route could be generated"),
        }
    }
}

impl std::error::Error for PlanError {}

/// Plans a route, building a Gemini provider from the request's config when
/// one is present.
pub fn plan_route(request: &RouteRequest) -> Result<RouteResult, PlanError> {
    let provider = request
        .external_provider_config
        .clone()
        .and_then(|config| GeminiRouteProvider::new(config).ok());

    plan_route_with(request, provider.as_ref().map(|p| p as &dyn RouteProvider))
}

/// Plans a route with an explicit (possibly absent) external provider.
///
/// Provider failures of any kind never surface to the caller; the result
/// silently degrades to the local solver's.
pub fn plan_route_with(
    request: &RouteRequest,
    provider: Option<&dyn RouteProvider>,
) -> Result<RouteResult, PlanError> {
    validate(request)?;
    let index = CellIndex::new(&request.cells);

    let raw = provider
        .and_then(|p| p.plan(&request.cells, &request.products))
        .filter(|result| external_result_is_valid(result, &index))
        .unwrap_or_else(|| solver::solve(&request.products, &index));

    let result = enforce_constraints(raw, &request.constraints, &index);
    if result.steps.is_empty() {
        return Err(PlanError::EmptyRoute);
    }

    Ok(result)
}

fn validate(request: &RouteRequest) -> Result<(), PlanError> {
    if request.cells.is_empty() {
        return Err(PlanError::MissingStoreLayout);
    }

    let index = CellIndex::new(&request.cells);
    for product in &request.products {
        if !index.contains(&product.cell_id) {
            return Err(PlanError::UnknownCell(product.cell_id.clone()));
        }
    }
    if let Some(entrance) = &request.constraints.entrance_cell {
        if !index.contains(entrance) {
            return Err(PlanError::UnknownCell(entrance.clone()));
        }
    }
    for checkout in &request.constraints.checkout_cells {
        if !index.contains(checkout) {
            return Err(PlanError::UnknownCell(checkout.clone()));
        }
    }

    Ok(())
}

/// Invariant check at the trust boundary: an external result must reference
/// only known cells and visit each cell at most once, or it is discarded
/// whole in favor of the local solver.
fn external_result_is_valid(result: &RouteResult, index: &CellIndex) -> bool {
    let mut seen = HashSet::new();
    for step in &result.steps {
        if !index.contains(&step.cell_id) {
            tracing::debug!(cell_id = %step.cell_id, "discarding external route: unknown cell");
            return false;
        }
        if !seen.insert(step.cell_id.as_str()) {
            tracing::debug!(cell_id = %step.cell_id, "discarding external route: duplicate cell");
            return false;
        }
    }
    true
}
