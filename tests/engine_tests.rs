//! End-to-end planning tests
//!
//! Validation, external-provider fallback, and the full pipeline over mock
//! providers.

use aisle_planner::engine::{plan_route, plan_route_with, PlanError};
use aisle_planner::gemini::GeminiConfig;
use aisle_planner::route::{
    Cell, Product, RouteRequest, RouteResult, RouteSource, RouteStep, StoreConstraints,
};
use aisle_planner::traits::RouteProvider;

// ============================================================================
// Fixtures
// ============================================================================

fn grid(rows: i32, cols: i32) -> Vec<Cell> {
    let mut cells = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            cells.push(Cell::from_grid(row, col));
        }
    }
    cells
}

fn request(cells: Vec<Cell>, products: Vec<(&str, &str)>) -> RouteRequest {
    RouteRequest {
        cells,
        products: products
            .into_iter()
            .map(|(name, cell_id)| Product::new(name, cell_id))
            .collect(),
        constraints: StoreConstraints::default(),
        external_provider_config: None,
    }
}

fn external_step(cell_id: &str, products: &[&str]) -> RouteStep {
    RouteStep {
        order: 0,
        cell_id: cell_id.to_string(),
        products: products.iter().map(|p| p.to_string()).collect(),
    }
}

/// Provider that always returns the same route.
struct CannedProvider(RouteResult);

impl RouteProvider for CannedProvider {
    fn plan(&self, _cells: &[Cell], _products: &[Product]) -> Option<RouteResult> {
        Some(self.0.clone())
    }
}

/// Provider that never produces a route (transport failure, bad payload...).
struct FailingProvider;

impl RouteProvider for FailingProvider {
    fn plan(&self, _cells: &[Cell], _products: &[Product]) -> Option<RouteResult> {
        None
    }
}

fn canned(steps: Vec<RouteStep>, total_distance: f64) -> CannedProvider {
    CannedProvider(RouteResult {
        steps,
        total_distance,
        source: RouteSource::External,
    })
}

// ============================================================================
// The concrete three-cell scenario
// ============================================================================

#[test]
fn test_entrance_inserted_checkout_already_satisfied() {
    let cells = vec![Cell::from_grid(0, 0), Cell::from_grid(0, 1), Cell::from_grid(1, 1)];
    let mut request = request(cells, vec![("Milk", "0-1"), ("Bread", "1-1")]);
    request.constraints = StoreConstraints {
        entrance_cell: Some("0-0".to_string()),
        checkout_cells: vec!["1-1".to_string()],
    };

    let result = plan_route(&request).unwrap();

    assert_eq!(result.source, RouteSource::Local);
    assert_eq!(result.steps.len(), 3, "checkout already present, nothing appended");
    let expected = [
        (1, "0-0", Vec::<&str>::new()),
        (2, "0-1", vec!["Milk"]),
        (3, "1-1", vec!["Bread"]),
    ];
    for (step, (order, cell_id, products)) in result.steps.iter().zip(expected) {
        assert_eq!(step.order, order);
        assert_eq!(step.cell_id, cell_id);
        assert_eq!(step.products, products);
    }
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_empty_store_layout_rejected() {
    let request = request(Vec::new(), vec![("Milk", "0-0")]);
    assert_eq!(plan_route(&request), Err(PlanError::MissingStoreLayout));
}

#[test]
fn test_product_on_unknown_cell_rejected() {
    let request = request(grid(2, 2), vec![("Milk", "5-5")]);
    assert_eq!(plan_route(&request), Err(PlanError::UnknownCell("5-5".to_string())));
}

#[test]
fn test_constraint_on_unknown_cell_rejected() {
    let mut bad_entrance = request(grid(2, 2), vec![("Milk", "0-0")]);
    bad_entrance.constraints.entrance_cell = Some("9-9".to_string());
    assert_eq!(plan_route(&bad_entrance), Err(PlanError::UnknownCell("9-9".to_string())));

    let mut bad_checkout = request(grid(2, 2), vec![("Milk", "0-0")]);
    bad_checkout.constraints.checkout_cells = vec!["9-0".to_string()];
    assert_eq!(plan_route(&bad_checkout), Err(PlanError::UnknownCell("9-0".to_string())));
}

#[test]
fn test_empty_shopping_list_yields_empty_route_error() {
    let mut request = request(grid(2, 2), Vec::new());
    request.constraints.entrance_cell = Some("0-0".to_string());
    assert_eq!(plan_route(&request), Err(PlanError::EmptyRoute));
}

// ============================================================================
// External provider: accept and fallback
// ============================================================================

#[test]
fn test_well_formed_external_route_used_verbatim() {
    let request = request(grid(3, 3), vec![("Milk", "0-1"), ("Bread", "2-2")]);
    let provider = canned(
        vec![external_step("2-2", &["Bread"]), external_step("0-1", &["Milk"])],
        7.5,
    );

    let result = plan_route_with(&request, Some(&provider)).unwrap();

    assert_eq!(result.source, RouteSource::External);
    let order: Vec<&str> = result.steps.iter().map(|s| s.cell_id.as_str()).collect();
    assert_eq!(order, vec!["2-2", "0-1"], "external ordering kept");
    assert_eq!(result.total_distance, 7.5, "provider distance trusted as-is");
    let orders: Vec<u32> = result.steps.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![1, 2], "orders reassigned downstream");
}

#[test]
fn test_failing_provider_falls_back_to_local() {
    let request = request(grid(3, 3), vec![("Milk", "0-1"), ("Bread", "2-2")]);

    let with_failure = plan_route_with(&request, Some(&FailingProvider)).unwrap();
    let local_only = plan_route_with(&request, None).unwrap();

    assert_eq!(with_failure.source, RouteSource::Local);
    assert_eq!(with_failure, local_only);
}

#[test]
fn test_external_route_with_unknown_cell_discarded() {
    let request = request(grid(2, 2), vec![("Milk", "0-1")]);
    let provider = canned(vec![external_step("8-8", &["Milk"])], 1.0);

    let result = plan_route_with(&request, Some(&provider)).unwrap();

    assert_eq!(result.source, RouteSource::Local);
    assert_eq!(result.steps[0].cell_id, "0-1");
}

#[test]
fn test_external_route_with_duplicate_cell_discarded() {
    let request = request(grid(2, 2), vec![("Milk", "0-1")]);
    let provider = canned(
        vec![external_step("0-1", &["Milk"]), external_step("0-1", &[])],
        2.0,
    );

    let result = plan_route_with(&request, Some(&provider)).unwrap();

    assert_eq!(result.source, RouteSource::Local);
}

#[test]
fn test_unreachable_gemini_endpoint_falls_back_to_local() {
    let mut request = request(grid(2, 2), vec![("Milk", "0-1")]);
    request.external_provider_config = Some(GeminiConfig {
        endpoint: "http://127.0.0.1:1".to_string(),
        api_key: "test-key".to_string(),
        timeout_secs: 1,
        ..GeminiConfig::default()
    });

    let result = plan_route(&request).unwrap();

    assert_eq!(result.source, RouteSource::Local);
}

// ============================================================================
// Constraints applied regardless of source
// ============================================================================

#[test]
fn test_entrance_enforced_on_external_route() {
    let mut request = request(grid(3, 3), vec![("Milk", "1-1")]);
    request.constraints.entrance_cell = Some("0-0".to_string());
    let provider = canned(vec![external_step("1-1", &["Milk"])], 0.0);

    let result = plan_route_with(&request, Some(&provider)).unwrap();

    assert_eq!(result.source, RouteSource::External);
    assert_eq!(result.steps[0].cell_id, "0-0");
    // Sequence changed, so the distance is the Manhattan length of the
    // final path rather than the provider's figure.
    assert_eq!(result.total_distance, 2.0);
}

#[test]
fn test_checkout_appended_when_none_visited() {
    let mut request = request(grid(4, 4), vec![("Milk", "0-0"), ("Bread", "1-1")]);
    request.constraints.checkout_cells = vec!["3-3".to_string(), "1-2".to_string()];

    let result = plan_route(&request).unwrap();

    let last = result.steps.last().unwrap();
    assert_eq!(last.cell_id, "1-2", "nearest checkout to the last stop");
    assert!(last.products.is_empty());
}
