//! Route data contracts.
//!
//! These are the records flowing between the solvers, the constraint
//! post-processor, and external collaborators. Wire names are camelCase
//! (`cellId`, `totalDistance`, ...); serialization happens at the boundary
//! (requests arriving from a frontend, payloads going to the external
//! provider, finished routes handed to the persistence collaborator).

use serde::{Deserialize, Serialize};

use crate::gemini::GeminiConfig;

/// A single grid cell of the store layout.
///
/// `id` is the canonical grid address, derived from `(row, col)` as
/// `"row-col"`. `x`/`y` carry the same coordinates as integers for distance
/// math (`x` = column, `y` = row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Builds the cell at a grid position, deriving its canonical id.
    pub fn from_grid(row: i32, col: i32) -> Self {
        Self {
            id: format!("{row}-{col}"),
            x: col,
            y: row,
        }
    }
}

/// A shopping-list entry. Many products may share a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    #[serde(alias = "cell_id")]
    pub cell_id: String,
}

impl Product {
    pub fn new(name: impl Into<String>, cell_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell_id: cell_id.into(),
        }
    }
}

/// One stop of a finished route.
///
/// `products` is empty for synthetic entrance/checkout steps that were not
/// otherwise on the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    /// 1-based position within the route.
    pub order: u32,
    pub cell_id: String,
    #[serde(default)]
    pub products: Vec<String>,
}

/// Provenance of a route: which solver produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    Local,
    External,
}

/// A finished route, handed to the persistence collaborator unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub steps: Vec<RouteStep>,
    pub total_distance: f64,
    pub source: RouteSource,
}

/// Mandatory boundary cells of the store.
///
/// `checkout_cells` keeps the caller's enumeration order; nearest-checkout
/// ties are broken by it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConstraints {
    #[serde(default)]
    pub entrance_cell: Option<String>,
    #[serde(default)]
    pub checkout_cells: Vec<String>,
}

/// Everything the engine needs for one planning call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub cells: Vec<Cell>,
    pub products: Vec<Product>,
    #[serde(flatten)]
    pub constraints: StoreConstraints,
    #[serde(default)]
    pub external_provider_config: Option<GeminiConfig>,
}
