//! Core seams of the planning engine.
//!
//! These are intentionally minimal. The external route provider is a trait so
//! the engine can be exercised against canned or failing providers; the
//! persistence collaborator is exposed here but implemented by the host app.

use crate::route::{Cell, Product, RouteResult};

/// An external service that may return an already-ordered route.
///
/// Implementations make at most one request/response call per `plan`
/// invocation. `None` means the provider produced nothing usable; the caller
/// falls back to the local solver. There is no partial credit: a result is
/// either fully well-formed or discarded.
pub trait RouteProvider {
    fn plan(&self, cells: &[Cell], products: &[Product]) -> Option<RouteResult>;
}

/// The collaborator that persists finished routes.
///
/// The engine hands a `RouteResult` over unchanged and propagates whatever
/// status the store returns; consistency of saved routes is owned entirely by
/// the implementor.
pub trait RouteStore {
    type RouteId;
    type Error;

    fn store_route(
        &self,
        user_id: &str,
        store_id: &str,
        route: &RouteResult,
    ) -> Result<Self::RouteId, Self::Error>;
}
