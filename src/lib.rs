//! aisle-planner core
//!
//! Turns a shopping list plus store-grid geometry into an ordered,
//! constraint-satisfying route over a grid-modeled retail store. Stateless:
//! every call is a pure function of its request, apart from an optional
//! single call to an external route provider.

pub mod traits;
pub mod route;
pub mod grid;
pub mod solver;
pub mod gemini;
pub mod postprocess;
pub mod engine;
