//! # u-echelon
//!
//! Two-echelon vehicle routing with time windows. Depots supply satellites,
//! satellites supply customers; both levels are built with a multi-origin
//! Clarke-Wright savings heuristic that can chain loads from different
//! origins into one route.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (nodes, fleets, instance, stops, routes, solutions)
//! - [`distance`] — Distance matrix indexed by global node id
//! - [`evaluation`] — Feasibility checking and cost evaluation
//! - [`constructive`] — Savings list, route merging and repairs for one echelon
//! - [`solver`] — Second echelon, satellite loads, then first echelon
//! - [`config`] — Solver options
//!
//! ## Logging
//!
//! The solver emits [`tracing`] events: `info` per echelon, `debug` for the
//! merge and repair passes, `trace` per committed merge, `warn` when nodes
//! are left unplaced. Install any subscriber to see them.

pub mod config;
pub mod constructive;
pub mod distance;
pub mod evaluation;
pub mod models;
pub mod solver;

pub use config::SolverConfig;
pub use solver::{derive_satellite_loads, TwoEchelonSolver};
