//! Domain model types for two-echelon routing.
//!
//! Provides the network vertices (depots, satellites, customers), fleets,
//! routes as sequences of load/visit stops, the validated problem instance,
//! and the [`Echelon`] trait that lets one engine solve both levels.

mod echelon;
mod fleet;
mod instance;
mod node;
mod route;
mod solution;

pub use echelon::{
    Echelon, EchelonLevel, FirstEchelon, RouteDisplay, SatelliteLoads, SecondEchelon,
};
pub use fleet::Fleet;
pub use instance::{Instance, InstanceError};
pub use node::{Customer, Depot, Node, Satellite, Site, TimeWindow};
pub use route::{Route, Stop};
pub use solution::{EchelonSolution, Solution, Violation, ViolationType};
