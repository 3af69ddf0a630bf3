//! Solution and violation types.

use serde::{Deserialize, Serialize};

use super::{EchelonLevel, Route, SatelliteLoads};

/// A type of constraint violation in a route set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Vehicle load exceeds capacity at some point of the route.
    CapacityExceeded {
        /// Route index in the route set.
        route_index: usize,
        /// Load that exceeded capacity.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// Service starts after the served node's time window closes.
    TimeWindowViolated {
        /// Route index in the route set.
        route_index: usize,
        /// Served node (local id) where the violation occurred.
        served: usize,
        /// Service start time.
        start: f64,
        /// Time window due date.
        due: f64,
    },
    /// The vehicle arrives early and would have to wait, which is disabled.
    WaitingNotAllowed {
        /// Route index in the route set.
        route_index: usize,
        /// Served node (local id) where the vehicle would wait.
        served: usize,
        /// Arrival time.
        arrival: f64,
        /// Service start time.
        start: f64,
    },
    /// More routes than vehicles.
    FleetSizeExceeded {
        /// Number of routes.
        routes: usize,
        /// Number of vehicles.
        vehicles: usize,
    },
    /// A served node has no visit in any route.
    Unserved {
        /// Served node (local id).
        served: usize,
    },
    /// A served node is visited more than once.
    Duplicated {
        /// Served node (local id).
        served: usize,
        /// Number of visits found.
        visits: usize,
    },
}

/// A constraint violation on one echelon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Echelon the violation belongs to.
    pub level: EchelonLevel,
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(level: EchelonLevel, kind: ViolationType) -> Self {
        Self { level, kind }
    }
}

/// Outcome of solving one echelon.
///
/// Fleet-size repair may fail to place some nodes anywhere; those are
/// reported instead of being dropped.
///
/// # Examples
///
/// ```
/// use u_echelon::models::{EchelonSolution, Route};
///
/// let sol = EchelonSolution::new(vec![Route::singleton(0, 0)], vec![]);
/// assert!(sol.is_complete());
///
/// let partial = EchelonSolution::new(vec![Route::singleton(0, 0)], vec![1]);
/// assert_eq!(partial.unplaced(), &[1]);
/// assert_eq!(partial.num_routes(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EchelonSolution {
    /// Every served node is in exactly one route.
    Solved(Vec<Route>),
    /// Some served nodes could not be placed.
    PartiallyUnplaced {
        /// Routes built.
        routes: Vec<Route>,
        /// Local ids of the stranded nodes.
        unplaced: Vec<usize>,
    },
}

impl EchelonSolution {
    /// Picks the variant from the list of stranded nodes.
    pub fn new(routes: Vec<Route>, unplaced: Vec<usize>) -> Self {
        if unplaced.is_empty() {
            EchelonSolution::Solved(routes)
        } else {
            EchelonSolution::PartiallyUnplaced { routes, unplaced }
        }
    }

    /// Routes of this echelon.
    pub fn routes(&self) -> &[Route] {
        match self {
            EchelonSolution::Solved(routes)
            | EchelonSolution::PartiallyUnplaced { routes, .. } => routes,
        }
    }

    /// Stranded nodes (empty when solved).
    pub fn unplaced(&self) -> &[usize] {
        match self {
            EchelonSolution::Solved(_) => &[],
            EchelonSolution::PartiallyUnplaced { unplaced, .. } => unplaced,
        }
    }

    /// Returns `true` if no node was stranded.
    pub fn is_complete(&self) -> bool {
        matches!(self, EchelonSolution::Solved(_))
    }

    /// Number of routes (vehicles used).
    pub fn num_routes(&self) -> usize {
        self.routes().len()
    }
}

/// A complete two-echelon solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    first: EchelonSolution,
    second: EchelonSolution,
    satellite_loads: SatelliteLoads,
}

impl Solution {
    /// Creates a solution from both echelons and the loads linking them.
    pub fn new(
        first: EchelonSolution,
        second: EchelonSolution,
        satellite_loads: SatelliteLoads,
    ) -> Self {
        Self {
            first,
            second,
            satellite_loads,
        }
    }

    /// Depot → satellite routes.
    pub fn first_echelon(&self) -> &EchelonSolution {
        &self.first
    }

    /// Satellite → customer routes.
    pub fn second_echelon(&self) -> &EchelonSolution {
        &self.second
    }

    /// Satellite demand derived from the second echelon.
    pub fn satellite_loads(&self) -> &SatelliteLoads {
        &self.satellite_loads
    }

    /// Returns `true` if neither echelon stranded a node.
    pub fn is_complete(&self) -> bool {
        self.first.is_complete() && self.second.is_complete()
    }

    /// Total number of vehicles used.
    pub fn num_routes(&self) -> usize {
        self.first.num_routes() + self.second.num_routes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echelon_solution_variants() {
        let solved = EchelonSolution::new(vec![Route::singleton(0, 0)], vec![]);
        assert!(matches!(solved, EchelonSolution::Solved(_)));
        assert!(solved.unplaced().is_empty());

        let partial = EchelonSolution::new(vec![], vec![2, 3]);
        assert!(!partial.is_complete());
        assert_eq!(partial.unplaced(), &[2, 3]);
        assert_eq!(partial.num_routes(), 0);
    }

    #[test]
    fn test_solution_accessors() {
        let mut loads = SatelliteLoads::new();
        loads.add(1, 5);
        let sol = Solution::new(
            EchelonSolution::new(vec![Route::singleton(0, 0)], vec![]),
            EchelonSolution::new(vec![Route::singleton(0, 0), Route::singleton(1, 0)], vec![]),
            loads,
        );
        assert_eq!(sol.num_routes(), 3);
        assert!(sol.is_complete());
        assert_eq!(sol.satellite_loads().get(1), 5);
        assert_eq!(sol.second_echelon().num_routes(), 2);
    }

    #[test]
    fn test_violation_types() {
        let v = Violation::new(
            EchelonLevel::Second,
            ViolationType::CapacityExceeded {
                route_index: 0,
                load: 250,
                capacity: 200,
            },
        );
        assert_eq!(v.level, EchelonLevel::Second);
        assert_eq!(
            v.kind,
            ViolationType::CapacityExceeded {
                route_index: 0,
                load: 250,
                capacity: 200,
            }
        );
    }
}
