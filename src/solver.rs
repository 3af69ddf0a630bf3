//! Two-echelon orchestration: customers first, then satellites.

use tracing::{info, instrument};

use crate::config::SolverConfig;
use crate::constructive::solve_echelon;
use crate::models::{
    FirstEchelon, Instance, Node, Route, SatelliteLoads, SecondEchelon, Solution,
};

/// Sums, per satellite, the demand of the customers loaded there.
///
/// Every satellite of `instance` gets an entry, zero if unused.
pub fn derive_satellite_loads(instance: &Instance, routes: &[Route]) -> SatelliteLoads {
    let mut loads = SatelliteLoads::new();
    for satellite in instance.satellites() {
        loads.add(satellite.global_id(), 0);
    }
    for (customer, satellite) in routes.iter().flat_map(|r| r.assignments()) {
        loads.add(
            instance.satellites()[satellite].global_id(),
            instance.customers()[customer].demand(),
        );
    }
    loads
}

/// Solves both levels of a two-echelon instance.
///
/// The second echelon (satellites → customers) is solved first; the load
/// each satellite has to supply then becomes its demand on the first
/// echelon (depots → satellites).
///
/// # Examples
///
/// ```
/// use u_echelon::models::{Customer, Depot, Fleet, Instance, Satellite};
/// use u_echelon::{SolverConfig, TwoEchelonSolver};
///
/// let instance = Instance::euclidean(
///     vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
///     vec![Satellite::new(0, 1, 10.0, 0.0, 0.0)],
///     vec![
///         Customer::new(0, 2, 11.0, 0.0, 0.0, 5),
///         Customer::new(1, 3, 12.0, 0.0, 0.0, 5),
///     ],
///     Fleet::new(1, 50),
///     Fleet::new(1, 20),
/// )
/// .unwrap();
///
/// let solution = TwoEchelonSolver::new(&instance, SolverConfig::default()).solve();
/// assert!(solution.is_complete());
/// assert_eq!(solution.satellite_loads().get(1), 10);
/// assert_eq!(solution.num_routes(), 2);
/// ```
pub struct TwoEchelonSolver<'a> {
    instance: &'a Instance,
    config: SolverConfig,
}

impl<'a> TwoEchelonSolver<'a> {
    /// Creates a solver for `instance`.
    pub fn new(instance: &'a Instance, config: SolverConfig) -> Self {
        Self { instance, config }
    }

    /// Runs the savings heuristic on both echelons.
    #[instrument(skip_all)]
    pub fn solve(&self) -> Solution {
        let instance = self.instance;
        info!(
            depots = instance.depots().len(),
            satellites = instance.satellites().len(),
            customers = instance.customers().len(),
            "solving two-echelon instance"
        );

        let second = solve_echelon(&SecondEchelon::new(instance), &self.config);
        let loads = derive_satellite_loads(instance, second.routes());
        info!(
            routes = second.num_routes(),
            unplaced = second.unplaced().len(),
            total_load = loads.total(),
            "second echelon solved"
        );

        let first = solve_echelon(&FirstEchelon::new(instance, &loads), &self.config);
        info!(
            routes = first.num_routes(),
            unplaced = first.unplaced().len(),
            "first echelon solved"
        );

        Solution::new(first, second, loads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluate_solution;
    use crate::models::{Customer, Depot, Fleet, Satellite, Stop};

    fn instance(first_vehicles: usize) -> Instance {
        Instance::euclidean(
            vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
            vec![
                Satellite::new(0, 1, 10.0, 0.0, 1.0),
                Satellite::new(1, 2, -10.0, 0.0, 1.0),
                Satellite::new(2, 3, 0.0, 50.0, 1.0),
            ],
            vec![
                Customer::new(0, 4, 11.0, 0.0, 0.0, 3),
                Customer::new(1, 5, 12.0, 0.0, 0.0, 4),
                Customer::new(2, 6, -11.0, 0.0, 0.0, 5),
            ],
            Fleet::new(first_vehicles, 100),
            Fleet::new(3, 100),
        )
        .expect("valid instance")
    }

    #[test]
    fn test_derive_satellite_loads() {
        let inst = instance(1);
        let routes = vec![
            Route::from_stops(vec![
                Stop::Load { served: 0, origin: 0 },
                Stop::Load { served: 1, origin: 0 },
                Stop::Visit { served: 0 },
                Stop::Visit { served: 1 },
            ]),
            Route::singleton(2, 1),
        ];
        let loads = derive_satellite_loads(&inst, &routes);
        assert_eq!(loads.get(1), 7);
        assert_eq!(loads.get(2), 5);
        assert_eq!(loads.get(3), 0);
        assert_eq!(loads.iter().count(), 3);
        assert_eq!(loads.total(), 12);
    }

    #[test]
    fn test_loads_match_customer_demand() {
        let inst = instance(1);
        let solution = TwoEchelonSolver::new(&inst, SolverConfig::default()).solve();
        assert!(solution.is_complete());
        assert_eq!(solution.satellite_loads().total(), 12);
    }

    #[test]
    fn test_solution_feasible() {
        let inst = instance(1);
        let config = SolverConfig::default();
        let solution = TwoEchelonSolver::new(&inst, config).solve();
        let report = evaluate_solution(&inst, &solution, &config);
        assert!(report.is_feasible(), "{:?}", report.violations);
        assert_eq!(solution.first_echelon().num_routes(), 1);
    }

    #[test]
    fn test_deterministic() {
        let inst = instance(2);
        let solver = TwoEchelonSolver::new(&inst, SolverConfig::default());
        assert_eq!(solver.solve(), solver.solve());
    }
}
