//! Clarke-Wright savings for one echelon of a two-echelon network.
//!
//! # Algorithm
//!
//! The savings algorithm (Clarke & Wright, 1964) starts from singleton
//! routes and merges them in decreasing order of savings. With several
//! origins every served node starts on one singleton per origin, and two
//! routes loading at different origins may be chained through a refill
//! stop:
//!
//! ```text
//! s(i, j)   = d(o, i) + d(o, j) - d(i, j)                 same origin o
//! s(i, j)   = d(o, i) + d(p, j) - d(i, p) - d(j, o)       origins o != p
//! ```
//!
//! After merging, leftover singletons are collapsed onto the closest
//! origin, and routes beyond the fleet size are dissolved and re-inserted.
//!
//! # Complexity
//!
//! O(O²S² log(OS)) for O origins and S served nodes, dominated by sorting
//! the savings list.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use tracing::{debug, instrument, warn};

use super::merge::{initial_routes, MergeEngine};
use super::repair::{repair_fleet_size, repair_singletons};
use super::savings::compute_savings;
use crate::config::SolverConfig;
use crate::evaluation::RouteEvaluator;
use crate::models::{Echelon, EchelonSolution};

/// Builds the routes of one echelon with the multi-origin savings heuristic.
///
/// The result covers every served node exactly once unless the fleet is too
/// small, in which case the nodes that could not be re-inserted are
/// reported through [`EchelonSolution::PartiallyUnplaced`].
///
/// # Examples
///
/// ```
/// use u_echelon::models::{Customer, Depot, Fleet, Instance, Satellite, SecondEchelon};
/// use u_echelon::constructive::solve_echelon;
/// use u_echelon::SolverConfig;
///
/// let instance = Instance::euclidean(
///     vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
///     vec![Satellite::new(0, 1, 0.0, 0.0, 0.0)],
///     vec![
///         Customer::new(0, 2, 1.0, 0.0, 0.0, 10),
///         Customer::new(1, 3, 2.0, 0.0, 0.0, 10),
///         Customer::new(2, 4, 3.0, 0.0, 0.0, 10),
///     ],
///     Fleet::new(1, 100),
///     Fleet::new(3, 30),
/// )
/// .unwrap();
///
/// let solution = solve_echelon(&SecondEchelon::new(&instance), &SolverConfig::default());
/// assert!(solution.is_complete());
/// assert_eq!(solution.num_routes(), 1);
/// ```
#[instrument(skip_all, level = "debug", fields(echelon = %E::LEVEL))]
pub fn solve_echelon<E: Echelon>(echelon: &E, config: &SolverConfig) -> EchelonSolution {
    let savings = compute_savings(echelon);
    let mut routes = initial_routes(echelon);
    debug!(
        savings = savings.len(),
        routes = routes.len(),
        "initial solution built"
    );

    let stats = MergeEngine::new(echelon, config).run(&mut routes, &savings);
    debug!(
        classic = stats.classic,
        refill = stats.refill,
        rejected = stats.rejected,
        unmatched = stats.unmatched,
        routes = routes.len(),
        "merge pass finished"
    );

    let reseated = repair_singletons(echelon, &mut routes);
    if reseated > 0 {
        debug!(reseated, routes = routes.len(), "singletons moved to closest origin");
    }

    let evaluator = RouteEvaluator::new(echelon, config);
    let unplaced = repair_fleet_size(&evaluator, &mut routes);
    if !unplaced.is_empty() {
        warn!(
            ?unplaced,
            vehicles = echelon.fleet().vehicle_count(),
            "fleet too small, nodes left unplaced"
        );
    }

    debug!(routes = routes.len(), "echelon solved");
    EchelonSolution::new(routes, unplaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Customer, Depot, FirstEchelon, Fleet, Instance, Route, Satellite, SatelliteLoads,
        SecondEchelon, Stop, TimeWindow,
    };

    fn load(served: usize, origin: usize) -> Stop {
        Stop::Load { served, origin }
    }

    fn visit(served: usize) -> Stop {
        Stop::Visit { served }
    }

    fn line(demand: i32, capacity: i32) -> Instance {
        Instance::euclidean(
            vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
            vec![Satellite::new(0, 1, 0.0, 0.0, 0.0)],
            vec![
                Customer::new(0, 2, 1.0, 0.0, 0.0, demand),
                Customer::new(1, 3, 2.0, 0.0, 0.0, demand),
                Customer::new(2, 4, 3.0, 0.0, 0.0, demand),
            ],
            Fleet::new(1, 100),
            Fleet::new(3, capacity),
        )
        .expect("valid instance")
    }

    #[test]
    fn test_cw_line() {
        let inst = line(10, 30);
        let e = SecondEchelon::new(&inst);
        let config = SolverConfig::default();
        let sol = solve_echelon(&e, &config);
        assert!(sol.is_complete());
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(
            sol.routes()[0].stops(),
            &[load(0, 0), load(1, 0), load(2, 0), visit(0), visit(1), visit(2)]
        );
        // S0 → C0 → C1 → C2 → S0
        let cost = RouteEvaluator::new(&e, &config).evaluate(sol.routes());
        assert!((cost.travel - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_cw_capacity_uses_refills() {
        let inst = line(15, 25);
        let e = SecondEchelon::new(&inst);
        let config = SolverConfig::default();
        let sol = solve_echelon(&e, &config);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(
            sol.routes()[0].stops(),
            &[load(0, 0), visit(0), load(1, 0), visit(1), load(2, 0), visit(2)]
        );
        assert!(RouteEvaluator::new(&e, &config).check_capacity(sol.routes()));
    }

    #[test]
    fn test_cw_capacity_split_without_refill() {
        let inst = line(15, 25);
        let e = SecondEchelon::new(&inst);
        let config = SolverConfig::default().with_refill_on_classic_failure(false);
        let sol = solve_echelon(&e, &config);
        assert!(sol.is_complete());
        assert_eq!(sol.num_routes(), 3);
        assert!(sol.routes().iter().all(Route::is_singleton));
    }

    #[test]
    fn test_cw_single_customer() {
        let inst = Instance::euclidean(
            vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
            vec![
                Satellite::new(0, 1, 0.0, 0.0, 0.0),
                Satellite::new(1, 2, 4.0, 0.0, 0.0),
            ],
            vec![Customer::new(0, 3, 5.0, 0.0, 0.0, 10)],
            Fleet::new(1, 100),
            Fleet::new(1, 100),
        )
        .expect("valid instance");
        let sol = solve_echelon(&SecondEchelon::new(&inst), &SolverConfig::default());
        assert_eq!(sol.routes(), &[Route::singleton(0, 1)]);
    }

    #[test]
    fn test_cw_refill_between_satellites() {
        let inst = Instance::euclidean(
            vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
            vec![
                Satellite::new(0, 1, 0.0, 0.0, 0.0),
                Satellite::new(1, 2, 10.0, 0.0, 0.0),
            ],
            vec![
                Customer::new(0, 3, 1.0, 0.0, 0.0, 5),
                Customer::new(1, 4, 9.0, 0.0, 0.0, 5),
            ],
            Fleet::new(1, 100),
            Fleet::new(1, 100),
        )
        .expect("valid instance");
        let sol = solve_echelon(&SecondEchelon::new(&inst), &SolverConfig::default());
        assert!(sol.is_complete());
        assert_eq!(
            sol.routes()[0].stops(),
            &[load(0, 1), visit(0), load(1, 0), visit(1)]
        );
    }

    #[test]
    fn test_cw_strands_when_fleet_too_small() {
        // Each customer is only reachable in time straight from S0
        let window = TimeWindow::new(0.0, 5.0).expect("valid");
        let inst = Instance::euclidean(
            vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
            vec![Satellite::new(0, 1, 0.0, 0.0, 0.0)],
            vec![
                Customer::new(0, 2, 5.0, 0.0, 0.0, 1).with_time_window(window),
                Customer::new(1, 3, -5.0, 0.0, 0.0, 1).with_time_window(window),
            ],
            Fleet::new(1, 100),
            Fleet::new(1, 100),
        )
        .expect("valid instance");
        let sol = solve_echelon(&SecondEchelon::new(&inst), &SolverConfig::default());
        assert!(!sol.is_complete());
        assert_eq!(sol.unplaced(), &[0]);
        assert_eq!(sol.routes(), &[Route::singleton(1, 0)]);
    }

    #[test]
    fn test_cw_first_echelon() {
        let inst = Instance::euclidean(
            vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
            vec![
                Satellite::new(0, 1, 10.0, 0.0, 0.0),
                Satellite::new(1, 2, 10.0, 1.0, 0.0),
            ],
            vec![Customer::new(0, 3, 11.0, 0.0, 0.0, 5)],
            Fleet::new(2, 50),
            Fleet::new(1, 10),
        )
        .expect("valid instance");
        let mut loads = SatelliteLoads::new();
        loads.add(1, 30);
        loads.add(2, 30);

        // 60 units do not fit one truck
        let sol = solve_echelon(&FirstEchelon::new(&inst, &loads), &SolverConfig::default());
        assert!(sol.is_complete());
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(
            sol.routes()[0].stops(),
            &[load(0, 0), visit(0), load(1, 0), visit(1)]
        );
    }
}
