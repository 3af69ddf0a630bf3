//! Post-merge repairs: singleton consolidation and fleet-size reduction.

use crate::evaluation::RouteEvaluator;
use crate::models::{Echelon, Route, Stop};

/// Replaces every leftover singleton route with one singleton per served
/// node, loaded at the node's closest origin.
///
/// After the merge pass a node that was never merged still has one
/// singleton per origin. Nodes are re-seated in the order their first
/// singleton appears. Returns the number of re-seated nodes.
pub fn repair_singletons<E: Echelon>(echelon: &E, routes: &mut Vec<Route>) -> usize {
    let mut lonely: Vec<usize> = Vec::new();
    for route in routes.iter().filter(|r| r.is_singleton()) {
        if let Some(stop) = route.first() {
            let served = stop.served();
            if !lonely.contains(&served) {
                lonely.push(served);
            }
        }
    }
    if lonely.is_empty() {
        return 0;
    }

    routes.retain(|r| !r.is_singleton());
    for &served in &lonely {
        routes.push(Route::singleton(served, echelon.closest_origin(served)));
    }
    lonely.len()
}

/// Brings the route count down to the fleet size.
///
/// The shortest routes are dissolved and their nodes re-inserted, one at a
/// time in global-id order, at the first feasible position of the remaining
/// routes. Nodes that fit nowhere are returned; the routes never exceed the
/// fleet size afterwards.
pub fn repair_fleet_size<E: Echelon>(
    evaluator: &RouteEvaluator<'_, E>,
    routes: &mut Vec<Route>,
) -> Vec<usize> {
    let echelon = evaluator.echelon();
    let limit = echelon.fleet().vehicle_count();
    if routes.len() <= limit {
        return Vec::new();
    }
    let excess = routes.len() - limit;

    routes.sort_by_key(Route::len);
    let mut displaced: Vec<(usize, usize)> = routes
        .drain(..excess)
        .flat_map(|r| r.assignments().collect::<Vec<_>>())
        .collect();
    displaced.sort_by_key(|&(served, _)| echelon.served_id(served));

    let mut stranded = Vec::new();
    for (served, origin) in displaced {
        if !insert_first_fit(evaluator, routes, served, origin) {
            stranded.push(served);
        }
    }
    stranded
}

/// Inserts `served` (loaded at `origin`) into the first route and position
/// that stays feasible.
///
/// The visit goes in front of an existing visit; the load goes right after
/// the nearest load stop before it.
fn insert_first_fit<E: Echelon>(
    evaluator: &RouteEvaluator<'_, E>,
    routes: &mut [Route],
    served: usize,
    origin: usize,
) -> bool {
    for route in routes.iter_mut() {
        for k in 1..route.len() {
            if !route.stops()[k].is_visit() {
                continue;
            }
            let mut candidate = route.clone();
            candidate.insert(k, Stop::Visit { served });
            let anchor = candidate.stops()[..k]
                .iter()
                .rposition(Stop::is_load)
                .map_or(0, |p| p + 1);
            candidate.insert(anchor, Stop::Load { served, origin });

            if evaluator.is_route_feasible(&candidate) {
                *route = candidate;
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::models::{Customer, Depot, Fleet, Instance, Satellite, SecondEchelon};

    fn load(served: usize, origin: usize) -> Stop {
        Stop::Load { served, origin }
    }

    fn visit(served: usize) -> Stop {
        Stop::Visit { served }
    }

    fn instance(vehicles: usize, capacity: i32) -> Instance {
        Instance::euclidean(
            vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
            vec![
                Satellite::new(0, 1, 0.0, 0.0, 0.0),
                Satellite::new(1, 2, 10.0, 0.0, 0.0),
            ],
            vec![
                Customer::new(0, 3, 1.0, 0.0, 0.0, 4),
                Customer::new(1, 4, 2.0, 0.0, 0.0, 4),
                Customer::new(2, 5, 9.0, 0.0, 0.0, 4),
            ],
            Fleet::new(1, 100),
            Fleet::new(vehicles, capacity),
        )
        .expect("valid instance")
    }

    #[test]
    fn test_singletons_go_to_closest_origin() {
        let inst = instance(3, 10);
        let e = SecondEchelon::new(&inst);
        let merged = Route::from_stops(vec![load(0, 0), load(1, 0), visit(0), visit(1)]);
        let mut routes = vec![Route::singleton(2, 0), merged.clone(), Route::singleton(2, 1)];

        assert_eq!(repair_singletons(&e, &mut routes), 1);
        assert_eq!(routes, vec![merged, Route::singleton(2, 1)]);
    }

    #[test]
    fn test_singleton_order_follows_first_appearance() {
        let inst = instance(3, 10);
        let e = SecondEchelon::new(&inst);
        let mut routes = vec![
            Route::singleton(1, 1),
            Route::singleton(0, 0),
            Route::singleton(1, 0),
            Route::singleton(0, 1),
        ];
        assert_eq!(repair_singletons(&e, &mut routes), 2);
        assert_eq!(routes, vec![Route::singleton(1, 0), Route::singleton(0, 0)]);
    }

    #[test]
    fn test_no_singletons_is_noop() {
        let inst = instance(3, 10);
        let e = SecondEchelon::new(&inst);
        let mut routes = vec![Route::from_stops(vec![
            load(0, 0),
            load(1, 0),
            visit(0),
            visit(1),
        ])];
        let before = routes.clone();
        assert_eq!(repair_singletons(&e, &mut routes), 0);
        assert_eq!(routes, before);
    }

    #[test]
    fn test_fleet_repair_within_limit_is_noop() {
        let inst = instance(3, 10);
        let e = SecondEchelon::new(&inst);
        let config = SolverConfig::default();
        let evaluator = RouteEvaluator::new(&e, &config);
        let mut routes = vec![Route::singleton(0, 0), Route::singleton(1, 0)];
        let before = routes.clone();
        assert!(repair_fleet_size(&evaluator, &mut routes).is_empty());
        assert_eq!(routes, before);
    }

    #[test]
    fn test_fleet_repair_reinserts_shortest_route() {
        let inst = instance(1, 20);
        let e = SecondEchelon::new(&inst);
        let config = SolverConfig::default();
        let evaluator = RouteEvaluator::new(&e, &config);
        let mut routes = vec![
            Route::from_stops(vec![load(0, 0), load(1, 0), visit(0), visit(1)]),
            Route::singleton(2, 1),
        ];

        let stranded = repair_fleet_size(&evaluator, &mut routes);
        assert!(stranded.is_empty());
        assert_eq!(routes.len(), 1);
        // in front of the first visit, load right after the last leading load
        assert_eq!(
            routes[0].stops(),
            &[load(0, 0), load(1, 0), load(2, 1), visit(2), visit(0), visit(1)]
        );
    }

    #[test]
    fn test_fleet_repair_strands_nodes_without_room() {
        let inst = instance(1, 8);
        let e = SecondEchelon::new(&inst);
        let config = SolverConfig::default();
        let evaluator = RouteEvaluator::new(&e, &config);
        let mut routes = vec![
            Route::from_stops(vec![load(0, 0), load(1, 0), visit(0), visit(1)]),
            Route::singleton(2, 1),
        ];

        let stranded = repair_fleet_size(&evaluator, &mut routes);
        assert_eq!(stranded, vec![2]);
        assert_eq!(routes.len(), 1);
        assert!(evaluator.check_capacity(&routes));
    }

    #[test]
    fn test_fleet_repair_zero_vehicles() {
        let inst = instance(0, 20);
        let e = SecondEchelon::new(&inst);
        let config = SolverConfig::default();
        let evaluator = RouteEvaluator::new(&e, &config);
        let mut routes = vec![Route::singleton(1, 0), Route::singleton(0, 0)];

        let stranded = repair_fleet_size(&evaluator, &mut routes);
        assert!(routes.is_empty());
        // reported in global-id order
        assert_eq!(stranded, vec![0, 1]);
    }
}
