//! Route evaluator: capacity, time windows, fleet size, coverage and cost.

use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::models::{Echelon, Node, Route, Stop, Violation, ViolationType};

/// Objective value of a route set, split by component.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Distance driven over all closed tours.
    pub travel: f64,
    /// Service time of every loading and unloading operation.
    pub handling: f64,
    /// Fixed cost of the vehicles used.
    pub vehicle_usage: f64,
    /// `travel + handling + vehicle_usage`.
    pub total: f64,
}

impl CostBreakdown {
    /// Builds a breakdown, computing the total.
    pub fn new(travel: f64, handling: f64, vehicle_usage: f64) -> Self {
        Self {
            travel,
            handling,
            vehicle_usage,
            total: travel + handling + vehicle_usage,
        }
    }
}

/// Evaluates routes of one echelon against its fleet, demands and time windows.
///
/// Pure: every method only reads the routes it is given.
///
/// # Examples
///
/// ```
/// use u_echelon::models::{
///     Customer, Depot, Fleet, Instance, Route, Satellite, SecondEchelon,
/// };
/// use u_echelon::evaluation::RouteEvaluator;
/// use u_echelon::SolverConfig;
///
/// let instance = Instance::euclidean(
///     vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
///     vec![Satellite::new(0, 1, 0.0, 0.0, 0.0)],
///     vec![Customer::new(0, 2, 3.0, 4.0, 1.0, 10)],
///     Fleet::new(1, 100),
///     Fleet::new(1, 20).with_fixed_cost(100.0),
/// )
/// .unwrap();
/// let echelon = SecondEchelon::new(&instance);
/// let config = SolverConfig::default();
/// let evaluator = RouteEvaluator::new(&echelon, &config);
///
/// let routes = vec![Route::singleton(0, 0)];
/// assert!(evaluator.check_capacity(&routes));
/// let cost = evaluator.evaluate(&routes);
/// assert!((cost.travel - 10.0).abs() < 1e-10);
/// assert!((cost.total - 111.0).abs() < 1e-10);
/// ```
pub struct RouteEvaluator<'a, E: Echelon> {
    echelon: &'a E,
    config: &'a SolverConfig,
}

impl<'a, E: Echelon> RouteEvaluator<'a, E> {
    /// Creates a new evaluator for the given echelon.
    pub fn new(echelon: &'a E, config: &'a SolverConfig) -> Self {
        Self { echelon, config }
    }

    /// The echelon being evaluated.
    pub fn echelon(&self) -> &'a E {
        self.echelon
    }

    /// First prefix of `route` whose load exceeds the vehicle capacity.
    pub fn capacity_violation(&self, route: &Route, route_index: usize) -> Option<Violation> {
        let capacity = self.echelon.fleet().vehicle_capacity();
        let mut load: i32 = 0;
        for stop in route.stops() {
            match *stop {
                Stop::Load { served, .. } => load += self.echelon.demand(served),
                Stop::Visit { served } => load -= self.echelon.demand(served),
            }
            if load > capacity {
                return Some(Violation::new(
                    E::LEVEL,
                    ViolationType::CapacityExceeded {
                        route_index,
                        load,
                        capacity,
                    },
                ));
            }
        }
        None
    }

    /// First time window (or forbidden wait) violated along `route`.
    ///
    /// Time starts at zero on the first stop. Every load stop costs its
    /// origin's handling time, charged when the vehicle moves on to the next
    /// load at the same origin or leaves toward a served node. Arriving at a
    /// served node starts service at `max(ready, arrival)` and adds its
    /// service time.
    pub fn time_window_violation(&self, route: &Route, route_index: usize) -> Option<Violation> {
        let stops = route.stops();
        let n = stops.len();
        let mut time = 0.0;

        for (idx, current) in stops.iter().enumerate() {
            let next = &stops[(idx + 1) % n];
            let from = self.echelon.location(current);
            match *next {
                Stop::Visit { served } => {
                    if let Stop::Load { origin, .. } = *current {
                        time += self.echelon.origins()[origin].service_time();
                    }
                    let arrival = time + self.echelon.distance(from, self.echelon.served_id(served));
                    let window = self.echelon.time_window(served);
                    let start = window.map_or(arrival, |tw| tw.service_start(arrival));

                    if let Some(tw) = window {
                        if tw.is_violated(start) {
                            return Some(Violation::new(
                                E::LEVEL,
                                ViolationType::TimeWindowViolated {
                                    route_index,
                                    served,
                                    start,
                                    due: tw.due(),
                                },
                            ));
                        }
                    }
                    if !self.config.allow_waiting_time() && start > arrival {
                        return Some(Violation::new(
                            E::LEVEL,
                            ViolationType::WaitingNotAllowed {
                                route_index,
                                served,
                                arrival,
                                start,
                            },
                        ));
                    }
                    time = start + self.echelon.served()[served].service_time();
                }
                Stop::Load { origin, .. } => {
                    if current.origin() == Some(origin) {
                        time += self.echelon.origins()[origin].service_time();
                    }
                    time += self.echelon.distance(from, self.echelon.origin_id(origin));
                }
            }
        }
        None
    }

    /// Returns `true` if `route` respects capacity and time windows.
    pub fn is_route_feasible(&self, route: &Route) -> bool {
        self.capacity_violation(route, 0).is_none()
            && self.time_window_violation(route, 0).is_none()
    }

    /// Returns `true` if every route respects the vehicle capacity.
    pub fn check_capacity(&self, routes: &[Route]) -> bool {
        routes
            .iter()
            .enumerate()
            .all(|(i, r)| self.capacity_violation(r, i).is_none())
    }

    /// Returns `true` if every route respects the time windows.
    pub fn check_time_windows(&self, routes: &[Route]) -> bool {
        routes
            .iter()
            .enumerate()
            .all(|(i, r)| self.time_window_violation(r, i).is_none())
    }

    /// Returns `true` if the fleet has enough vehicles for every route.
    pub fn check_fleet_size(&self, routes: &[Route]) -> bool {
        routes.len() <= self.echelon.fleet().vehicle_count()
    }

    /// Visit counts per served node.
    fn visit_counts(&self, routes: &[Route]) -> Vec<usize> {
        let mut counts = vec![0usize; self.echelon.served().len()];
        for route in routes {
            for served in route.served_nodes() {
                counts[served] += 1;
            }
        }
        counts
    }

    /// Served nodes that no route visits.
    pub fn unserved(&self, routes: &[Route]) -> Vec<usize> {
        self.visit_counts(routes)
            .iter()
            .enumerate()
            .filter(|(_, &n)| n == 0)
            .map(|(served, _)| served)
            .collect()
    }

    /// Served nodes visited more than once, with their visit count.
    pub fn duplicated(&self, routes: &[Route]) -> Vec<(usize, usize)> {
        self.visit_counts(routes)
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 1)
            .map(|(served, &n)| (served, n))
            .collect()
    }

    /// Every violation of the route set: per-route capacity and time
    /// windows, fleet size, and coverage.
    pub fn violations(&self, routes: &[Route]) -> Vec<Violation> {
        let mut violations: Vec<Violation> = routes
            .iter()
            .enumerate()
            .flat_map(|(i, r)| {
                self.capacity_violation(r, i)
                    .into_iter()
                    .chain(self.time_window_violation(r, i))
            })
            .collect();

        if !self.check_fleet_size(routes) {
            violations.push(Violation::new(
                E::LEVEL,
                ViolationType::FleetSizeExceeded {
                    routes: routes.len(),
                    vehicles: self.echelon.fleet().vehicle_count(),
                },
            ));
        }
        for served in self.unserved(routes) {
            violations.push(Violation::new(E::LEVEL, ViolationType::Unserved { served }));
        }
        for (served, visits) in self.duplicated(routes) {
            violations.push(Violation::new(
                E::LEVEL,
                ViolationType::Duplicated { served, visits },
            ));
        }
        violations
    }

    /// Travel distance and handling time of one closed route.
    ///
    /// A load stop is charged once per contiguous run at the same origin.
    pub fn route_cost(&self, route: &Route) -> (f64, f64) {
        let stops = route.stops();
        let n = stops.len();
        let mut travel = 0.0;
        let mut handling = 0.0;

        for (idx, current) in stops.iter().enumerate() {
            let next = &stops[(idx + 1) % n];
            travel += self
                .echelon
                .distance(self.echelon.location(current), self.echelon.location(next));
            match *current {
                Stop::Visit { served } => {
                    handling += self.echelon.served()[served].service_time();
                }
                Stop::Load { origin, .. } => {
                    if next.origin() != Some(origin) {
                        handling += self.echelon.origins()[origin].service_time();
                    }
                }
            }
        }
        (travel, handling)
    }

    /// Objective value of a route set.
    pub fn evaluate(&self, routes: &[Route]) -> CostBreakdown {
        let (travel, handling) = routes
            .iter()
            .map(|r| self.route_cost(r))
            .fold((0.0, 0.0), |(t, h), (rt, rh)| (t + rt, h + rh));
        let vehicle_usage = routes.len() as f64 * self.echelon.fleet().vehicle_fixed_cost();
        CostBreakdown::new(travel, handling, vehicle_usage)
    }
}
