//! Route merge engine.
//!
//! # Algorithm
//!
//! Savings are consumed in order. For each one the engine looks for a route
//! ending with `served_i` (loaded at `origin_i`) and a route starting with
//! the load of `served_j` at `origin_j`, then joins them:
//!
//! ```text
//! classic (same origin):   [L(a,s) L(i,s) V(a) V(i)] + [L(j,s) V(j)]
//!                       -> [L(a,s) L(i,s) L(j,s) V(a) V(i) V(j)]
//! refill (other origin):   [L(i,s) V(i)] + [L(j,t) V(j)]
//!                       -> [L(i,s) V(i) L(j,t) V(j)]
//! ```
//!
//! A merge is planned as a value (new route + routes it replaces) and only
//! applied if the new route is feasible. Committing also drops the
//! alternative singleton assignments of both nodes left over from the
//! initial all-pairs construction.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::savings::Saving;
use crate::config::SolverConfig;
use crate::evaluation::RouteEvaluator;
use crate::models::{Echelon, Route, Stop};

/// How two routes were joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeKind {
    /// Same origin: load markers stay contiguous, visits follow.
    Classic,
    /// Concatenation with a reload at the second origin.
    Refill,
}

/// Why a saving did not produce a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeRejection {
    /// No route ends with the i-node or starts with the j-node, or both are
    /// the same route.
    Unmatched,
    /// Every candidate merged route violates a constraint.
    Infeasible,
}

/// A validated merge, ready to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct MergePlan {
    /// Strategy that produced `merged`.
    pub kind: MergeKind,
    /// The route replacing the removed ones.
    pub merged: Route,
    /// Indices of the routes to drop, ascending.
    pub removed: Vec<usize>,
}

impl MergePlan {
    /// Commits the plan: drops the replaced routes and appends the merged one.
    pub fn apply(self, routes: &mut Vec<Route>) {
        let mut idx = 0;
        routes.retain(|_| {
            let keep = self.removed.binary_search(&idx).is_err();
            idx += 1;
            keep
        });
        routes.push(self.merged);
    }
}

/// Outcome counters of one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Classic merges committed.
    pub classic: usize,
    /// Refill merges committed.
    pub refill: usize,
    /// Savings whose merged route was infeasible.
    pub rejected: usize,
    /// Savings with no matching route pair.
    pub unmatched: usize,
}

impl MergeStats {
    /// Total merges committed.
    pub fn committed(&self) -> usize {
        self.classic + self.refill
    }
}

/// Builds the degenerate starting solution: every served node on its own
/// route from every origin.
///
/// # Examples
///
/// ```
/// use u_echelon::models::{Customer, Depot, Fleet, Instance, Satellite, SecondEchelon};
/// use u_echelon::constructive::initial_routes;
///
/// let instance = Instance::euclidean(
///     vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
///     vec![Satellite::new(0, 1, 0.0, 0.0, 0.0), Satellite::new(1, 2, 5.0, 0.0, 0.0)],
///     vec![Customer::new(0, 3, 1.0, 0.0, 0.0, 1), Customer::new(1, 4, 2.0, 0.0, 0.0, 1)],
///     Fleet::new(1, 10),
///     Fleet::new(2, 10),
/// )
/// .unwrap();
/// let routes = initial_routes(&SecondEchelon::new(&instance));
/// assert_eq!(routes.len(), 4);
/// assert!(routes.iter().all(|r| r.is_singleton()));
/// ```
pub fn initial_routes<E: Echelon>(echelon: &E) -> Vec<Route> {
    let num_served = echelon.served().len();
    (0..echelon.origins().len())
        .flat_map(|origin| (0..num_served).map(move |served| Route::singleton(served, origin)))
        .collect()
}

/// Index of the first route whose last stop concerns `served` loaded at `origin`.
pub fn locate_i_route(routes: &[Route], served: usize, origin: usize) -> Option<usize> {
    routes
        .iter()
        .position(|r| r.ends_with_served_from(served, origin))
}

/// Index of the first route that starts with `Load(served, origin)`.
pub fn locate_j_route(routes: &[Route], served: usize, origin: usize) -> Option<usize> {
    routes.iter().position(|r| r.starts_with_load(served, origin))
}

/// Classic merge: the j-route's leading loads go right after
/// `Load(served_i, origin_i)`, the rest of the j-route is appended.
///
/// Returns `None` if the i-route has no such load stop.
pub fn classic_merge(i_route: &Route, j_route: &Route, served_i: usize, origin_i: usize) -> Option<Route> {
    let anchor = i_route.position(&Stop::Load {
        served: served_i,
        origin: origin_i,
    })?;
    let lead = j_route.leading_loads();
    let j_stops = j_route.stops();

    let mut stops = Vec::with_capacity(i_route.len() + j_route.len());
    stops.extend_from_slice(&i_route.stops()[..=anchor]);
    stops.extend_from_slice(&j_stops[..lead]);
    stops.extend_from_slice(&i_route.stops()[anchor + 1..]);
    stops.extend_from_slice(&j_stops[lead..]);
    Some(Route::from_stops(stops))
}

/// Refill merge: the i-route followed by the j-route.
pub fn refill_merge(i_route: &Route, j_route: &Route) -> Route {
    let mut stops = Vec::with_capacity(i_route.len() + j_route.len());
    stops.extend_from_slice(i_route.stops());
    stops.extend_from_slice(j_route.stops());
    Route::from_stops(stops)
}

/// Greedy single-pass merging of routes along a savings list.
pub struct MergeEngine<'a, E: Echelon> {
    evaluator: RouteEvaluator<'a, E>,
    config: &'a SolverConfig,
}

impl<'a, E: Echelon> MergeEngine<'a, E> {
    /// Creates an engine validating merges against `echelon`'s constraints.
    pub fn new(echelon: &'a E, config: &'a SolverConfig) -> Self {
        Self {
            evaluator: RouteEvaluator::new(echelon, config),
            config,
        }
    }

    /// Plans the merge suggested by `saving` without touching `routes`.
    pub fn plan(&self, routes: &[Route], saving: &Saving) -> Result<MergePlan, MergeRejection> {
        let i = locate_i_route(routes, saving.served_i, saving.origin_i)
            .ok_or(MergeRejection::Unmatched)?;
        let j = locate_j_route(routes, saving.served_j, saving.origin_j)
            .ok_or(MergeRejection::Unmatched)?;
        if i == j || routes[i].is_empty() || routes[j].is_empty() {
            return Err(MergeRejection::Unmatched);
        }
        let (i_route, j_route) = (&routes[i], &routes[j]);

        let mut candidates = Vec::with_capacity(2);
        if saving.origin_i == saving.origin_j {
            if let Some(route) = classic_merge(i_route, j_route, saving.served_i, saving.origin_i) {
                candidates.push((MergeKind::Classic, route));
            }
            if self.config.refill_on_classic_failure() {
                candidates.push((MergeKind::Refill, refill_merge(i_route, j_route)));
            }
        } else {
            candidates.push((MergeKind::Refill, refill_merge(i_route, j_route)));
        }

        let (kind, merged) = candidates
            .into_iter()
            .find(|(_, route)| self.evaluator.is_route_feasible(route))
            .ok_or(MergeRejection::Infeasible)?;

        let removed = routes
            .iter()
            .enumerate()
            .filter(|&(idx, route)| {
                idx == i
                    || idx == j
                    || match route.first() {
                        Some(&Stop::Load { served, origin }) => {
                            (served == saving.served_i && origin != saving.origin_i)
                                || (served == saving.served_j && origin != saving.origin_j)
                        }
                        _ => false,
                    }
            })
            .map(|(idx, _)| idx)
            .collect();

        Ok(MergePlan {
            kind,
            merged,
            removed,
        })
    }

    /// Runs the merge pass over `savings`, mutating `routes` in place.
    pub fn run(&self, routes: &mut Vec<Route>, savings: &[Saving]) -> MergeStats {
        let mut stats = MergeStats::default();
        for saving in savings {
            match self.plan(routes, saving) {
                Ok(plan) => {
                    match plan.kind {
                        MergeKind::Classic => stats.classic += 1,
                        MergeKind::Refill => stats.refill += 1,
                    }
                    trace!(
                        kind = ?plan.kind,
                        value = saving.value,
                        route = %self.evaluator.echelon().display(&plan.merged),
                        "merge committed"
                    );
                    plan.apply(routes);
                }
                Err(MergeRejection::Unmatched) => stats.unmatched += 1,
                Err(MergeRejection::Infeasible) => stats.rejected += 1,
            }
        }
        stats
    }
}
