//! Route and stop types.

use serde::{Deserialize, Serialize};

/// One step of a route.
///
/// Node references are positions in the echelon's collections: `served`
/// indexes the lower-level nodes (customers or satellites), `origin` the
/// upper-level nodes (satellites or depots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stop {
    /// `served` is loaded at `origin`. The vehicle is physically at `origin`.
    Load {
        /// Lower-level node whose goods are loaded.
        served: usize,
        /// Upper-level node where the loading happens.
        origin: usize,
    },
    /// Delivery visit to `served`.
    Visit {
        /// Lower-level node being visited.
        served: usize,
    },
}

impl Stop {
    /// The lower-level node this stop concerns.
    pub fn served(&self) -> usize {
        match *self {
            Stop::Load { served, .. } | Stop::Visit { served } => served,
        }
    }

    /// The loading origin, `None` for a visit.
    pub fn origin(&self) -> Option<usize> {
        match *self {
            Stop::Load { origin, .. } => Some(origin),
            Stop::Visit { .. } => None,
        }
    }

    /// Returns `true` for a load stop.
    pub fn is_load(&self) -> bool {
        matches!(self, Stop::Load { .. })
    }

    /// Returns `true` for a visit stop.
    pub fn is_visit(&self) -> bool {
        matches!(self, Stop::Visit { .. })
    }
}

/// A closed vehicle tour: the stop after the last one is the first one.
///
/// A well-formed route holds one load stop and one visit per served node,
/// and starts with a load stop.
///
/// # Examples
///
/// ```
/// use u_echelon::models::{Route, Stop};
///
/// let route = Route::singleton(2, 0);
/// assert!(route.is_singleton());
/// assert_eq!(route.stops()[0], Stop::Load { served: 2, origin: 0 });
/// assert_eq!(route.stops()[1], Stop::Visit { served: 2 });
/// assert_eq!(route.served_nodes(), vec![2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    /// Creates `[Load(served, origin), Visit(served)]`.
    pub fn singleton(served: usize, origin: usize) -> Self {
        Self {
            stops: vec![Stop::Load { served, origin }, Stop::Visit { served }],
        }
    }

    /// Creates a route from an explicit stop sequence.
    pub fn from_stops(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    /// Returns the ordered stops.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Consumes the route, returning its stops.
    pub fn into_stops(self) -> Vec<Stop> {
        self.stops
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the route has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Returns `true` if the route serves a single node (two stops).
    pub fn is_singleton(&self) -> bool {
        self.stops.len() == 2
    }

    /// First stop, if any.
    pub fn first(&self) -> Option<&Stop> {
        self.stops.first()
    }

    /// Last stop, if any.
    pub fn last(&self) -> Option<&Stop> {
        self.stops.last()
    }

    /// Index of the first stop equal to `stop`.
    pub fn position(&self, stop: &Stop) -> Option<usize> {
        self.stops.iter().position(|s| s == stop)
    }

    /// Served nodes in visit order.
    pub fn served_nodes(&self) -> Vec<usize> {
        self.stops
            .iter()
            .filter(|s| s.is_visit())
            .map(|s| s.served())
            .collect()
    }

    /// `(served, origin)` pairs of every load stop, in route order.
    pub fn assignments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.stops.iter().filter_map(|s| match *s {
            Stop::Load { served, origin } => Some((served, origin)),
            Stop::Visit { .. } => None,
        })
    }

    /// Returns `true` if the route starts with `Load(served, origin)`.
    pub fn starts_with_load(&self, served: usize, origin: usize) -> bool {
        self.first() == Some(&Stop::Load { served, origin })
    }

    /// Returns `true` if the last stop concerns `served` and, walking
    /// backwards, the nearest load stop for `served` is at `origin`.
    pub fn ends_with_served_from(&self, served: usize, origin: usize) -> bool {
        let Some(last) = self.last() else {
            return false;
        };
        if last.served() != served {
            return false;
        }
        self.stops[..self.stops.len() - 1]
            .iter()
            .rev()
            .find_map(|s| match *s {
                Stop::Load { served: sv, origin: o } if sv == served => Some(o == origin),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Number of load stops at the start of the route.
    pub fn leading_loads(&self) -> usize {
        self.stops.iter().take_while(|s| s.is_load()).count()
    }

    /// Inserts a stop at `index`, shifting later stops.
    pub(crate) fn insert(&mut self, index: usize, stop: Stop) {
        self.stops.insert(index, stop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refill_route() -> Route {
        // S0: load 1 and 2, visit both, reload 3 at S1, visit it
        Route::from_stops(vec![
            Stop::Load { served: 1, origin: 0 },
            Stop::Load { served: 2, origin: 0 },
            Stop::Visit { served: 1 },
            Stop::Visit { served: 2 },
            Stop::Load { served: 3, origin: 1 },
            Stop::Visit { served: 3 },
        ])
    }

    #[test]
    fn test_stop_accessors() {
        let load = Stop::Load { served: 4, origin: 1 };
        let visit = Stop::Visit { served: 4 };
        assert_eq!(load.served(), 4);
        assert_eq!(load.origin(), Some(1));
        assert!(load.is_load());
        assert_eq!(visit.origin(), None);
        assert!(visit.is_visit());
        assert_ne!(load, visit);
    }

    #[test]
    fn test_singleton() {
        let r = Route::singleton(3, 1);
        assert_eq!(r.len(), 2);
        assert!(r.is_singleton());
        assert!(r.starts_with_load(3, 1));
        assert!(!r.starts_with_load(3, 0));
        assert!(r.ends_with_served_from(3, 1));
        assert!(!r.ends_with_served_from(3, 0));
    }

    #[test]
    fn test_served_nodes_and_assignments() {
        let r = refill_route();
        assert_eq!(r.served_nodes(), vec![1, 2, 3]);
        let pairs: Vec<_> = r.assignments().collect();
        assert_eq!(pairs, vec![(1, 0), (2, 0), (3, 1)]);
        assert_eq!(r.leading_loads(), 2);
    }

    #[test]
    fn test_ends_with_served_from_walks_back() {
        let r = refill_route();
        assert!(r.ends_with_served_from(3, 1));
        assert!(!r.ends_with_served_from(3, 0));
        assert!(!r.ends_with_served_from(2, 0));
    }

    #[test]
    fn test_ends_with_served_without_load() {
        let r = Route::from_stops(vec![Stop::Visit { served: 1 }]);
        assert!(!r.ends_with_served_from(1, 0));
        assert!(!Route::from_stops(vec![]).ends_with_served_from(1, 0));
    }

    #[test]
    fn test_position_and_insert() {
        let mut r = Route::singleton(1, 0);
        assert_eq!(r.position(&Stop::Visit { served: 1 }), Some(1));
        r.insert(1, Stop::Load { served: 2, origin: 0 });
        r.insert(3, Stop::Visit { served: 2 });
        assert_eq!(r.served_nodes(), vec![1, 2]);
        assert_eq!(r.position(&Stop::Load { served: 2, origin: 0 }), Some(1));
    }
}
