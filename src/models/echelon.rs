//! Echelon bindings: how the generic engine sees one level of the network.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Customer, Depot, Fleet, Instance, Node, Route, Satellite, Stop, TimeWindow};
use crate::distance::DistanceMatrix;

/// Which level of the network a route set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EchelonLevel {
    /// Depot → satellite.
    First,
    /// Satellite → customer.
    Second,
}

impl fmt::Display for EchelonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EchelonLevel::First => f.write_str("first"),
            EchelonLevel::Second => f.write_str("second"),
        }
    }
}

/// One level of the two-echelon problem, as seen by the savings engine.
///
/// Served nodes are the ones delivered to (customers, or satellites on the
/// first level); origins are where vehicles load (satellites, or depots).
/// Stops reference both through their positions in [`Echelon::served`] and
/// [`Echelon::origins`].
///
/// # Examples
///
/// ```
/// use u_echelon::models::{
///     Customer, Depot, Echelon, Fleet, Instance, Satellite, SecondEchelon, Stop,
/// };
///
/// let instance = Instance::euclidean(
///     vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
///     vec![Satellite::new(0, 1, 10.0, 0.0, 0.0)],
///     vec![Customer::new(0, 2, 13.0, 4.0, 0.0, 5)],
///     Fleet::new(1, 50),
///     Fleet::new(2, 20),
/// )
/// .unwrap();
/// let echelon = SecondEchelon::new(&instance);
/// assert_eq!(echelon.demand(0), 5);
/// assert_eq!(echelon.location(&Stop::Load { served: 0, origin: 0 }), 1);
/// assert!((echelon.distance(1, 2) - 5.0).abs() < 1e-10);
/// ```
pub trait Echelon {
    /// Lower-level node kind.
    type Served: Node;
    /// Upper-level node kind.
    type Origin: Node;

    /// Level tag, used for logging.
    const LEVEL: EchelonLevel;

    /// Lower-level nodes, indexed by local id.
    fn served(&self) -> &[Self::Served];

    /// Upper-level nodes, indexed by local id.
    fn origins(&self) -> &[Self::Origin];

    /// Fleet operating on this level.
    fn fleet(&self) -> &Fleet;

    /// Distance table indexed by global id.
    fn distances(&self) -> &DistanceMatrix;

    /// Capacity consumed by served node `served`.
    fn demand(&self, served: usize) -> i32;

    /// Time window of served node `served`, if the level has windows.
    fn time_window(&self, _served: usize) -> Option<&TimeWindow> {
        None
    }

    /// Distance between two nodes given by global id.
    fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances().get(from, to)
    }

    /// Global id of served node `served`.
    fn served_id(&self, served: usize) -> usize {
        self.served()[served].global_id()
    }

    /// Global id of origin `origin`.
    fn origin_id(&self, origin: usize) -> usize {
        self.origins()[origin].global_id()
    }

    /// Global id of the place a vehicle is at when executing `stop`.
    fn location(&self, stop: &Stop) -> usize {
        match *stop {
            Stop::Load { origin, .. } => self.origin_id(origin),
            Stop::Visit { served } => self.served_id(served),
        }
    }

    /// Origin closest to served node `served`; ties keep the first origin.
    fn closest_origin(&self, served: usize) -> usize {
        let ids: Vec<usize> = self.origins().iter().map(Node::global_id).collect();
        self.distances()
            .nearest_neighbor(self.served_id(served), &ids)
            .expect("instance has at least one origin")
    }

    /// Renders `route` with node labels, e.g. `[S0_C1, S0_C2, C1, C2]`.
    fn display<'a>(&'a self, route: &'a Route) -> RouteDisplay<'a, Self>
    where
        Self: Sized,
    {
        RouteDisplay {
            echelon: self,
            route,
        }
    }
}

/// Aggregated customer demand per satellite, keyed by satellite global id.
///
/// Produced from the second-echelon routes; consumed as the demand of the
/// first echelon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatelliteLoads {
    loads: BTreeMap<usize, i32>,
}

impl SatelliteLoads {
    /// Creates an empty load table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `demand` to the satellite with the given global id.
    pub fn add(&mut self, satellite_global_id: usize, demand: i32) {
        *self.loads.entry(satellite_global_id).or_insert(0) += demand;
    }

    /// Load of the satellite with the given global id (zero if it serves nobody).
    pub fn get(&self, satellite_global_id: usize) -> i32 {
        self.loads.get(&satellite_global_id).copied().unwrap_or(0)
    }

    /// Iterates `(satellite global id, load)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.loads.iter().map(|(&id, &load)| (id, load))
    }

    /// Sum over all satellites.
    pub fn total(&self) -> i32 {
        self.loads.values().sum()
    }
}

/// Satellite → customer level.
#[derive(Debug, Clone, Copy)]
pub struct SecondEchelon<'a> {
    instance: &'a Instance,
}

impl<'a> SecondEchelon<'a> {
    /// Binds the second level of `instance`.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }
}

impl Echelon for SecondEchelon<'_> {
    type Served = Customer;
    type Origin = Satellite;

    const LEVEL: EchelonLevel = EchelonLevel::Second;

    fn served(&self) -> &[Customer] {
        self.instance.customers()
    }

    fn origins(&self) -> &[Satellite] {
        self.instance.satellites()
    }

    fn fleet(&self) -> &Fleet {
        self.instance.second_echelon_fleet()
    }

    fn distances(&self) -> &DistanceMatrix {
        self.instance.distances()
    }

    fn demand(&self, served: usize) -> i32 {
        self.instance.customers()[served].demand()
    }

    fn time_window(&self, served: usize) -> Option<&TimeWindow> {
        self.instance.customers()[served].time_window()
    }
}

/// Depot → satellite level, with satellite demand taken from `loads`.
#[derive(Debug, Clone, Copy)]
pub struct FirstEchelon<'a> {
    instance: &'a Instance,
    loads: &'a SatelliteLoads,
}

impl<'a> FirstEchelon<'a> {
    /// Binds the first level of `instance` with the given satellite loads.
    pub fn new(instance: &'a Instance, loads: &'a SatelliteLoads) -> Self {
        Self { instance, loads }
    }
}

impl Echelon for FirstEchelon<'_> {
    type Served = Satellite;
    type Origin = Depot;

    const LEVEL: EchelonLevel = EchelonLevel::First;

    fn served(&self) -> &[Satellite] {
        self.instance.satellites()
    }

    fn origins(&self) -> &[Depot] {
        self.instance.depots()
    }

    fn fleet(&self) -> &Fleet {
        self.instance.first_echelon_fleet()
    }

    fn distances(&self) -> &DistanceMatrix {
        self.instance.distances()
    }

    fn demand(&self, served: usize) -> i32 {
        self.loads.get(self.served_id(served))
    }
}

/// `Display` adapter returned by [`Echelon::display`].
pub struct RouteDisplay<'a, E: Echelon> {
    echelon: &'a E,
    route: &'a Route,
}

impl<E: Echelon> fmt::Display for RouteDisplay<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, stop) in self.route.stops().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let served = self.echelon.served()[stop.served()].local_id();
            if let Some(origin) = stop.origin() {
                let origin = self.echelon.origins()[origin].local_id();
                write!(f, "{}{}_", <E::Origin as Node>::LABEL, origin)?;
            }
            write!(f, "{}{}", <E::Served as Node>::LABEL, served)?;
        }
        f.write_str("]")
    }
}
