//! Problem instance: nodes, fleets and the distance table.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use super::{Customer, Depot, Fleet, Node, Satellite};
use crate::distance::DistanceMatrix;

/// Structural problems detected while assembling an [`Instance`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    #[error("instance has no {0}")]
    Empty(&'static str),

    #[error("{kind} at position {position} has local id {local_id}")]
    LocalIdMismatch {
        kind: &'static str,
        position: usize,
        local_id: usize,
    },

    #[error("global id {0} is used by more than one node")]
    DuplicateGlobalId(usize),

    #[error("global id {id} is outside the {size}x{size} distance matrix")]
    GlobalIdOutOfRange { id: usize, size: usize },

    #[error("customer {customer} has negative demand {demand}")]
    NegativeDemand { customer: usize, demand: i32 },

    #[error("distance matrix is not symmetric")]
    AsymmetricDistances,
}

/// A two-echelon routing instance.
///
/// Read-only once built; every solver call borrows it.
///
/// # Examples
///
/// ```
/// use u_echelon::models::{Customer, Depot, Fleet, Instance, Satellite};
///
/// let instance = Instance::euclidean(
///     vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
///     vec![Satellite::new(0, 1, 10.0, 0.0, 0.0)],
///     vec![Customer::new(0, 2, 12.0, 0.0, 0.0, 5)],
///     Fleet::new(1, 50),
///     Fleet::new(2, 20),
/// )
/// .unwrap();
/// assert!((instance.distance(0, 2) - 12.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Instance {
    depots: Vec<Depot>,
    satellites: Vec<Satellite>,
    customers: Vec<Customer>,
    first_echelon_fleet: Fleet,
    second_echelon_fleet: Fleet,
    distances: DistanceMatrix,
}

impl Instance {
    /// Assembles and validates an instance.
    pub fn new(
        depots: Vec<Depot>,
        satellites: Vec<Satellite>,
        customers: Vec<Customer>,
        first_echelon_fleet: Fleet,
        second_echelon_fleet: Fleet,
        distances: DistanceMatrix,
    ) -> Result<Self, InstanceError> {
        check_collection("depots", &depots)?;
        check_collection("satellites", &satellites)?;
        check_collection("customers", &customers)?;

        let mut seen = HashSet::new();
        let ids = depots
            .iter()
            .map(Node::global_id)
            .chain(satellites.iter().map(Node::global_id))
            .chain(customers.iter().map(Node::global_id));
        for id in ids {
            if id >= distances.size() {
                return Err(InstanceError::GlobalIdOutOfRange {
                    id,
                    size: distances.size(),
                });
            }
            if !seen.insert(id) {
                return Err(InstanceError::DuplicateGlobalId(id));
            }
        }

        if let Some(c) = customers.iter().find(|c| c.demand() < 0) {
            return Err(InstanceError::NegativeDemand {
                customer: c.local_id(),
                demand: c.demand(),
            });
        }

        if !distances.is_symmetric(1e-9) {
            return Err(InstanceError::AsymmetricDistances);
        }

        Ok(Self {
            depots,
            satellites,
            customers,
            first_echelon_fleet,
            second_echelon_fleet,
            distances,
        })
    }

    /// Assembles an instance with Euclidean distances between node coordinates.
    pub fn euclidean(
        depots: Vec<Depot>,
        satellites: Vec<Satellite>,
        customers: Vec<Customer>,
        first_echelon_fleet: Fleet,
        second_echelon_fleet: Fleet,
    ) -> Result<Self, InstanceError> {
        let sites: Vec<_> = depots
            .iter()
            .map(|n| *n.site())
            .chain(satellites.iter().map(|n| *n.site()))
            .chain(customers.iter().map(|n| *n.site()))
            .collect();
        let distances = DistanceMatrix::from_sites(&sites);
        Self::new(
            depots,
            satellites,
            customers,
            first_echelon_fleet,
            second_echelon_fleet,
            distances,
        )
    }

    /// Depots, indexed by local id.
    pub fn depots(&self) -> &[Depot] {
        &self.depots
    }

    /// Satellites, indexed by local id.
    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    /// Customers, indexed by local id.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Depot→satellite fleet.
    pub fn first_echelon_fleet(&self) -> &Fleet {
        &self.first_echelon_fleet
    }

    /// Satellite→customer fleet.
    pub fn second_echelon_fleet(&self) -> &Fleet {
        &self.second_echelon_fleet
    }

    /// The full distance table.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Distance between two nodes given by global id.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }
}

fn check_collection<N: Node>(kind: &'static str, nodes: &[N]) -> Result<(), InstanceError> {
    if nodes.is_empty() {
        return Err(InstanceError::Empty(kind));
    }
    for (position, node) in nodes.iter().enumerate() {
        if node.local_id() != position {
            return Err(InstanceError::LocalIdMismatch {
                kind,
                position,
                local_id: node.local_id(),
            });
        }
    }
    Ok(())
}
