//! Homogeneous vehicle fleet of one echelon.

use serde::{Deserialize, Serialize};

/// The vehicles available to one echelon.
///
/// All vehicles share the same capacity and fixed usage cost; at most
/// `vehicle_count` of them may be used simultaneously.
///
/// # Examples
///
/// ```
/// use u_echelon::models::Fleet;
///
/// let fleet = Fleet::new(4, 200).with_fixed_cost(50.0);
/// assert_eq!(fleet.vehicle_count(), 4);
/// assert_eq!(fleet.vehicle_capacity(), 200);
/// assert_eq!(fleet.vehicle_fixed_cost(), 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    vehicle_count: usize,
    vehicle_capacity: i32,
    vehicle_fixed_cost: f64,
}

impl Fleet {
    /// Creates a fleet with no fixed cost.
    pub fn new(vehicle_count: usize, vehicle_capacity: i32) -> Self {
        Self {
            vehicle_count,
            vehicle_capacity,
            vehicle_fixed_cost: 0.0,
        }
    }

    /// Sets the fixed cost charged per used vehicle.
    pub fn with_fixed_cost(mut self, cost: f64) -> Self {
        self.vehicle_fixed_cost = cost;
        self
    }

    /// Maximum number of vehicles (routes).
    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    /// Load capacity of each vehicle.
    pub fn vehicle_capacity(&self) -> i32 {
        self.vehicle_capacity
    }

    /// Cost of using one vehicle, independent of distance.
    pub fn vehicle_fixed_cost(&self) -> f64 {
        self.vehicle_fixed_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_new() {
        let f = Fleet::new(3, 100);
        assert_eq!(f.vehicle_count(), 3);
        assert_eq!(f.vehicle_capacity(), 100);
        assert_eq!(f.vehicle_fixed_cost(), 0.0);
    }

    #[test]
    fn test_fleet_builder() {
        let f = Fleet::new(1, 15).with_fixed_cost(25.5);
        assert_eq!(f.vehicle_fixed_cost(), 25.5);
    }
}
