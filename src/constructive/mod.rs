//! Savings-based construction for one echelon.
//!
//! - [`compute_savings`] — Ordered savings list over every origin pair, O(O²S² log(OS))
//! - [`MergeEngine`] — Classic and refill route merging with feasibility checks
//! - [`repair_singletons`] / [`repair_fleet_size`] — Post-merge repairs
//! - [`solve_echelon`] — The whole pipeline for one level

mod clarke_wright;
mod merge;
mod repair;
mod savings;

pub use clarke_wright::solve_echelon;
pub use merge::{
    classic_merge, initial_routes, locate_i_route, locate_j_route, refill_merge, MergeEngine,
    MergeKind, MergePlan, MergeRejection, MergeStats,
};
pub use repair::{repair_fleet_size, repair_singletons};
pub use savings::{compute_savings, Saving};
