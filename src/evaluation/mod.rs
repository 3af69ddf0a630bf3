//! Route evaluation: feasibility checking and cost computation.
//!
//! - [`RouteEvaluator`] — per-echelon capacity, time window, fleet size and
//!   coverage checks, plus the travel + handling + vehicle objective
//! - [`evaluate_solution`] — both echelons of a [`Solution`](crate::models::Solution)

mod evaluator;
mod report;

pub use evaluator::{CostBreakdown, RouteEvaluator};
pub use report::{evaluate_solution, SolutionReport};
