//! Whole-solution evaluation across both echelons.

use serde::{Deserialize, Serialize};

use super::{CostBreakdown, RouteEvaluator};
use crate::config::SolverConfig;
use crate::models::{FirstEchelon, Instance, SecondEchelon, Solution, Violation};

/// Cost and feasibility of a two-echelon solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    /// Depot → satellite cost.
    pub first_echelon: CostBreakdown,
    /// Satellite → customer cost.
    pub second_echelon: CostBreakdown,
    /// Sum of both totals.
    pub total_cost: f64,
    /// Every violation found on either echelon.
    pub violations: Vec<Violation>,
}

impl SolutionReport {
    /// Returns `true` if no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Evaluates both echelons of `solution`.
///
/// The first echelon is checked against the satellite loads stored in the
/// solution.
pub fn evaluate_solution(
    instance: &Instance,
    solution: &Solution,
    config: &SolverConfig,
) -> SolutionReport {
    let second = SecondEchelon::new(instance);
    let first = FirstEchelon::new(instance, solution.satellite_loads());

    let second_eval = RouteEvaluator::new(&second, config);
    let first_eval = RouteEvaluator::new(&first, config);

    let first_routes = solution.first_echelon().routes();
    let second_routes = solution.second_echelon().routes();

    let first_echelon = first_eval.evaluate(first_routes);
    let second_echelon = second_eval.evaluate(second_routes);

    let mut violations = first_eval.violations(first_routes);
    violations.extend(second_eval.violations(second_routes));

    SolutionReport {
        first_echelon,
        second_echelon,
        total_cost: first_echelon.total + second_echelon.total,
        violations,
    }
}
