//! Adaptive Large Neighborhood Search orchestration engine.
//!
//! Coordinates a mutable work solution and a best-known solution, a set of
//! pluggable solve-operators each carrying its own execution probability,
//! adaptive integer parameters that evolve over iterations, observer
//! notifications fired at well-defined lifecycle points, and a time- and
//! iteration-bounded search loop that stays deterministic when seeded.
//!
//! - **[`solution`]**: the capability contract a solution type implements:
//!   deep copy and a scalar score (lower is better).
//! - **[`operator`]**: solve-operators, the probabilistically gated units
//!   of search logic, plus the And/Or composites and a restart operator.
//! - **[`parameter`]**: integer control values consumed by operators,
//!   either constant or adapting to stagnation (snap-back, zigzag).
//! - **[`solver`]**: the central orchestrator driving the iteration loop,
//!   with its options, events, observers and per-iteration information.
//! - **[`parallel`]**: cycles of independent solver runs, reconciled at
//!   cycle boundaries, optionally fully deterministic.
//! - **[`events`]**, **[`progression`]**, **[`random`]**: the notification
//!   primitives, progression samples and seeded randomness underneath.
//!
//! The engine contains no domain knowledge: how a solution computes its
//! score and what moves an operator makes are supplied by the caller.
//!
//! # Example
//!
//! ```
//! use alns_engine::operator::{OperatorContext, OperatorError, OperatorIndex, SolveOperator};
//! use alns_engine::solution::Solution;
//! use alns_engine::solver::{SolveOptions, Solver};
//!
//! #[derive(Clone)]
//! struct Value(f64);
//!
//! impl Solution for Value {
//!     fn score(&self) -> f64 {
//!         self.0
//!     }
//! }
//!
//! struct Decrement(OperatorIndex);
//!
//! impl SolveOperator<Value> for Decrement {
//!     fn index(&self) -> OperatorIndex {
//!         self.0
//!     }
//!
//!     fn execute(&mut self, ctx: &mut OperatorContext<'_, Value>) {
//!         ctx.work_mut().0 -= 1.0;
//!     }
//!
//!     fn probability(&self) -> f64 {
//!         1.0
//!     }
//!
//!     fn set_probability(&mut self, _probability: f64) -> Result<(), OperatorError> {
//!         Ok(())
//!     }
//!
//!     fn can_result_in_improvement(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let mut solver = Solver::new(Value(10.0), 42);
//! solver.add_solve_operator(Box::new(Decrement(OperatorIndex::new())));
//!
//! let result = solver.solve(&SolveOptions::default().with_iterations(5));
//! assert_eq!(result.best_score, 5.0);
//! ```

pub mod events;
pub mod operator;
pub mod parallel;
pub mod parameter;
pub mod progression;
pub mod random;
pub mod solution;
pub mod solver;

#[cfg(test)]
mod test_support;
