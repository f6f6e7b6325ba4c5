//! Composite operator that gives every child its own coin flip.

use super::{
    validate_probability, OperatorContext, OperatorError, OperatorIndex, SolveOperator,
    SolveOperators,
};
use crate::solution::Solution;
use crate::solver::SolveInformation;
use rand::Rng;

/// A solve-operator grouping a set of operators.
///
/// When the group executes, every child is itself subject to independent
/// probabilistic execution: each child rolls its own probability, in order.
/// Grouping does not change what the children do; it bundles them for
/// registration and parameter bookkeeping.
pub struct SolveOperatorAnd<S: Solution> {
    index: OperatorIndex,
    probability: f64,
    operators: SolveOperators<S>,
}

impl<S: Solution> SolveOperatorAnd<S> {
    /// Creates an and-operator over `operators`.
    ///
    /// Returns an error if the probability is outside `[0, 1]` or the
    /// operator list is empty.
    pub fn new(probability: f64, operators: SolveOperators<S>) -> Result<Self, OperatorError> {
        let probability = validate_probability(probability)?;
        if operators.is_empty() {
            return Err(OperatorError::NoOperators);
        }
        Ok(Self {
            index: OperatorIndex::new(),
            probability,
            operators,
        })
    }

    /// The operators executed in each iteration.
    pub fn operators(&self) -> &SolveOperators<S> {
        &self.operators
    }
}

impl<S: Solution> SolveOperator<S> for SolveOperatorAnd<S> {
    fn index(&self) -> OperatorIndex {
        self.index
    }

    fn execute(&mut self, ctx: &mut OperatorContext<'_, S>) {
        for operator in &mut self.operators {
            let draw: f64 = ctx.rng().random_range(0.0..1.0);
            if draw < operator.probability() {
                operator.execute(ctx);
            }
        }
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn set_probability(&mut self, probability: f64) -> Result<(), OperatorError> {
        self.probability = validate_probability(probability)?;
        Ok(())
    }

    fn can_result_in_improvement(&self) -> bool {
        self.operators
            .iter()
            .any(|operator| operator.can_result_in_improvement())
    }

    fn update_parameters(&mut self, info: &SolveInformation) {
        for operator in &mut self.operators {
            operator.update_parameters(info);
        }
    }

    fn on_start_solve(&mut self, info: &SolveInformation) {
        for operator in &mut self.operators {
            operator.on_start_solve(info);
        }
    }

    fn on_better_solution(&mut self, info: &SolveInformation) {
        for operator in &mut self.operators {
            operator.on_better_solution(info);
        }
    }
}
