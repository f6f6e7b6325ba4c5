//! Composite operator that draws one child per loop.

use super::{
    validate_probability, OperatorContext, OperatorError, OperatorIndex, SolveOperator,
    SolveOperators,
};
use crate::solution::Solution;
use crate::solver::SolveInformation;
use rand::{Rng, RngCore};

/// A solve-operator that executes `loops` weighted random picks from a pool.
///
/// On each of its loops exactly one child is selected and executed. Child
/// probabilities act as relative weights, normalized by their sum: three
/// operators with probabilities 0.1, 0.2 and 0.3 are selected with
/// likelihoods 1/6, 2/6 and 3/6. This lets an iteration apply several small
/// randomized moves from a shared pool rather than one coin flip per pool
/// member.
pub struct SolveOperatorOr<S: Solution> {
    index: OperatorIndex,
    probability: f64,
    loops: usize,
    operators: SolveOperators<S>,
}

impl<S: Solution> SolveOperatorOr<S> {
    /// Creates an or-operator executing `loops` picks from `operators`.
    ///
    /// Returns an error if `loops` is zero, the probability is outside
    /// `[0, 1]`, or the operator list is empty.
    pub fn new(
        loops: usize,
        probability: f64,
        operators: SolveOperators<S>,
    ) -> Result<Self, OperatorError> {
        let probability = validate_probability(probability)?;
        if loops == 0 {
            return Err(OperatorError::ZeroLoops);
        }
        if operators.is_empty() {
            return Err(OperatorError::NoOperators);
        }
        Ok(Self {
            index: OperatorIndex::new(),
            probability,
            loops,
            operators,
        })
    }

    /// The number of picks per execution.
    pub fn loops(&self) -> usize {
        self.loops
    }

    /// The operators one is selected from in each loop.
    pub fn operators(&self) -> &SolveOperators<S> {
        &self.operators
    }
}

/// Selects an operator index by roulette wheel over probabilities.
fn weighted_select<S: Solution>(rng: &mut dyn RngCore, operators: &SolveOperators<S>) -> usize {
    let total: f64 = operators.iter().map(|o| o.probability()).sum();
    if total <= 0.0 {
        return 0;
    }

    let mut roll = rng.random_range(0.0..total);
    for (i, operator) in operators.iter().enumerate() {
        roll -= operator.probability();
        if roll <= 0.0 {
            return i;
        }
    }
    operators.len() - 1
}

impl<S: Solution> SolveOperator<S> for SolveOperatorOr<S> {
    fn index(&self) -> OperatorIndex {
        self.index
    }

    fn execute(&mut self, ctx: &mut OperatorContext<'_, S>) {
        for _ in 0..self.loops {
            let selected = weighted_select(ctx.rng(), &self.operators);
            self.operators[selected].execute(ctx);
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
