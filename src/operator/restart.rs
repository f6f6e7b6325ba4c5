//! Operator that returns the search to the best solution after stagnation.

use super::{
    validate_probability, OperatorContext, OperatorError, OperatorIndex, SolveOperator,
};
use crate::parameter::{SolveParameter, SolveParameters};
use crate::solution::Solution;
use std::marker::PhantomData;

/// A solve-operator that restarts the search from the best solution.
///
/// When more than `maximum_iterations` iterations have passed without an
/// improvement, executing this operator replaces the work solution with a
/// copy of the best solution found so far. The threshold is a solve
/// parameter, so it can itself adapt while the search runs.
pub struct SolveOperatorRestart<S: Solution> {
    index: OperatorIndex,
    probability: f64,
    parameters: SolveParameters,
    last_improvement: usize,
    _solution: PhantomData<S>,
}

impl<S: Solution> SolveOperatorRestart<S> {
    /// Creates a restart operator with the given stagnation threshold.
    pub fn new(maximum_iterations: Box<dyn SolveParameter>) -> Self {
        Self {
            index: OperatorIndex::new(),
            probability: 1.0,
            parameters: vec![maximum_iterations],
            last_improvement: 0,
            _solution: PhantomData,
        }
    }

    /// The maximum number of iterations without improvement before the
    /// work solution is replaced with the best solution.
    pub fn maximum_iterations(&self) -> &dyn SolveParameter {
        self.parameters[0].as_ref()
    }
}

impl<S: Solution> SolveOperator<S> for SolveOperatorRestart<S> {
    fn index(&self) -> OperatorIndex {
        self.index
    }

    fn execute(&mut self, ctx: &mut OperatorContext<'_, S>) {
        let iteration = ctx.info().iteration();
        let threshold = self.parameters[0].value().max(0) as usize;
        if iteration.saturating_sub(self.last_improvement) > threshold {
            let best = ctx.best().clone();
            *ctx.work_mut() = best;
            // Re-arm so the next restart waits a full stagnation window.
            self.last_improvement = iteration;
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
        false
    }

    fn parameters(&self) -> &[Box<dyn SolveParameter>] {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut [Box<dyn SolveParameter>] {
        &mut self.parameters
    }

    fn on_better_solution(&mut self, info: &crate::solver::SolveInformation) {
        self.last_improvement = info.iteration();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ConstantParameter;
    use crate::random::create_rng;
    use crate::solver::SolveInformation;
    use crate::test_support::ScoredValue;
    use std::sync::atomic::AtomicBool;

    fn execute_at(
        operator: &mut SolveOperatorRestart<ScoredValue>,
        work: &mut ScoredValue,
        best: &ScoredValue,
        iteration: usize,
    ) {
        let mut info = SolveInformation::new();
        info.begin_iteration(iteration);
        let mut rng = create_rng(0);
        let cancelled = AtomicBool::new(false);
        let mut ctx = OperatorContext::new(work, best, &info, &mut rng, &cancelled);
        operator.execute(&mut ctx);
    }

    #[test]
    fn test_restarts_after_stagnation_window() {
        let mut operator =
            SolveOperatorRestart::<ScoredValue>::new(Box::new(ConstantParameter::new(3)));
        let mut work = ScoredValue(10.0);
        let best = ScoredValue(4.0);

        execute_at(&mut operator, &mut work, &best, 3);
        assert_eq!(work, ScoredValue(10.0));

        execute_at(&mut operator, &mut work, &best, 4);
        assert_eq!(work, ScoredValue(4.0));
    }

    #[test]
    fn test_improvement_postpones_restart() {
        let mut operator =
            SolveOperatorRestart::<ScoredValue>::new(Box::new(ConstantParameter::new(3)));
        let mut work = ScoredValue(10.0);
        let best = ScoredValue(4.0);

        let mut info = SolveInformation::new();
        info.begin_iteration(4);
        operator.on_better_solution(&info);

        execute_at(&mut operator, &mut work, &best, 6);
        assert_eq!(work, ScoredValue(10.0));

        execute_at(&mut operator, &mut work, &best, 8);
        assert_eq!(work, ScoredValue(4.0));
    }

    #[test]
    fn test_restart_rearms_window() {
        let mut operator =
            SolveOperatorRestart::<ScoredValue>::new(Box::new(ConstantParameter::new(2)));
        let mut work = ScoredValue(10.0);
        let best = ScoredValue(4.0);

        execute_at(&mut operator, &mut work, &best, 5);
        assert_eq!(work, ScoredValue(4.0));

        work = ScoredValue(9.0);
        execute_at(&mut operator, &mut work, &best, 6);
        assert_eq!(work, ScoredValue(9.0));
    }
}
