//! Shared fixtures for the crate's tests.

use crate::operator::{
    validate_probability, OperatorContext, OperatorError, OperatorIndex, SolveOperator,
};
use crate::solution::Solution;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A solution that is nothing but its score.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoredValue(pub f64);

impl Solution for ScoredValue {
    fn score(&self) -> f64 {
        self.0
    }
}

/// An operator that counts its executions on a shared counter.
///
/// With `improving()` it also decreases the work solution's score by 1 per
/// execution and reports itself improvement-capable.
pub(crate) struct CountingOperator {
    index: OperatorIndex,
    probability: f64,
    executions: Arc<AtomicUsize>,
    improving: bool,
}

impl CountingOperator {
    pub(crate) fn new(probability: f64, executions: Arc<AtomicUsize>) -> Self {
        Self {
            index: OperatorIndex::new(),
            probability,
            executions,
            improving: false,
        }
    }

    pub(crate) fn improving(mut self) -> Self {
        self.improving = true;
        self
    }
}

impl SolveOperator<ScoredValue> for CountingOperator {
    fn index(&self) -> OperatorIndex {
        self.index
    }

    fn execute(&mut self, ctx: &mut OperatorContext<'_, ScoredValue>) {
        self.executions.fetch_add(1, Ordering::Relaxed);
        if self.improving {
            ctx.work_mut().0 -= 1.0;
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
        self.improving
    }
}
