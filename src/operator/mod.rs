//! Solve-operators: probabilistically gated units of search logic.
//!
//! A solve-operator modifies the current work solution. Each iteration the
//! solver draws one uniform random number per registered operator and
//! executes the operator when the draw falls below its probability. The
//! manipulation of the solution is implemented in
//! [`SolveOperator::execute`], which receives an [`OperatorContext`] with
//! the work solution, the best solution, the iteration snapshot, the
//! solver's random source, and the cancellation token.

mod and;
mod or;
mod restart;

pub use and::SolveOperatorAnd;
pub use or::SolveOperatorOr;
pub use restart::SolveOperatorRestart;

use crate::parameter::SolveParameter;
use crate::solution::Solution;
use crate::solver::SolveInformation;
use rand::RngCore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;

/// Errors raised when constructing or configuring a solve-operator.
#[derive(Debug, Error, PartialEq)]
pub enum OperatorError {
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("a composite operator needs at least one operator")]
    NoOperators,

    #[error("an or-operator needs at least one loop")]
    ZeroLoops,
}

pub(crate) fn validate_probability(probability: f64) -> Result<f64, OperatorError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(OperatorError::InvalidProbability(probability));
    }
    Ok(probability)
}

/// A process-unique identifier for a solve-operator.
///
/// Indices are handed out by a global counter, so two operators created
/// anywhere in the process never share one. The executed-operator list in
/// [`SolveInformation`] is expressed in these indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperatorIndex(usize);

impl OperatorIndex {
    /// Allocates the next unused index.
    pub fn new() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the index as a plain integer.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for OperatorIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperatorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything an operator may touch while executing.
///
/// The context splits the solver's state into what an operator is allowed
/// to do with it: mutate the work solution, read the best solution, read
/// the per-iteration snapshot, draw random numbers, and poll cancellation.
pub struct OperatorContext<'a, S> {
    work: &'a mut S,
    best: &'a S,
    info: &'a SolveInformation,
    rng: &'a mut dyn RngCore,
    cancelled: &'a AtomicBool,
}

impl<'a, S> OperatorContext<'a, S> {
    /// Assembles a context from its parts. The solver does this for every
    /// operator execution; tests of operator implementations can do the
    /// same.
    pub fn new(
        work: &'a mut S,
        best: &'a S,
        info: &'a SolveInformation,
        rng: &'a mut dyn RngCore,
        cancelled: &'a AtomicBool,
    ) -> Self {
        Self {
            work,
            best,
            info,
            rng,
            cancelled,
        }
    }

    /// The work solution.
    pub fn work(&self) -> &S {
        self.work
    }

    /// The work solution, mutably. This is what operators change.
    pub fn work_mut(&mut self) -> &mut S {
        self.work
    }

    /// The best solution found so far. Replaced by the solver, never by
    /// operators.
    pub fn best(&self) -> &S {
        self.best
    }

    /// The current iteration's snapshot.
    pub fn info(&self) -> &SolveInformation {
        self.info
    }

    /// The solver's random source.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        self.rng
    }

    /// Whether the run has been cancelled. Long-running operators should
    /// poll this and return early; the solver never interrupts an operator
    /// preemptively.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A unit of search logic with an execution probability.
///
/// Implementations must not assume they run every iteration: the solver
/// gates each operator on its probability. An operator that can produce a
/// solution better than the best one should report it through
/// [`can_result_in_improvement`](SolveOperator::can_result_in_improvement),
/// which makes the solver compare scores after each of its executions.
pub trait SolveOperator<S: Solution>: Send {
    /// The process-unique index of this operator.
    fn index(&self) -> OperatorIndex;

    /// Executes the operator against the work solution.
    fn execute(&mut self, ctx: &mut OperatorContext<'_, S>);

    /// The probability, in `[0, 1]`, that the solver executes this operator
    /// in an iteration.
    fn probability(&self) -> f64;

    /// Changes the execution probability.
    fn set_probability(&mut self, probability: f64) -> Result<(), OperatorError>;

    /// Whether executing this operator can result in an improvement over
    /// the best solution.
    fn can_result_in_improvement(&self) -> bool;

    /// The solve-parameters owned by this operator.
    fn parameters(&self) -> &[Box<dyn SolveParameter>] {
        &[]
    }

    /// The solve-parameters owned by this operator, mutably.
    fn parameters_mut(&mut self) -> &mut [Box<dyn SolveParameter>] {
        &mut []
    }

    /// Updates the operator's parameters at the end of an iteration.
    /// Composite operators forward this to their children.
    fn update_parameters(&mut self, info: &SolveInformation) {
        for parameter in self.parameters_mut() {
            parameter.update(info);
        }
    }

    /// Invoked exactly once when a solve starts. Default: no-op.
    fn on_start_solve(&mut self, _info: &SolveInformation) {}

    /// Invoked every time the best solution is replaced. Default: no-op.
    fn on_better_solution(&mut self, _info: &SolveInformation) {}
}

/// A list of solve-operators.
pub type SolveOperators<S> = Vec<Box<dyn SolveOperator<S>>>;
