//! Adaptive solve parameters.
//!
//! A solve parameter is an integer control value consumed by solve-operators
//! (a neighborhood size, a removal count, a restart threshold). The solver
//! updates every registered parameter once per iteration, after all operators
//! for that iteration have run, so parameters can react to stagnation or
//! improvement without being coupled to any specific operator's semantics.

mod adaptive;
mod constant;

pub use adaptive::{AdaptiveParameter, IntParameterOptions, ParameterError};
pub use constant::ConstantParameter;

use crate::solver::SolveInformation;

/// A parameter that can change while the solver is running.
pub trait SolveParameter: Send {
    /// Updates the parameter based on the given solve information. Invoked
    /// by the solver after each iteration.
    fn update(&mut self, info: &SolveInformation);

    /// Returns the current value of the parameter.
    fn value(&self) -> i64;
}

/// A list of solve parameters.
pub type SolveParameters = Vec<Box<dyn SolveParameter>>;
