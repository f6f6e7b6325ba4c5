//! The typed events fired while solving.

use super::SolveInformation;
use crate::events::{Event, Event2};

/// The events fired during a solve, in the order a run encounters them.
///
/// Handlers run synchronously and block the iteration loop. Register
/// handlers before calling solve; registering while a run is in progress is
/// not supported.
pub struct SolveEvents<S> {
    /// Fired once when the solve starts, before any operator runs.
    pub start: Event<SolveInformation>,

    /// Fired at the start of every iteration.
    pub iterating: Event<SolveInformation>,

    /// Fired right before an operator executes. The operator is already
    /// part of the executed-operator list at this point.
    pub operator_executing: Event<SolveInformation>,

    /// Fired right after an operator executed.
    pub operator_executed: Event<SolveInformation>,

    /// Fired when an operator produced a solution better than the best
    /// solution, before the best solution is replaced.
    pub improvement_found: Event<SolveInformation>,

    /// Fired at the end of every iteration, after parameter updates.
    pub iterated: Event<SolveInformation>,

    /// Fired when the run is cancelled through the cancellation token.
    pub context_done: Event<SolveInformation>,

    /// Fired when a solution is installed as the work solution through a
    /// reset or restart.
    pub reset: Event2<S, SolveInformation>,

    /// Fired exactly once when the run ends.
    pub done: Event<SolveInformation>,
}

impl<S> SolveEvents<S> {
    /// Creates a set of events with no handlers.
    pub fn new() -> Self {
        Self {
            start: Event::new(),
            iterating: Event::new(),
            operator_executing: Event::new(),
            operator_executed: Event::new(),
            improvement_found: Event::new(),
            iterated: Event::new(),
            context_done: Event::new(),
            reset: Event2::new(),
            done: Event::new(),
        }
    }
}

impl<S> Default for SolveEvents<S> {
    fn default() -> Self {
        Self::new()
    }
}
