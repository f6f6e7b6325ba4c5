//! Observers: trait-based notification of solve lifecycle points.
//!
//! Observers and [`SolveEvents`](super::SolveEvents) expose the same
//! lifecycle; events suit one-off closures, observers suit stateful types
//! that care about several points at once. The solver triggers the events
//! first, then the observers, both in registration order.

use super::SolveInformation;
use crate::solution::Solution;

/// An observer of the solve lifecycle. All methods default to no-ops, so
/// implementations only spell out the points they care about.
pub trait SolveObserver<S: Solution>: Send {
    /// The solver has started.
    fn on_start(&mut self, _info: &SolveInformation) {}

    /// A new iteration is starting.
    fn on_iteration(&mut self, _info: &SolveInformation) {}

    /// A solve-operator is about to be executed.
    fn on_execute(&mut self, _info: &SolveInformation) {}

    /// A solve-operator has been executed.
    fn on_executed(&mut self, _info: &SolveInformation) {}

    /// A solve-operator improved on the best solution.
    fn on_improvement(&mut self, _info: &SolveInformation) {}

    /// An iteration has been completed.
    fn on_iterated(&mut self, _info: &SolveInformation) {}

    /// The run was cancelled.
    fn on_context_done(&mut self, _info: &SolveInformation) {}

    /// A solution was installed as the work solution.
    fn on_reset(&mut self, _solution: &S, _info: &SolveInformation) {}

    /// The solver has ended.
    fn on_end(&mut self, _info: &SolveInformation) {}
}

/// A list of observers that forwards every notification to each of them,
/// in registration order.
pub struct SolveObservers<S: Solution> {
    observers: Vec<Box<dyn SolveObserver<S>>>,
}

impl<S: Solution> SolveObservers<S> {
    /// Creates an empty observer list.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Adds an observer.
    pub fn add(&mut self, observer: Box<dyn SolveObserver<S>>) {
        self.observers.push(observer);
    }

    /// Returns the number of observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<S: Solution> Default for SolveObservers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Solution> SolveObserver<S> for SolveObservers<S> {
    fn on_start(&mut self, info: &SolveInformation) {
        for observer in &mut self.observers {
            observer.on_start(info);
        }
    }

    fn on_iteration(&mut self, info: &SolveInformation) {
        for observer in &mut self.observers {
            observer.on_iteration(info);
        }
    }

    fn on_execute(&mut self, info: &SolveInformation) {
        for observer in &mut self.observers {
            observer.on_execute(info);
        }
    }

    fn on_executed(&mut self, info: &SolveInformation) {
        for observer in &mut self.observers {
            observer.on_executed(info);
        }
    }

    fn on_improvement(&mut self, info: &SolveInformation) {
        for observer in &mut self.observers {
            observer.on_improvement(info);
        }
    }

    fn on_iterated(&mut self, info: &SolveInformation) {
        for observer in &mut self.observers {
            observer.on_iterated(info);
        }
    }

    fn on_context_done(&mut self, info: &SolveInformation) {
        for observer in &mut self.observers {
            observer.on_context_done(info);
        }
    }

    fn on_reset(&mut self, solution: &S, info: &SolveInformation) {
        for observer in &mut self.observers {
            observer.on_reset(solution, info);
        }
    }

    fn on_end(&mut self, info: &SolveInformation) {
        for observer in &mut self.observers {
            observer.on_end(info);
        }
    }
}
