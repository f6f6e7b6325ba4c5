//! The solution capability contract consumed by the engine.

/// A solution to a problem, as seen by the solver.
///
/// The engine never inspects a solution beyond this contract: it clones it
/// to snapshot or restore state, and reads its score to decide whether the
/// best solution should be replaced. How a score is computed, and what a
/// solution actually contains, is entirely up to the embedding application.
///
/// # Ownership
///
/// `Clone` must produce a deep, independent copy: the solver keeps two owned
/// copies at all times (the work solution it mutates and the best solution it
/// replaces wholesale) and never aliases state between them. A `Clone` that
/// shares mutable internals breaks the best-solution invariant.
pub trait Solution: Clone + Send {
    /// Returns the score of the solution. Lower is better; the engine
    /// always minimizes.
    fn score(&self) -> f64;
}
