//! Options bounding a single solve run.

use std::time::Duration;

/// Options for the solve process.
///
/// The loop terminates on whichever bound is hit first; both are checked
/// every iteration. Reaching a bound is the normal, successful termination
/// condition, not an error.
///
/// # Examples
///
/// ```
/// use alns_engine::solver::SolveOptions;
/// use std::time::Duration;
///
/// let options = SolveOptions::default()
///     .with_iterations(10_000)
///     .with_maximum_duration(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveOptions {
    /// Maximum number of iterations.
    pub iterations: usize,

    /// Maximum wall-clock duration of the run.
    pub maximum_duration: Duration,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            maximum_duration: Duration::from_secs(60 * 60),
        }
    }
}

impl SolveOptions {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_maximum_duration(mut self, duration: Duration) -> Self {
        self.maximum_duration = duration;
        self
    }
}
