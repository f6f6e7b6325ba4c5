//! Options and factories for the parallel solver.

use crate::solver::{SolveOptions, Solver};
use rand::{Rng, RngCore};
use std::time::Duration;

/// Options for the parallel solver.
///
/// A cycle runs `parallel_runs` independent solvers concurrently; when all
/// of them have finished, the best result seeds the next cycle. Cycles
/// continue until the duration elapses or the iteration budget, summed
/// over all runs, is exhausted. Each run is additionally capped by the
/// budget remaining at the start of its cycle; the concurrent runs of the
/// final cycle may together overshoot the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelSolveOptions {
    /// Total iteration budget across all runs. The default is effectively
    /// unbounded, leaving the duration as the only limit.
    pub iterations: usize,

    /// Maximum wall-clock duration of the whole solve.
    pub duration: Duration,

    /// Number of solver instances per cycle.
    pub parallel_runs: usize,

    /// Run deterministically: per-run seeds are drawn from the parallel
    /// solver's own random stream, in run order, so repeated executions
    /// with the same seed reproduce the same outcome. Otherwise every run
    /// is seeded from entropy.
    pub run_deterministically: bool,
}

impl Default for ParallelSolveOptions {
    fn default() -> Self {
        Self {
            iterations: usize::MAX,
            duration: Duration::from_secs(30),
            parallel_runs: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            run_deterministically: false,
        }
    }
}

impl ParallelSolveOptions {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_parallel_runs(mut self, parallel_runs: usize) -> Self {
        self.parallel_runs = parallel_runs.max(1);
        self
    }

    pub fn with_run_deterministically(mut self, deterministic: bool) -> Self {
        self.run_deterministically = deterministic;
        self
    }
}

/// Identifies one run within one cycle of a parallel solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelSolveInformation {
    cycle: usize,
    run: usize,
    seed: u64,
}

impl ParallelSolveInformation {
    pub fn new(cycle: usize, run: usize, seed: u64) -> Self {
        Self { cycle, run, seed }
    }

    /// The current cycle: how often a new batch of solvers has been
    /// started from the best solution of the previous runs.
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// The run within the cycle.
    pub fn run(&self) -> usize {
        self.run
    }

    /// The seed assigned to this run. Solver factories should seed the
    /// solver they mint with it; in deterministic mode it derives from the
    /// parallel solver's stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Mints the solver for a run, starting from the given seed solution.
pub type SolverFactory<S> =
    Box<dyn Fn(&ParallelSolveInformation, S) -> Solver<S> + Send + Sync>;

/// Mints the solve options for a run. The random source is the parallel
/// solver's own stream, consumed sequentially on the orchestrating thread.
pub type SolveOptionsFactory =
    Box<dyn Fn(&ParallelSolveInformation, &mut dyn RngCore) -> SolveOptions + Send + Sync>;

/// A factory producing the same options for every run.
pub fn fixed_solve_options_factory(
    iterations: usize,
    duration: Duration,
) -> SolveOptionsFactory {
    Box::new(move |_information, _rng| {
        SolveOptions::default()
            .with_iterations(iterations)
            .with_maximum_duration(duration)
    })
}

/// The default options factory: each run draws an iteration budget
/// uniformly from `[200, 2000]` with a 30 second ceiling. Varying budgets
/// per run desynchronizes the cycles' exploration depth.
pub fn default_solve_options_factory() -> SolveOptionsFactory {
    Box::new(|_information, rng| {
        SolveOptions::default()
            .with_iterations(rng.random_range(200..=2000))
            .with_maximum_duration(Duration::from_secs(30))
    })
}
