//! The cycle loop of the parallel solver.

use super::{
    default_solve_options_factory, ParallelSolveInformation, ParallelSolveOptions,
    SolveOptionsFactory, SolverFactory,
};
use crate::progression::ProgressionEntry;
use crate::random::create_rng;
use crate::solution::Solution;
use crate::solver::{SolveOptions, SolveResult, Solver};
use rand::rngs::StdRng;
use rand::RngCore;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Runs multiple independent solvers in parallel and reconciles them
/// across cycles.
///
/// Every cycle mints `parallel_runs` fresh solvers through the solver
/// factory, each seeded with a copy of the best solution so far and bounded
/// by options from the solve-options factory. Runs share no mutable state;
/// the only synchronization point is the cycle boundary, where the
/// orchestrator waits for every run before comparing scores and seeding
/// the next cycle.
///
/// A panic inside any run propagates out of
/// [`solve`](ParallelSolver::solve) once the cycle has been joined; a
/// partially completed cycle is never silently folded into the result.
pub struct ParallelSolver<S: Solution> {
    solver_factory: SolverFactory<S>,
    solve_options_factory: SolveOptionsFactory,
    rng: StdRng,
    progression: Vec<ProgressionEntry>,
}

impl<S: Solution> ParallelSolver<S> {
    /// Creates a parallel solver with the given run factory and a seeded
    /// random stream. Solve options default to
    /// [`default_solve_options_factory`].
    pub fn new(seed: u64, solver_factory: SolverFactory<S>) -> Self {
        Self {
            solver_factory,
            solve_options_factory: default_solve_options_factory(),
            rng: create_rng(seed),
            progression: Vec::new(),
        }
    }

    /// Replaces the factory minting a solver per run.
    pub fn set_solver_factory(&mut self, factory: SolverFactory<S>) {
        self.solver_factory = factory;
    }

    /// Replaces the factory minting solve options per run.
    pub fn set_solve_options_factory(&mut self, factory: SolveOptionsFactory) {
        self.solve_options_factory = factory;
    }

    /// How the best score evolved: an entry at the start of the solve and
    /// one after every cycle.
    pub fn progression(&self) -> &[ProgressionEntry] {
        &self.progression
    }

    /// Runs cycles of parallel solvers, starting from `solution`, and
    /// returns the best result across all runs.
    pub fn solve(&mut self, solution: S, options: &ParallelSolveOptions) -> SolveResult<S> {
        self.solve_with_cancel(solution, options, None)
    }

    /// Runs with a cancellation token shared by every run.
    pub fn solve_with_cancel(
        &mut self,
        solution: S,
        options: &ParallelSolveOptions,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolveResult<S> {
        let start = Instant::now();
        let parallel_runs = options.parallel_runs.max(1);

        let mut best = solution;
        let mut best_score = best.score();
        let mut iterations_used = 0usize;
        let mut improvements = 0usize;
        let mut cancelled = false;
        let mut cycle = 0usize;

        self.progression.push(ProgressionEntry {
            elapsed_seconds: 0.0,
            value: best_score,
        });

        while iterations_used < options.iterations
            && start.elapsed() < options.duration
            && !cancelled
        {
            if let Some(flag) = &cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Mint the cycle's runs sequentially, so the shared random
            // stream is consumed in a fixed, single-threaded order even
            // though the runs themselves execute concurrently.
            let mut runs: Vec<(Solver<S>, SolveOptions)> = Vec::with_capacity(parallel_runs);
            for run in 0..parallel_runs {
                let seed = if options.run_deterministically {
                    self.rng.next_u64()
                } else {
                    rand::random()
                };
                let information = ParallelSolveInformation::new(cycle, run, seed);

                let mut solve_options = (self.solve_options_factory)(&information, &mut self.rng);
                solve_options.iterations = solve_options
                    .iterations
                    .min(options.iterations - iterations_used);
                solve_options.maximum_duration = solve_options
                    .maximum_duration
                    .min(options.duration.saturating_sub(start.elapsed()));

                let solver = (self.solver_factory)(&information, best.clone());
                runs.push((solver, solve_options));
            }

            let results: Vec<SolveResult<S>> = runs
                .into_par_iter()
                .map(|(mut solver, solve_options)| {
                    solver.solve_with_cancel(&solve_options, cancel.clone())
                })
                .collect();

            for result in results {
                iterations_used += result.iterations;
                improvements += result.improvements;
                cancelled |= result.cancelled;
                if result.best_score < best_score {
                    best_score = result.best_score;
                    best = result.best;
                }
            }

            self.progression.push(ProgressionEntry {
                elapsed_seconds: start.elapsed().as_secs_f64(),
                value: best_score,
            });
            tracing::debug!(cycle, best_score, iterations_used, "cycle finished");
            cycle += 1;
        }

        SolveResult {
            best,
            best_score,
            iterations: iterations_used,
            improvements,
            cancelled,
        }
    }
}
