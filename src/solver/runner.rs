//! The solve loop.

use super::{SolveEvents, SolveInformation, SolveObserver, SolveObservers, SolveOptions};
use crate::operator::{OperatorContext, SolveOperator, SolveOperators};
use crate::parameter::{SolveParameter, SolveParameters};
use crate::progression::ProgressionEntry;
use crate::random::create_rng;
use crate::solution::Solution;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Result of a solve run.
#[derive(Debug, Clone)]
pub struct SolveResult<S> {
    /// The best solution found.
    pub best: S,

    /// Score of the best solution.
    pub best_score: f64,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Number of times the best solution was replaced.
    pub improvements: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

/// The Adaptive Large Neighborhood Search solver.
///
/// A solver owns two independent copies of the solution it was created
/// with: the work solution, mutated by operators across iterations, and the
/// best solution, replaced wholesale whenever an improvement-capable
/// operator leaves the work solution with a lower score. Operators,
/// parameters and observers execute in registration order; together with
/// the seeded random source this makes a run reproducible.
///
/// A single solve call is strictly single-threaded and synchronous:
/// operators and notification handlers run inline and block the loop.
/// Operator panics are not caught; a move that corrupts solution state is
/// worse than a crash, and the engine cannot validate arbitrary solution
/// types itself.
pub struct Solver<S: Solution> {
    work: S,
    best: S,
    operators: SolveOperators<S>,
    parameters: SolveParameters,
    events: SolveEvents<S>,
    observers: SolveObservers<S>,
    rng: StdRng,
    progression: Vec<ProgressionEntry>,
}

impl<S: Solution> Solver<S> {
    /// Creates a solver starting from `solution`, with a seeded random
    /// source.
    pub fn new(solution: S, seed: u64) -> Self {
        let best = solution.clone();
        Self {
            work: solution,
            best,
            operators: Vec::new(),
            parameters: Vec::new(),
            events: SolveEvents::new(),
            observers: SolveObservers::new(),
            rng: create_rng(seed),
            progression: Vec::new(),
        }
    }

    /// Adds a solve-operator. Operators execute in the order they were
    /// added.
    pub fn add_solve_operator(&mut self, operator: Box<dyn SolveOperator<S>>) {
        self.operators.push(operator);
    }

    /// Adds a number of solve-operators.
    pub fn add_solve_operators<I>(&mut self, operators: I)
    where
        I: IntoIterator<Item = Box<dyn SolveOperator<S>>>,
    {
        self.operators.extend(operators);
    }

    /// The solve-operators used by the solver.
    pub fn solve_operators(&self) -> &SolveOperators<S> {
        &self.operators
    }

    /// Registers a parameter to be updated once per iteration, after all
    /// operators for that iteration have run. Parameters owned by operators
    /// are updated through their operator and need no registration.
    pub fn register(&mut self, parameter: Box<dyn SolveParameter>) {
        self.parameters.push(parameter);
    }

    /// Adds an observer of the solve lifecycle.
    pub fn add_observer(&mut self, observer: Box<dyn SolveObserver<S>>) {
        self.observers.add(observer);
    }

    /// The solve-events fired by the solver. Register handlers before
    /// calling [`solve`](Self::solve).
    pub fn solve_events(&mut self) -> &mut SolveEvents<S> {
        &mut self.events
    }

    /// The best solution found so far.
    pub fn best_solution(&self) -> &S {
        &self.best
    }

    /// The current work solution.
    pub fn work_solution(&self) -> &S {
        &self.work
    }

    /// The random number generator used by the solver.
    pub fn random(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// How the best score evolved: one entry per improvement.
    pub fn progression(&self) -> &[ProgressionEntry] {
        &self.progression
    }

    /// Installs `solution` as the work solution.
    pub fn reset(&mut self, solution: S) {
        let info = SolveInformation::new();
        self.events.reset.trigger(&solution, &info);
        self.observers.on_reset(&solution, &info);
        self.work = solution;
    }

    /// Resets the work solution to a copy of the current best. Used
    /// between solve calls on the same solver, e.g. across parallel
    /// cycles.
    pub fn restart(&mut self) {
        self.reset(self.best.clone());
    }

    /// Runs the search and returns the best solution found.
    ///
    /// The run stops when the iteration bound or the duration bound of
    /// `options` is reached, whichever comes first. Reaching a bound is
    /// the normal termination condition.
    pub fn solve(&mut self, options: &SolveOptions) -> SolveResult<S> {
        self.solve_with_cancel(options, None)
    }

    /// Runs the search with a cancellation token.
    ///
    /// Cancellation is cooperative: the flag is checked between
    /// iterations, and in-flight operator executions are never interrupted
    /// preemptively. Operators see the same token through their context.
    pub fn solve_with_cancel(
        &mut self,
        options: &SolveOptions,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolveResult<S> {
        static NOT_CANCELLED: AtomicBool = AtomicBool::new(false);
        let cancel_flag: &AtomicBool = cancel.as_deref().unwrap_or(&NOT_CANCELLED);

        let start = Instant::now();
        let mut info = SolveInformation::new();
        info.set_start(start);

        tracing::debug!(
            iterations = options.iterations,
            operators = self.operators.len(),
            "solve starting"
        );

        self.events.start.trigger(&info);
        self.observers.on_start(&info);
        for operator in &mut self.operators {
            operator.on_start_solve(&info);
        }

        let mut best_score = self.best.score();
        let mut iterations = 0usize;
        let mut improvements = 0usize;
        let mut cancelled = false;

        while iterations < options.iterations && start.elapsed() < options.maximum_duration {
            if cancel_flag.load(Ordering::Relaxed) {
                cancelled = true;
                self.events.context_done.trigger(&info);
                self.observers.on_context_done(&info);
                break;
            }

            info.begin_iteration(iterations);
            self.events.iterating.trigger(&info);
            self.observers.on_iteration(&info);

            for i in 0..self.operators.len() {
                let draw: f64 = self.rng.random_range(0.0..1.0);
                if draw >= self.operators[i].probability() {
                    continue;
                }

                info.record_executed(self.operators[i].index());
                self.events.operator_executing.trigger(&info);
                self.observers.on_execute(&info);

                let mut ctx = OperatorContext::new(
                    &mut self.work,
                    &self.best,
                    &info,
                    &mut self.rng,
                    cancel_flag,
                );
                self.operators[i].execute(&mut ctx);

                self.events.operator_executed.trigger(&info);
                self.observers.on_executed(&info);

                if self.operators[i].can_result_in_improvement() {
                    let delta = self.work.score() - best_score;
                    if delta < 0.0 {
                        info.add_delta_score(delta);
                        self.events.improvement_found.trigger(&info);
                        self.observers.on_improvement(&info);

                        self.best = self.work.clone();
                        best_score = self.best.score();
                        improvements += 1;
                        self.progression.push(ProgressionEntry {
                            elapsed_seconds: start.elapsed().as_secs_f64(),
                            value: best_score,
                        });
                        tracing::trace!(score = best_score, iteration = iterations, "improvement");

                        for operator in &mut self.operators {
                            operator.on_better_solution(&info);
                        }
                    }
                }
            }

            for operator in &mut self.operators {
                operator.update_parameters(&info);
            }
            for parameter in &mut self.parameters {
                parameter.update(&info);
            }

            self.events.iterated.trigger(&info);
            self.observers.on_iterated(&info);
            iterations += 1;
        }

        self.events.done.trigger(&info);
        self.observers.on_end(&info);

        tracing::debug!(iterations, improvements, best_score, "solve finished");

        SolveResult {
            best: self.best.clone(),
            best_score,
            iterations,
            improvements,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{validate_probability, OperatorError, OperatorIndex};
    use crate::parameter::{AdaptiveParameter, IntParameterOptions};
    use crate::test_support::{CountingOperator, ScoredValue};
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn options(iterations: usize) -> SolveOptions {
        SolveOptions::default().with_iterations(iterations)
    }

    /// Moves the work score by a seeded random step; improvement-capable.
    struct RandomWalkOperator {
        index: OperatorIndex,
    }

    impl RandomWalkOperator {
        fn new() -> Self {
            Self {
                index: OperatorIndex::new(),
            }
        }
    }

    impl SolveOperator<ScoredValue> for RandomWalkOperator {
        fn index(&self) -> OperatorIndex {
            self.index
        }

        fn execute(&mut self, ctx: &mut OperatorContext<'_, ScoredValue>) {
            let step: f64 = ctx.rng().random_range(-1.0..1.0);
            ctx.work_mut().0 += step;
        }

        fn probability(&self) -> f64 {
            0.5
        }

        fn set_probability(&mut self, _probability: f64) -> Result<(), OperatorError> {
            Ok(())
        }

        fn can_result_in_improvement(&self) -> bool {
            true
        }
    }

    /// Records the notifications every operator is entitled to.
    struct NotifyProbe {
        index: OperatorIndex,
        starts: Arc<AtomicUsize>,
        betters: Arc<AtomicUsize>,
    }

    impl SolveOperator<ScoredValue> for NotifyProbe {
        fn index(&self) -> OperatorIndex {
            self.index
        }

        fn execute(&mut self, _ctx: &mut OperatorContext<'_, ScoredValue>) {}

        fn probability(&self) -> f64 {
            0.0
        }

        fn set_probability(&mut self, probability: f64) -> Result<(), OperatorError> {
            validate_probability(probability).map(|_| ())
        }

        fn can_result_in_improvement(&self) -> bool {
            false
        }

        fn on_start_solve(&mut self, _info: &SolveInformation) {
            self.starts.fetch_add(1, Ordering::Relaxed);
        }

        fn on_better_solution(&mut self, _info: &SolveInformation) {
            self.betters.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_end_to_end_improvement_run() {
        let mut solver = Solver::new(ScoredValue(10.0), 42);
        solver.add_solve_operator(Box::new(CountingOperator::new(1.0, Arc::default()).improving()));

        let improvement_events = Arc::new(AtomicUsize::new(0));
        let counter = improvement_events.clone();
        solver
            .solve_events()
            .improvement_found
            .register(move |_info| {
                counter.fetch_add(1, Ordering::Relaxed);
            });

        let result = solver.solve(&options(5));

        assert_eq!(result.best_score, 5.0);
        assert_eq!(result.best.0, 5.0);
        assert_eq!(result.iterations, 5);
        assert_eq!(result.improvements, 5);
        assert!(!result.cancelled);
        assert_eq!(improvement_events.load(Ordering::Relaxed), 5);
        assert_eq!(solver.best_solution().0, 5.0);
        assert_eq!(solver.progression().len(), 5);
    }

    #[test]
    fn test_best_score_never_regresses() {
        let mut solver = Solver::new(ScoredValue(10.0), 7);
        solver.add_solve_operator(Box::new(RandomWalkOperator::new()));

        let scores = Arc::new(Mutex::new(Vec::new()));
        let log = scores.clone();
        solver.solve_events().improvement_found.register(move |info| {
            log.lock().unwrap().push(info.delta_score());
        });

        let result = solver.solve(&options(500));

        for window in solver.progression().windows(2) {
            assert!(
                window[1].value <= window[0].value,
                "best score regressed: {} -> {}",
                window[0].value,
                window[1].value
            );
        }
        assert!(result.best_score <= 10.0);
        for delta in scores.lock().unwrap().iter() {
            assert!(*delta < 0.0);
        }
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let run = || {
            let mut solver = Solver::new(ScoredValue(10.0), 1234);
            solver.add_solve_operator(Box::new(RandomWalkOperator::new()));
            let trace = Arc::new(Mutex::new(Vec::new()));
            let log = trace.clone();
            solver.solve_events().iterated.register(move |info| {
                log.lock()
                    .unwrap()
                    .push((info.iteration(), info.executed_operators().len()));
            });
            let result = solver.solve(&options(200));
            let trace = trace.lock().unwrap().clone();
            (result.best_score, result.improvements, trace)
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_probability_boundaries() {
        let never = Arc::new(AtomicUsize::new(0));
        let always = Arc::new(AtomicUsize::new(0));

        let mut solver = Solver::new(ScoredValue(0.0), 3);
        solver.add_solve_operator(Box::new(CountingOperator::new(0.0, never.clone())));
        solver.add_solve_operator(Box::new(CountingOperator::new(1.0, always.clone())));

        solver.solve(&options(1000));

        assert_eq!(never.load(Ordering::Relaxed), 0);
        assert_eq!(always.load(Ordering::Relaxed), 1000);
    }

    #[test]
    fn test_operators_execute_in_registration_order() {
        struct OrderProbe {
            index: OperatorIndex,
            id: usize,
            log: Arc<Mutex<Vec<usize>>>,
        }

        impl SolveOperator<ScoredValue> for OrderProbe {
            fn index(&self) -> OperatorIndex {
                self.index
            }

            fn execute(&mut self, _ctx: &mut OperatorContext<'_, ScoredValue>) {
                self.log.lock().unwrap().push(self.id);
            }

            fn probability(&self) -> f64 {
                1.0
            }

            fn set_probability(&mut self, _probability: f64) -> Result<(), OperatorError> {
                Ok(())
            }

            fn can_result_in_improvement(&self) -> bool {
                false
            }
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut solver = Solver::new(ScoredValue(0.0), 11);
        for id in 0..2 {
            solver.add_solve_operator(Box::new(OrderProbe {
                index: OperatorIndex::new(),
                id,
                log: log.clone(),
            }));
        }

        solver.solve(&options(3));

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_duration_bound_wins() {
        struct SleepOperator {
            index: OperatorIndex,
        }

        impl SolveOperator<ScoredValue> for SleepOperator {
            fn index(&self) -> OperatorIndex {
                self.index
            }

            fn execute(&mut self, _ctx: &mut OperatorContext<'_, ScoredValue>) {
                std::thread::sleep(Duration::from_millis(2));
            }

            fn probability(&self) -> f64 {
                1.0
            }

            fn set_probability(&mut self, _probability: f64) -> Result<(), OperatorError> {
                Ok(())
            }

            fn can_result_in_improvement(&self) -> bool {
                false
            }
        }

        let mut solver = Solver::new(ScoredValue(0.0), 0);
        solver.add_solve_operator(Box::new(SleepOperator {
            index: OperatorIndex::new(),
        }));

        let result = solver.solve(
            &SolveOptions::default()
                .with_iterations(1_000_000)
                .with_maximum_duration(Duration::from_millis(1)),
        );

        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_empty_operator_list_still_fires_lifecycle() {
        let mut solver: Solver<ScoredValue> = Solver::new(ScoredValue(1.0), 5);

        let iteratings = Arc::new(AtomicUsize::new(0));
        let dones = Arc::new(AtomicUsize::new(0));
        let starts = Arc::new(AtomicUsize::new(0));

        let counter = iteratings.clone();
        solver.solve_events().iterating.register(move |_info| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        let counter = dones.clone();
        solver.solve_events().done.register(move |_info| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        let counter = starts.clone();
        solver.solve_events().start.register(move |_info| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let result = solver.solve(&options(10));

        assert_eq!(result.iterations, 10);
        assert_eq!(result.improvements, 0);
        assert_eq!(starts.load(Ordering::Relaxed), 1);
        assert_eq!(iteratings.load(Ordering::Relaxed), 10);
        assert_eq!(dones.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_operator_notifications() {
        let starts = Arc::new(AtomicUsize::new(0));
        let betters = Arc::new(AtomicUsize::new(0));

        let mut solver = Solver::new(ScoredValue(10.0), 9);
        solver.add_solve_operator(Box::new(CountingOperator::new(1.0, Arc::default()).improving()));
        solver.add_solve_operator(Box::new(NotifyProbe {
            index: OperatorIndex::new(),
            starts: starts.clone(),
            betters: betters.clone(),
        }));

        solver.solve(&options(5));

        assert_eq!(starts.load(Ordering::Relaxed), 1);
        // Every best-solution replacement notifies every registered
        // operator, including ones that never execute.
        assert_eq!(betters.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_registered_parameter_updated_once_per_iteration() {
        let mut solver = Solver::new(ScoredValue(100.0), 21);
        solver.add_solve_operator(Box::new(CountingOperator::new(1.0, Arc::default()).improving()));
        solver.register(Box::new(
            AdaptiveParameter::new(IntParameterOptions {
                start_value: 4,
                delta_after_iterations: 0,
                delta: 1,
                min_value: 0,
                max_value: 100,
                snap_back_after_improvement: false,
                zigzag: false,
            })
            .unwrap(),
        ));

        solver.solve(&options(5));

        // Every iteration improved, so the plateau counter kept resetting
        // and the value never moved.
        assert_eq!(solver.parameters[0].value(), 4);
    }

    #[test]
    fn test_composites_drive_improvements_through_the_solver() {
        use crate::operator::{SolveOperatorAnd, SolveOperatorOr, SolveOperators};

        let and_children: SolveOperators<ScoredValue> = vec![
            Box::new(CountingOperator::new(1.0, Arc::default()).improving()),
            Box::new(CountingOperator::new(0.0, Arc::default()).improving()),
        ];
        let or_children: SolveOperators<ScoredValue> = vec![
            Box::new(CountingOperator::new(0.3, Arc::default()).improving()),
            Box::new(CountingOperator::new(0.7, Arc::default()).improving()),
        ];

        let mut solver = Solver::new(ScoredValue(100.0), 31);
        solver.add_solve_operator(Box::new(SolveOperatorAnd::new(1.0, and_children).unwrap()));
        solver.add_solve_operator(Box::new(SolveOperatorOr::new(2, 1.0, or_children).unwrap()));

        let result = solver.solve(&options(10));

        // Per iteration: the and-composite's certain child fires once, the
        // or-composite executes two picks. Score drops by 3 per iteration.
        assert_eq!(result.best_score, 70.0);
        assert_eq!(result.improvements, 20);
    }

    #[test]
    fn test_cancellation_stops_before_first_iteration() {
        let mut solver = Solver::new(ScoredValue(10.0), 2);
        solver.add_solve_operator(Box::new(CountingOperator::new(1.0, Arc::default()).improving()));

        let cancel = Arc::new(AtomicBool::new(true));
        let cancellations = Arc::new(AtomicUsize::new(0));
        let counter = cancellations.clone();
        solver.solve_events().context_done.register(move |_info| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let result = solver.solve_with_cancel(&options(1000), Some(cancel));

        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best_score, 10.0);
        assert_eq!(cancellations.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_restart_resets_work_to_best() {
        let mut solver = Solver::new(ScoredValue(10.0), 13);
        solver.add_solve_operator(Box::new(CountingOperator::new(1.0, Arc::default()).improving()));
        solver.solve(&options(3));

        // Push the work solution somewhere worse than the best.
        solver.reset(ScoredValue(50.0));
        assert_eq!(solver.work_solution().0, 50.0);
        assert_eq!(solver.best_solution().0, 7.0);

        solver.restart();
        assert_eq!(solver.work_solution().0, 7.0);
    }

    #[test]
    fn test_reset_fires_event() {
        let mut solver: Solver<ScoredValue> = Solver::new(ScoredValue(1.0), 17);
        let resets = Arc::new(AtomicUsize::new(0));
        let counter = resets.clone();
        solver
            .solve_events()
            .reset
            .register(move |solution: &ScoredValue, _info| {
                assert_eq!(solution.0, 3.0);
                counter.fetch_add(1, Ordering::Relaxed);
            });

        solver.reset(ScoredValue(3.0));

        assert_eq!(resets.load(Ordering::Relaxed), 1);
    }
}
