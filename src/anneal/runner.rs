//! Annealing engine and main loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::config::Schedule;
use super::metropolis::{Walker, Window};
use super::report::{remaining, LineReporter, Progress, Reporter};
use super::types::AnnealState;
use crate::error::Result;

/// Simulated annealing engine.
///
/// Owns the working state and a reporter, and runs the Metropolis loop
/// under an exponential cooling schedule. The schedule can be set by
/// hand or estimated with [`auto`](Annealer::auto).
///
/// # Examples
///
/// ```no_run
/// use u_anneal::anneal::{Annealer, AnnealState, Schedule};
///
/// #[derive(Clone)]
/// struct Walk(i64);
///
/// impl AnnealState for Walk {
///     fn make_move(&mut self) {
///         self.0 += if rand::random::<bool>() { 1 } else { -1 };
///     }
///     fn energy(&self) -> f64 {
///         (self.0 * self.0) as f64
///     }
/// }
///
/// let mut annealer = Annealer::new(Walk(40));
/// annealer.set_schedule(Schedule::default().with_steps(10_000).with_updates(10));
/// let (_best, energy) = annealer.anneal().unwrap();
/// assert!(energy <= 1600.0);
/// ```
pub struct Annealer<S: AnnealState> {
    pub(crate) schedule: Schedule,
    pub(crate) state: S,
    best: Option<(S, f64)>,
    pub(crate) start: Instant,
    exit: Arc<AtomicBool>,
    pub(crate) reporter: Box<dyn Reporter>,
}

impl<S: AnnealState> Annealer<S> {
    /// Creates an annealer around `initial` with the default schedule,
    /// reporting to standard error.
    pub fn new(initial: S) -> Self {
        Self {
            schedule: Schedule::default(),
            state: initial,
            best: None,
            start: Instant::now(),
            exit: Arc::new(AtomicBool::new(false)),
            reporter: Box::new(LineReporter::stderr()),
        }
    }

    /// Replaces the progress observer.
    pub fn with_reporter<R: Reporter + 'static>(mut self, reporter: R) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Current run parameters.
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Sets all four run parameters, typically from [`auto`](Annealer::auto).
    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
    }

    /// Shared cancellation flag. Setting it to `true` from any thread makes
    /// a running loop stop after its current move.
    pub fn exit_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.exit)
    }

    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::Relaxed);
    }

    /// Re-arms the engine after a cancelled run.
    pub fn clear_exit(&self) {
        self.exit.store(false, Ordering::Relaxed);
    }

    pub fn user_exit(&self) -> bool {
        self.exit.load(Ordering::Relaxed)
    }

    /// The working state.
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// Replaces the working state so the engine can be reused.
    pub fn reseed(&mut self, state: S) {
        self.state = state;
        self.best = None;
    }

    /// Best state and energy from the most recent run, if any.
    pub fn best(&self) -> Option<(&S, f64)> {
        self.best.as_ref().map(|(s, e)| (s, *e))
    }

    /// Minimizes the energy of the working state.
    ///
    /// Returns an independent copy of the best state seen and its energy.
    /// A cancelled run returns the best found up to that point.
    ///
    /// # Errors
    ///
    /// Fails before any move is attempted if the schedule's temperatures
    /// are not positive.
    pub fn anneal(&mut self) -> Result<(S, f64)> {
        let cooling = self.schedule.cooling()?;
        let Schedule { steps, updates, .. } = self.schedule;

        let mut rng = rand::rng();
        self.start = Instant::now();

        let mut temperature = cooling.temperature(0);
        let mut walker = Walker::new(&self.state);
        let mut window = Window::default();

        tracing::info!(
            t_max = self.schedule.t_max,
            t_min = self.schedule.t_min,
            steps,
            energy = walker.energy(),
            "annealing started"
        );

        let wavelength = steps as f64 / updates as f64;
        if updates > 0 {
            self.emit(0, temperature, walker.energy(), &window, steps);
        }

        let mut step = 0usize;
        while step < steps && !self.user_exit() {
            step += 1;
            temperature = cooling.temperature(step);

            self.state.make_move();
            let outcome = walker.step(&mut self.state, temperature, &mut rng);
            window.record(outcome);

            if updates > 0
                && (step as f64 / wavelength).floor() > ((step - 1) as f64 / wavelength).floor()
            {
                self.emit(step, temperature, walker.energy(), &window, steps);
                window.reset();
            }
        }
        self.reporter.finish();

        let (best, best_energy) = walker.into_best();
        let cancelled = step < steps;
        tracing::info!(
            steps = step,
            cancelled,
            best_energy,
            elapsed_secs = self.start.elapsed().as_secs_f64(),
            "annealing finished"
        );

        self.best = Some((best.clone(), best_energy));
        Ok((best, best_energy))
    }

    fn emit(&mut self, step: usize, temperature: f64, energy: f64, window: &Window, steps: usize) {
        let elapsed = self.start.elapsed();
        self.reporter.report(&Progress {
            step,
            temperature,
            energy,
            acceptance: window.acceptance(),
            improvement: window.improvement(),
            elapsed,
            remaining: remaining(steps, step, elapsed),
        });
    }
}

impl<S: AnnealState + std::fmt::Debug> std::fmt::Debug for Annealer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annealer")
            .field("schedule", &self.schedule)
            .field("state", &self.state)
            .field("best", &self.best)
            .field("user_exit", &self.user_exit())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anneal::report::SilentReporter;
    use crate::error::AnnealError;
    use rand::seq::SliceRandom;
    use rand::Rng;
    use std::cell::RefCell;
    use std::rc::Rc;

    // ---- Travelling salesman on a circle ----

    #[derive(Clone, Debug)]
    struct Tour {
        order: Vec<usize>,
        distances: Rc<Vec<Vec<f64>>>,
    }

    impl Tour {
        fn shuffled(n: usize) -> Self {
            let points: Vec<(f64, f64)> = (0..n)
                .map(|i| {
                    let angle = i as f64 * std::f64::consts::TAU / n as f64;
                    (100.0 * angle.cos(), 100.0 * angle.sin())
                })
                .collect();
            let distances = points
                .iter()
                .map(|a| {
                    points
                        .iter()
                        .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                        .collect()
                })
                .collect();
            let mut order: Vec<usize> = (0..n).collect();
            order.shuffle(&mut rand::rng());
            Self {
                order,
                distances: Rc::new(distances),
            }
        }
    }

    impl AnnealState for Tour {
        fn make_move(&mut self) {
            let mut rng = rand::rng();
            let a = rng.random_range(0..self.order.len());
            let b = rng.random_range(0..self.order.len());
            self.order.swap(a, b);
        }

        fn energy(&self) -> f64 {
            let n = self.order.len();
            (0..n)
                .map(|i| self.distances[self.order[(i + n - 1) % n]][self.order[i]])
                .sum()
        }
    }

    // ---- Counting random walk ----

    #[derive(Clone, Debug)]
    struct Counter {
        x: i64,
        moves: usize,
        stop_after: Option<(usize, Arc<AtomicBool>)>,
    }

    impl Counter {
        fn new(x: i64) -> Self {
            Self {
                x,
                moves: 0,
                stop_after: None,
            }
        }
    }

    impl AnnealState for Counter {
        fn make_move(&mut self) {
            self.moves += 1;
            self.x += if rand::rng().random::<bool>() { 1 } else { -1 };
            if let Some((limit, flag)) = &self.stop_after {
                if self.moves >= *limit {
                    flag.store(true, Ordering::Relaxed);
                }
            }
        }

        fn energy(&self) -> f64 {
            (self.x * self.x) as f64
        }
    }

    /// Collects every report for inspection.
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Progress>>>);

    impl Reporter for Recorder {
        fn report(&mut self, progress: &Progress) {
            self.0.borrow_mut().push(*progress);
        }
    }

    #[test]
    fn test_anneal_tsp_keeps_every_city() {
        let initial = Tour::shuffled(20);
        let initial_energy = initial.energy();

        let mut annealer = Annealer::new(initial).with_reporter(SilentReporter);
        annealer.set_schedule(
            Schedule::default()
                .with_t_max(25000.0)
                .with_t_min(2.5)
                .with_steps(50000),
        );
        let (best, best_energy) = annealer.anneal().unwrap();

        assert_eq!(best.order.len(), 20);
        let mut sorted = best.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
        assert!(best_energy <= initial_energy);
        assert!((best.energy() - best_energy).abs() < 1e-9);
    }

    #[test]
    fn test_anneal_best_not_worse_than_initial() {
        for start in [-30, 0, 7, 100] {
            let mut annealer = Annealer::new(Counter::new(start)).with_reporter(SilentReporter);
            annealer.set_schedule(Schedule::default().with_steps(2000).with_t_max(50.0));
            let (best, best_energy) = annealer.anneal().unwrap();

            assert!(best_energy <= (start * start) as f64);
            assert_eq!(best.energy(), best_energy);
            assert_eq!(annealer.best().map(|(_, e)| e), Some(best_energy));
        }
    }

    #[test]
    fn test_anneal_rejects_zero_t_min_before_moving() {
        let mut annealer = Annealer::new(Counter::new(5)).with_reporter(SilentReporter);
        annealer.set_schedule(Schedule::default().with_t_min(0.0));

        let err = annealer.anneal().unwrap_err();

        assert_eq!(err, AnnealError::NonPositiveMinTemperature(0.0));
        assert_eq!(annealer.state().moves, 0);
        assert_eq!(annealer.state().x, 5);
        assert!(annealer.best().is_none());
    }

    #[test]
    fn test_anneal_runs_exact_step_budget() {
        // Rollbacks restore `moves` too, so count reports instead.
        let recorder = Recorder::default();
        let mut annealer = Annealer::new(Counter::new(0)).with_reporter(recorder.clone());
        annealer.set_schedule(Schedule::default().with_steps(1000).with_updates(1000));
        annealer.anneal().unwrap();
        assert_eq!(recorder.0.borrow().len(), 1001);
    }

    #[test]
    fn test_anneal_cancellation_mid_run() {
        let mut annealer = Annealer::new(Counter::new(10)).with_reporter(SilentReporter);
        let flag = annealer.exit_handle();
        let mut seed = Counter::new(10);
        seed.stop_after = Some((1, flag));
        annealer.reseed(seed);

        let recorder = Recorder::default();
        let mut annealer = annealer
            .with_reporter(recorder.clone())
            .with_schedule(Schedule::default().with_steps(10_000).with_updates(10_000));
        let (best, best_energy) = annealer.anneal().unwrap();

        // Step 0 plus the single move before the flag was observed.
        assert_eq!(recorder.0.borrow().len(), 2);
        assert!(annealer.user_exit());
        assert!(best_energy <= 100.0);
        assert_eq!(best.energy(), best_energy);
    }

    #[test]
    fn test_anneal_cancelled_before_start() {
        let recorder = Recorder::default();
        let mut annealer = Annealer::new(Counter::new(3)).with_reporter(recorder.clone());
        annealer.request_exit();

        let (best, best_energy) = annealer.anneal().unwrap();

        assert_eq!(annealer.state().moves, 0);
        assert_eq!(best.x, 3);
        assert_eq!(best_energy, 9.0);
        assert_eq!(recorder.0.borrow().len(), 1);

        annealer.clear_exit();
        assert!(!annealer.user_exit());
    }

    #[test]
    fn test_anneal_report_cadence_and_windows() {
        let recorder = Recorder::default();
        let mut annealer = Annealer::new(Counter::new(0)).with_reporter(recorder.clone());
        annealer.set_schedule(Schedule::default().with_steps(1000).with_updates(10));
        annealer.anneal().unwrap();

        let reports = recorder.0.borrow();
        let steps: Vec<usize> = reports.iter().map(|p| p.step).collect();
        assert_eq!(
            steps,
            vec![0, 100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]
        );

        assert_eq!(reports[0].temperature, 25000.0);
        assert_eq!(reports[0].acceptance, 0.0);
        assert!(reports[0].remaining.is_none());
        for p in &reports[1..] {
            assert!((0.0..=1.0).contains(&p.acceptance));
            assert!(p.improvement <= p.acceptance);
            assert!(p.remaining.is_some());
        }
        assert!((reports[10].temperature - 2.5).abs() < 1e-9);
        for pair in reports.windows(2) {
            assert!(pair[1].temperature <= pair[0].temperature);
        }
    }

    #[test]
    fn test_anneal_silent_when_updates_zero() {
        let recorder = Recorder::default();
        let mut annealer = Annealer::new(Counter::new(0)).with_reporter(recorder.clone());
        annealer.set_schedule(Schedule::default().with_steps(500).with_updates(0));
        annealer.anneal().unwrap();
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_reseed_clears_previous_best() {
        let mut annealer = Annealer::new(Counter::new(4)).with_reporter(SilentReporter);
        annealer.set_schedule(Schedule::default().with_steps(100));
        annealer.anneal().unwrap();
        assert!(annealer.best().is_some());

        annealer.reseed(Counter::new(-8));
        assert!(annealer.best().is_none());
        assert_eq!(annealer.state().x, -8);

        let (_, best_energy) = annealer.anneal().unwrap();
        assert!(best_energy <= 64.0);
    }
}
