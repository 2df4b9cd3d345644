//! Automatic schedule estimation.
//!
//! # Algorithm
//!
//! 1. Move away from the starting state until the energy changes; the
//!    absolute change seeds the temperature.
//! 2. Run constant-temperature trials, dividing the temperature by the
//!    step factor while acceptance is above target, then multiplying it
//!    while acceptance is below target. The result is `t_max`.
//! 3. Keep dividing until the improvement rate drops to the target. The
//!    result is `t_min`.
//! 4. Extrapolate the step budget for the requested duration from the
//!    measured move throughput.
//!
//! Trials run on the annealer's own working state and are not undone.

use std::time::Instant;

use rand::Rng;

use super::config::{AutoConfig, Schedule};
use super::metropolis::{Walker, Window};
use super::report::Progress;
use super::runner::Annealer;
use super::types::AnnealState;
use crate::error::{AnnealError, Result};
use crate::format::round_figure;

/// Outcome of one constant-temperature trial batch.
#[derive(Debug, Clone, Copy)]
struct Trial {
    energy: f64,
    acceptance: f64,
    improvement: f64,
}

impl<S: AnnealState> Annealer<S> {
    /// Estimates a schedule that anneals in about `minutes` of wall-clock
    /// time, using trial batches of `trial_steps` moves.
    ///
    /// The returned schedule carries the current `updates` unchanged and
    /// can be passed straight to [`set_schedule`](Annealer::set_schedule).
    ///
    /// The working state must have a neighbourhood that changes the
    /// energy; otherwise the temperature bootstrap never terminates.
    pub fn auto(&mut self, minutes: f64, trial_steps: usize) -> Result<Schedule> {
        self.auto_with(&AutoConfig::default(), minutes, trial_steps)
    }

    /// [`auto`](Annealer::auto) with explicit tuning targets.
    pub fn auto_with(
        &mut self,
        config: &AutoConfig,
        minutes: f64,
        trial_steps: usize,
    ) -> Result<Schedule> {
        self.tune(config, minutes, trial_steps, &mut rand::rng())
    }

    pub(crate) fn tune<R: Rng>(
        &mut self,
        config: &AutoConfig,
        minutes: f64,
        trial_steps: usize,
        rng: &mut R,
    ) -> Result<Schedule> {
        if trial_steps == 0 {
            return Err(AnnealError::NoTrialSteps);
        }
        if config.factor.is_nan() || config.factor <= 1.0 {
            return Err(AnnealError::InvalidStepFactor(config.factor));
        }

        self.start = Instant::now();
        let mut step = 0usize;

        // Initial guess: the first non-zero energy change.
        let mut temperature = 0.0;
        let energy = self.state.energy();
        self.emit_trial(step, temperature, energy, None);
        while temperature == 0.0 {
            step += 1;
            self.state.make_move();
            temperature = (self.state.energy() - energy).abs();
        }
        tracing::debug!(temperature, moves = step, "auto: initial temperature guess");

        // t_max: acceptance near target.
        let mut trial = self.trial(temperature, trial_steps, rng);
        step += trial_steps;
        while trial.acceptance > config.target_acceptance {
            temperature = round_figure(temperature / config.factor, config.figures);
            trial = self.trial(temperature, trial_steps, rng);
            step += trial_steps;
            self.emit_trial(step, temperature, trial.energy, Some(&trial));
        }
        while trial.acceptance < config.target_acceptance {
            temperature = round_figure(temperature * config.factor, config.figures);
            trial = self.trial(temperature, trial_steps, rng);
            step += trial_steps;
            self.emit_trial(step, temperature, trial.energy, Some(&trial));
        }
        let t_max = temperature;
        tracing::debug!(t_max, acceptance = trial.acceptance, "auto: found t_max");

        // t_min: improvements have dried up.
        while trial.improvement > config.target_improvement {
            temperature = round_figure(temperature / config.factor, config.figures);
            trial = self.trial(temperature, trial_steps, rng);
            step += trial_steps;
            self.emit_trial(step, temperature, trial.energy, Some(&trial));
        }
        let t_min = temperature;
        tracing::debug!(t_min, improvement = trial.improvement, "auto: found t_min");
        self.reporter.finish();

        let elapsed = self.start.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return Err(AnnealError::NoElapsedTime { moves: step });
        }
        let steps = round_figure(60.0 * minutes * step as f64 / elapsed, config.figures);

        let schedule = Schedule {
            t_max,
            t_min,
            steps: steps.max(0.0) as usize,
            updates: self.schedule.updates,
        };
        tracing::info!(
            t_max = schedule.t_max,
            t_min = schedule.t_min,
            steps = schedule.steps,
            moves = step,
            elapsed_secs = elapsed,
            "auto schedule estimated"
        );
        Ok(schedule)
    }

    /// Anneals at constant `temperature` for `steps` moves.
    fn trial<R: Rng>(&mut self, temperature: f64, steps: usize, rng: &mut R) -> Trial {
        let mut walker = Walker::new(&self.state);
        let mut window = Window::default();
        for _ in 0..steps {
            self.state.make_move();
            window.record(walker.step(&mut self.state, temperature, rng));
        }
        let trial = Trial {
            energy: walker.energy(),
            acceptance: window.acceptance(),
            improvement: window.improvement(),
        };
        tracing::debug!(
            temperature,
            energy = trial.energy,
            acceptance = trial.acceptance,
            improvement = trial.improvement,
            "auto: trial batch"
        );
        trial
    }

    fn emit_trial(&mut self, step: usize, temperature: f64, energy: f64, trial: Option<&Trial>) {
        self.reporter.report(&Progress {
            step,
            temperature,
            energy,
            acceptance: trial.map_or(0.0, |t| t.acceptance),
            improvement: trial.map_or(0.0, |t| t.improvement),
            elapsed: self.start.elapsed(),
            remaining: None,
        });
    }
}
