//! Annealing schedule and auto-tuner configuration.

use crate::error::{AnnealError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Run parameters for the annealer.
///
/// Set the fields directly, chain the `with_*` builders, or take the
/// output of [`Annealer::auto`](super::Annealer::auto) as-is.
///
/// # Examples
///
/// ```
/// use u_anneal::anneal::Schedule;
///
/// let schedule = Schedule::default()
///     .with_t_max(1000.0)
///     .with_t_min(0.5)
///     .with_steps(20_000)
///     .with_updates(0);
/// assert!(schedule.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    /// Starting temperature, used at step 0.
    pub t_max: f64,

    /// Final temperature, reached at the last step. Must be positive.
    pub t_min: f64,

    /// Number of moves to attempt.
    pub steps: usize,

    /// Number of progress reports over the run. 0 = silent.
    pub updates: usize,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            t_max: 25000.0,
            t_min: 2.5,
            steps: 50000,
            updates: 100,
        }
    }
}

impl Schedule {
    pub fn with_t_max(mut self, t: f64) -> Self {
        self.t_max = t;
        self
    }

    pub fn with_t_min(mut self, t: f64) -> Self {
        self.t_min = t;
        self
    }

    pub fn with_steps(mut self, n: usize) -> Self {
        self.steps = n;
        self
    }

    pub fn with_updates(mut self, n: usize) -> Self {
        self.updates = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.t_min.is_nan() || self.t_min <= 0.0 {
            return Err(AnnealError::NonPositiveMinTemperature(self.t_min));
        }
        if self.t_max.is_nan() || self.t_max <= 0.0 {
            return Err(AnnealError::NonPositiveMaxTemperature(self.t_max));
        }
        Ok(())
    }

    /// Precomputes the exponential cooling curve for this schedule.
    pub fn cooling(&self) -> Result<Cooling> {
        self.validate()?;
        Ok(Cooling {
            t_max: self.t_max,
            factor: (self.t_min / self.t_max).ln(),
            steps: self.steps,
        })
    }
}

/// Exponential cooling from `t_max` down to `t_min`.
///
/// `T(s) = t_max * exp(s / steps * ln(t_min / t_max))`
#[derive(Debug, Clone, Copy)]
pub struct Cooling {
    t_max: f64,
    factor: f64,
    steps: usize,
}

impl Cooling {
    /// Temperature at `step`, where `0 <= step <= steps`.
    pub fn temperature(&self, step: usize) -> f64 {
        if self.steps == 0 {
            return self.t_max;
        }
        self.t_max * (self.factor * step as f64 / self.steps as f64).exp()
    }
}

/// Targets and step factors used by the auto-tuner.
///
/// The defaults search for a starting temperature with 98% acceptance and
/// an ending temperature with at most 0.02% improving moves, scaling the
/// temperature by 1.5 per trial and rounding it to 2 significant figures.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AutoConfig {
    /// Acceptance rate that defines `t_max`.
    pub target_acceptance: f64,

    /// Improvement rate at or below which the `t_min` search stops.
    pub target_improvement: f64,

    /// Multiplier applied to the temperature between trials. Must be > 1.
    pub factor: f64,

    /// Significant figures kept on temperatures and the step estimate.
    pub figures: i32,
}

impl Default for AutoConfig {
    fn default() -> Self {
        Self {
            target_acceptance: 0.98,
            target_improvement: 0.0002,
            factor: 1.5,
            figures: 2,
        }
    }
}

impl AutoConfig {
    pub fn with_target_acceptance(mut self, rate: f64) -> Self {
        self.target_acceptance = rate;
        self
    }

    pub fn with_target_improvement(mut self, rate: f64) -> Self {
        self.target_improvement = rate;
        self
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_figures(mut self, figures: i32) -> Self {
        self.figures = figures;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_schedule() {
        let schedule = Schedule::default();
        assert!((schedule.t_max - 25000.0).abs() < 1e-10);
        assert!((schedule.t_min - 2.5).abs() < 1e-10);
        assert_eq!(schedule.steps, 50000);
        assert_eq!(schedule.updates, 100);
    }

    #[test]
    fn test_validate_ok() {
        assert!(Schedule::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_t_min() {
        let schedule = Schedule::default().with_t_min(0.0);
        assert_eq!(
            schedule.validate(),
            Err(AnnealError::NonPositiveMinTemperature(0.0))
        );
    }

    #[test]
    fn test_validate_negative_t_max() {
        let schedule = Schedule::default().with_t_max(-3.0);
        assert_eq!(
            schedule.validate(),
            Err(AnnealError::NonPositiveMaxTemperature(-3.0))
        );
    }

    #[test]
    fn test_cooling_endpoints() {
        let cooling = Schedule::default().cooling().unwrap();
        assert_eq!(cooling.temperature(0), 25000.0);
        assert!((cooling.temperature(50000) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_cooling_zero_steps() {
        let cooling = Schedule::default().with_steps(0).cooling().unwrap();
        assert_eq!(cooling.temperature(0), 25000.0);
    }

    #[test]
    fn test_default_auto_config() {
        let config = AutoConfig::default();
        assert!((config.target_acceptance - 0.98).abs() < 1e-12);
        assert!((config.target_improvement - 0.0002).abs() < 1e-12);
        assert!((config.factor - 1.5).abs() < 1e-12);
        assert_eq!(config.figures, 2);
    }

    proptest! {
        #[test]
        fn cooling_is_monotone_between_bounds(
            t_min in 1e-3f64..100.0,
            ratio in 1.0f64..1e4,
            steps in 1usize..5000,
        ) {
            let t_max = t_min * ratio;
            let cooling = Schedule::default()
                .with_t_max(t_max)
                .with_t_min(t_min)
                .with_steps(steps)
                .cooling()
                .unwrap();

            prop_assert!((cooling.temperature(0) - t_max).abs() <= t_max * 1e-12);
            prop_assert!((cooling.temperature(steps) - t_min).abs() <= t_min * 1e-9);

            let mut last = cooling.temperature(0);
            for step in 1..=steps {
                let t = cooling.temperature(step);
                prop_assert!(t <= last * (1.0 + 1e-12));
                last = t;
            }
        }
    }
}
