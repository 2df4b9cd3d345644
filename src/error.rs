//! Error types for annealing runs.

/// Result alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, AnnealError>;

/// Errors that abort an annealing run before any move is attempted.
///
/// Cancellation and Metropolis rejections are ordinary control flow and
/// never show up here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnnealError {
    /// Exponential cooling takes `ln(t_min / t_max)`, which needs `t_min > 0`.
    #[error("exponential cooling requires a minimum temperature greater than zero (t_min = {0})")]
    NonPositiveMinTemperature(f64),

    /// The starting temperature must be positive as well.
    #[error("exponential cooling requires a maximum temperature greater than zero (t_max = {0})")]
    NonPositiveMaxTemperature(f64),

    /// Auto-tuning trials need at least one move each.
    #[error("auto-tuning needs a positive number of trial steps")]
    NoTrialSteps,

    /// The auto-tuner scales the temperature by this factor; it must exceed 1.
    #[error("auto-tuning step factor must be greater than one (factor = {0})")]
    InvalidStepFactor(f64),

    /// The auto-tuner could not measure throughput.
    #[error("auto-tuning measured no elapsed time over {moves} trial moves")]
    NoElapsedTime {
        /// Moves performed while tuning.
        moves: usize,
    },
}
