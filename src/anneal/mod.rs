//! Simulated annealing with exponential cooling.
//!
//! The caller supplies an [`AnnealState`]; the [`Annealer`] supplies the
//! cooling schedule, the Metropolis acceptance test, rollback of rejected
//! moves, progress reporting, and an automatic schedule estimate when
//! good temperatures are not known up front.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod auto;
mod config;
pub mod metropolis;
pub mod report;
mod runner;
mod types;

pub use config::{AutoConfig, Cooling, Schedule};
pub use metropolis::Outcome;
pub use report::{LineReporter, Progress, Reporter, SilentReporter, TracingReporter};
pub use runner::Annealer;
pub use types::AnnealState;
