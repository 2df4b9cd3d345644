//! Domain-agnostic simulated annealing.
//!
//! A single-solution optimizer: the user implements a state that can be
//! cloned, perturbed in place, and scored; the engine handles the rest.
//!
//! - **Exponential cooling** from `t_max` to `t_min` over a fixed step budget.
//! - **Metropolis acceptance** with rollback to the last accepted state.
//! - **Auto-tuning** of `t_max`, `t_min`, and the step budget from short
//!   constant-temperature trials.
//! - **Pluggable progress reporting** (status line, `tracing` events, or silent).
//! - **Cooperative cancellation** through a shared atomic flag.
//!
//! # Example
//!
//! ```no_run
//! use u_anneal::anneal::{Annealer, AnnealState};
//!
//! #[derive(Clone)]
//! struct Knob(f64);
//!
//! impl AnnealState for Knob {
//!     fn make_move(&mut self) {
//!         self.0 += rand::random::<f64>() - 0.5;
//!     }
//!     fn energy(&self) -> f64 {
//!         (self.0 - 3.0).powi(2)
//!     }
//! }
//!
//! let mut annealer = Annealer::new(Knob(-20.0));
//! let schedule = annealer.auto(0.1, 1000)?;
//! annealer.set_schedule(schedule);
//! let (best, energy) = annealer.anneal()?;
//! println!("x = {:.3}, energy = {energy:.5}", best.0);
//! # Ok::<(), u_anneal::AnnealError>(())
//! ```

pub mod anneal;
pub mod error;
pub mod format;

pub use error::{AnnealError, Result};
