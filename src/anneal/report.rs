//! Progress reporting.
//!
//! The acceptance rate is the fraction of moves since the last report
//! that the Metropolis criterion accepted: improving moves, flat moves,
//! and worsening moves reached by thermal excitation.
//!
//! The improvement rate is the fraction of moves since the last report
//! that strictly lowered the energy. At high temperature it also counts
//! moves that merely undo earlier thermal excursions; at low temperature
//! it tends toward zero as downhill moves run out.

use std::io::{self, Write};
use std::time::Duration;

use crate::format::time_string;

/// A snapshot handed to a [`Reporter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Moves attempted so far in the run (or tuning session).
    pub step: usize,
    /// Temperature at `step`.
    pub temperature: f64,
    /// Energy of the working state after `step`.
    pub energy: f64,
    /// Accepted / attempted since the previous report.
    pub acceptance: f64,
    /// Improving / attempted since the previous report.
    pub improvement: f64,
    /// Wall-clock time since the run started.
    pub elapsed: Duration,
    /// Extrapolated time to finish; unknown at step 0 and while tuning.
    pub remaining: Option<Duration>,
}

/// Extrapolates `(steps - step) * elapsed / step`.
pub fn remaining(steps: usize, step: usize, elapsed: Duration) -> Option<Duration> {
    if step == 0 {
        return None;
    }
    let left = steps.saturating_sub(step) as f64;
    Some(elapsed.mul_f64(left / step as f64))
}

/// Observer invoked by the annealer while it runs.
pub trait Reporter {
    /// Called at step 0 and then once per reporting window.
    fn report(&mut self, progress: &Progress);

    /// Called once when the loop ends.
    fn finish(&mut self) {}
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&mut self, _progress: &Progress) {}
}

/// Emits every report as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, p: &Progress) {
        tracing::info!(
            step = p.step,
            temperature = p.temperature,
            energy = p.energy,
            acceptance = p.acceptance,
            improvement = p.improvement,
            elapsed_secs = p.elapsed.as_secs_f64(),
            remaining_secs = p.remaining.map(|d| d.as_secs_f64()),
            "anneal progress"
        );
    }
}

/// Human-readable status line, rewritten in place with `\r`.
///
/// ```text
///  Temperature        Energy    Accept   Improve     Elapsed   Remaining
///  12345.67890      98765.43    97.50%    45.25%     0:00:01     0:01:39
/// ```
#[derive(Debug)]
pub struct LineReporter<W: Write> {
    out: W,
}

impl LineReporter<io::Stderr> {
    /// Reports to standard error. This is the annealer's default.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> LineReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_progress(&mut self, p: &Progress) -> io::Result<()> {
        let elapsed = time_string(p.elapsed.as_secs_f64());
        if p.step == 0 {
            writeln!(
                self.out,
                " Temperature        Energy    Accept   Improve     Elapsed   Remaining"
            )?;
            write!(
                self.out,
                "\r{:12.5}  {:12.2}                      {}            ",
                p.temperature, p.energy, elapsed
            )?;
        } else {
            let remaining = match p.remaining {
                Some(d) => time_string(d.as_secs_f64()),
                None => " ".repeat(10),
            };
            write!(
                self.out,
                "\r{:12.5}  {:12.2}  {:7.2}%  {:7.2}%  {}  {}",
                p.temperature,
                p.energy,
                100.0 * p.acceptance,
                100.0 * p.improvement,
                elapsed,
                remaining
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> Reporter for LineReporter<W> {
    fn report(&mut self, progress: &Progress) {
        // A closed stream must not stop the run.
        if let Err(e) = self.write_progress(progress) {
            tracing::debug!("progress report dropped: {e}");
        }
    }

    fn finish(&mut self) {
        if let Err(e) = writeln!(self.out).and_then(|()| self.out.flush()) {
            tracing::debug!("progress report dropped: {e}");
        }
    }
}
