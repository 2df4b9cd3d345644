//! Metropolis acceptance and rollback.

use super::types::AnnealState;
use rand::Rng;

/// Metropolis criterion.
///
/// Non-increasing moves (`delta <= 0`) are always accepted. Worsening
/// moves are accepted iff `exp(-delta / temperature) >= u`, where `u` is a
/// uniform draw from `[0, 1)`.
pub fn accepts(delta: f64, temperature: f64, u: f64) -> bool {
    delta <= 0.0 || (-delta / temperature).exp() >= u
}

/// What happened to a single attempted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Accepted and strictly lowered the energy.
    Improved,
    /// Accepted without lowering the energy.
    Accepted,
    /// Rejected; the state was rolled back.
    Rejected,
}

impl Outcome {
    pub fn is_accepted(self) -> bool {
        !matches!(self, Outcome::Rejected)
    }
}

/// Owned snapshots of the last accepted and the best configuration.
///
/// Both are independent clones of the working state, so an in-place
/// `make_move` on the working state never leaks into either of them.
#[derive(Debug, Clone)]
pub(crate) struct Walker<S> {
    previous: S,
    previous_energy: f64,
    best: S,
    best_energy: f64,
}

impl<S: AnnealState> Walker<S> {
    /// Seeds both snapshots from `state`.
    pub(crate) fn new(state: &S) -> Self {
        let energy = state.energy();
        Self {
            previous: state.clone(),
            previous_energy: energy,
            best: state.clone(),
            best_energy: energy,
        }
    }

    /// Energy of the last accepted configuration.
    pub(crate) fn energy(&self) -> f64 {
        self.previous_energy
    }

    #[cfg(test)]
    pub(crate) fn best(&self) -> (&S, f64) {
        (&self.best, self.best_energy)
    }

    pub(crate) fn into_best(self) -> (S, f64) {
        (self.best, self.best_energy)
    }

    /// Judges the move just applied to `current` at `temperature`.
    ///
    /// On acceptance `current` becomes the new baseline (and the new best
    /// if it beats it). On rejection `current` is replaced by a clone of
    /// the previous baseline.
    pub(crate) fn step<R: Rng>(
        &mut self,
        current: &mut S,
        temperature: f64,
        rng: &mut R,
    ) -> Outcome {
        let energy = current.energy();
        let delta = energy - self.previous_energy;

        // Only draw when it matters, so downhill moves cost no randomness.
        if delta > 0.0 && !accepts(delta, temperature, rng.random::<f64>()) {
            *current = self.previous.clone();
            return Outcome::Rejected;
        }

        self.previous = current.clone();
        self.previous_energy = energy;
        if energy < self.best_energy {
            self.best = current.clone();
            self.best_energy = energy;
        }

        if delta < 0.0 {
            Outcome::Improved
        } else {
            Outcome::Accepted
        }
    }
}

/// Move counters for one reporting window.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Window {
    trials: usize,
    accepts: usize,
    improves: usize,
}

impl Window {
    pub(crate) fn record(&mut self, outcome: Outcome) {
        self.trials += 1;
        match outcome {
            Outcome::Improved => {
                self.accepts += 1;
                self.improves += 1;
            }
            Outcome::Accepted => self.accepts += 1,
            Outcome::Rejected => {}
        }
    }

    #[cfg(test)]
    pub(crate) fn trials(&self) -> usize {
        self.trials
    }

    pub(crate) fn acceptance(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.accepts as f64 / self.trials as f64
        }
    }

    pub(crate) fn improvement(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.improves as f64 / self.trials as f64
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Generator that always yields the same word, for pinning Metropolis draws.
#[cfg(test)]
pub(crate) struct FixedRng(pub u64);

#[cfg(test)]
impl rand::RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for (i, byte) in dst.iter_mut().enumerate() {
            *byte = self.0.to_le_bytes()[i % 8];
        }
    }
}
