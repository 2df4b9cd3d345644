//! Core trait for annealed states.

/// A candidate solution that the annealer can copy, perturb, and score.
///
/// The engine owns the state and keeps independent snapshots of it
/// (the last accepted configuration and the best one seen), so `Clone`
/// must produce a deep copy: mutating a clone must never affect the
/// original.
///
/// # Minimization
///
/// The annealer minimizes [`energy`](AnnealState::energy). For
/// maximization, negate the score.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_anneal::anneal::AnnealState;
///
/// #[derive(Clone)]
/// struct Tour {
///     order: Vec<usize>,
///     distances: std::sync::Arc<Vec<Vec<f64>>>,
/// }
///
/// impl AnnealState for Tour {
///     fn make_move(&mut self) {
///         let mut rng = rand::rng();
///         let a = rng.random_range(0..self.order.len());
///         let b = rng.random_range(0..self.order.len());
///         self.order.swap(a, b);
///     }
///
///     fn energy(&self) -> f64 {
///         let n = self.order.len();
///         (0..n)
///             .map(|i| self.distances[self.order[(i + n - 1) % n]][self.order[i]])
///             .sum()
///     }
/// }
/// ```
pub trait AnnealState: Clone {
    /// Mutates the state in place into a neighbouring candidate.
    ///
    /// The neighbourhood should be connected and must eventually change
    /// the energy; a state whose moves never change the energy makes the
    /// auto-tuner's temperature bootstrap spin forever.
    fn make_move(&mut self);

    /// Scalar cost of the current configuration. Lower is better.
    ///
    /// Must be deterministic and finite. Negative values are fine.
    fn energy(&self) -> f64;
}
