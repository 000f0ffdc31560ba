use crate::common::defs::*;
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;

/// A continuous-state decision problem that can only be simulated.
///
/// The transition is assumed to depend on the action alone. Models whose
/// dynamics also depend on the current state are still accepted, but the
/// discretization built from them is then an approximation.
pub trait SampledModel {
    /// `(lo, hi)` for each state variable. The number of entries is the
    /// dimension of the state.
    fn state_limits(&self) -> &[(Continous, Continous)];

    /// Draws `n` next states for `action`, one row per sample.
    fn sample_transitions(
        &self,
        action: Continous,
        n: usize,
        rng: &mut StdRng,
    ) -> Array2<Continous>;

    fn constraint(&self, _action: Continous, _state: ArrayView1<Continous>) -> bool {
        true
    }

    /// Any discounting of the continuation is folded in here.
    fn reward(
        &self,
        state: ArrayView1<Continous>,
        action: Continous,
        next_state: ArrayView1<Continous>,
    ) -> Continous;

    /// Number of steps in one episode. Single step for infinite-horizon
    /// problems whose reward already carries the continuation value.
    fn episode_length(&self) -> usize {
        1
    }

    fn n_variables(&self) -> usize {
        self.state_limits().len()
    }
}
