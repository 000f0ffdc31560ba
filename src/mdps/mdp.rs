use crate::common::defs::*;
use crate::error::Result;
use rand::rngs::StdRng;

/// Markov Decision Process - Sutton & Barto 2018.
///
/// Finite, simulated view of a decision problem: transitions are sampled,
/// never enumerated.
pub trait DiscreteMdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    /// Never empty for a well formed MDP.
    fn feasible_actions(&self, s: Discrete) -> &[Discrete];

    fn sample_next_state(&self, a: Discrete, rng: &mut StdRng) -> Result<Discrete>;

    fn reward(&self, s: Discrete, a: Discrete, next: Discrete) -> Continous;

    fn episode_length(&self) -> usize;
}
