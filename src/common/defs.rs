use crate::error::Result;
use rand::rngs::StdRng;

pub type Discrete = usize;
pub type Continous = f64;

/// Maps a discrete state to an action. Stochastic policies draw from the
/// supplied rng, deterministic ones ignore it.
pub trait Policy {
    fn action(&self, s: Discrete, rng: &mut StdRng) -> Result<Discrete>;
}

/// Deterministic policy, one action per state.
impl Policy for [Discrete] {
    fn action(&self, s: Discrete, _rng: &mut StdRng) -> Result<Discrete> {
        Ok(self[s])
    }
}

/// One step of an episode: state, action taken there and the reward observed.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeEvent {
    pub s: Discrete,
    pub a: Discrete,
    pub r: Continous,
}
