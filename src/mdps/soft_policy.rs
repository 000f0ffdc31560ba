use crate::common::{defs::*, utils::sample_discrete};
use crate::error::{McError, Result};
use rand::rngs::StdRng;

/// Stochastic policy over the feasible actions of every state.
#[derive(Clone, Debug)]
pub struct SoftPolicy {
    actions: Vec<Vec<Discrete>>,
    densities: Vec<Vec<Continous>>,
}

impl SoftPolicy {
    /// Uniform over the feasible actions of each state.
    pub fn uniform(feasible: &[Vec<Discrete>]) -> Result<Self> {
        let densities = feasible
            .iter()
            .enumerate()
            .map(|(s, actions)| {
                if actions.is_empty() {
                    Err(McError::EmptyFeasibleSet { state: s })
                } else {
                    Ok(vec![1. / actions.len() as Continous; actions.len()])
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            actions: feasible.to_vec(),
            densities,
        })
    }

    pub fn actions(&self, s: Discrete) -> &[Discrete] {
        &self.actions[s]
    }

    /// Probabilities aligned with [`SoftPolicy::actions`].
    pub fn density(&self, s: Discrete) -> &[Continous] {
        &self.densities[s]
    }

    /// Probability of taking action `a` in `s`, zero when `a` is infeasible.
    pub fn probability(&self, s: Discrete, a: Discrete) -> Continous {
        self.actions[s]
            .iter()
            .position(|&x| x == a)
            .map_or(0., |i| self.densities[s][i])
    }

    /// Epsilon-greedy update: `greedy` gets `1 - epsilon + epsilon / n`, every
    /// other feasible action `epsilon / n`.
    pub fn make_greedy(&mut self, s: Discrete, greedy: Discrete, epsilon: Continous) {
        let n = self.actions[s].len() as Continous;
        for (a, p) in self.actions[s].iter().zip(self.densities[s].iter_mut()) {
            *p = if *a == greedy {
                1. - epsilon + epsilon / n
            } else {
                epsilon / n
            };
        }
    }

    pub fn sample(&self, s: Discrete, rng: &mut StdRng) -> Result<Discrete> {
        let i = sample_discrete(&self.densities[s], rng)?;
        Ok(self.actions[s][i])
    }
}

impl Policy for SoftPolicy {
    fn action(&self, s: Discrete, rng: &mut StdRng) -> Result<Discrete> {
        self.sample(s, rng)
    }
}
