use super::{
    discretizer::make_bins,
    distribution::EmpiricalDistribution,
    mdp::DiscreteMdp,
    model::SampledModel,
    state_space::StateSpaceIndex,
};
use crate::common::defs::*;
use crate::error::{McError, Result};
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

/// Finite approximation of a [`SampledModel`]: states are bins of the
/// model's state limits and every action carries an empirical next-state
/// distribution estimated from `n_samples` simulated transitions.
pub struct DiscretizedMdp<M> {
    model: M,
    actions: Vec<Continous>,
    distributions: Vec<EmpiricalDistribution>,
    index: StateSpaceIndex,
    state_values: Array2<Continous>,
    feasible: Vec<Vec<Discrete>>,
}

impl<M: SampledModel> DiscretizedMdp<M> {
    pub fn new(
        model: M,
        actions: &[Continous],
        n_bins: &[usize],
        n_samples: usize,
        rng: &mut StdRng,
    ) -> Result<Self> {
        if actions.is_empty() {
            return Err(McError::InvalidConfig("action set is empty".to_string()));
        }
        if n_samples == 0 {
            return Err(McError::InvalidConfig(
                "need at least one sample per action".to_string(),
            ));
        }

        let bins = make_bins(model.state_limits(), n_bins)?;
        let n_variables = model.n_variables();

        let mut distributions = Vec::with_capacity(actions.len());
        for (a, &action) in actions.iter().enumerate() {
            info!(action = a, value = action, "Discretizing action");
            let samples = model.sample_transitions(action, n_samples, rng);
            if samples.dim() != (n_samples, n_variables) {
                return Err(McError::InvalidConfig(format!(
                    "model returned {:?} samples, expected ({n_samples}, {n_variables})",
                    samples.dim()
                )));
            }

            let distr = EmpiricalDistribution::new(samples.view(), &bins).map_err(|e| {
                error!(action = a, "{e}");
                McError::Discretization {
                    action: a,
                    source: Box::new(e),
                }
            })?;
            if distr.dropped() > 0 {
                warn!(
                    action = a,
                    dropped = distr.dropped(),
                    "Sample values outside the state limits"
                );
            }
            for v in 0..distr.n_variables() {
                debug!(action = a, variable = v, hist = ?distr.hist(v), "Histogram");
            }
            distributions.push(distr);
        }

        let index = StateSpaceIndex::new(n_bins)?;
        let states = index.enumerate();
        let state_values = Array2::from_shape_fn((index.len(), n_variables), |(s, v)| {
            bins[v].values[states[s][v]]
        });
        info!(
            n_s = index.len(),
            n_a = actions.len(),
            "Indexed the discrete state space"
        );

        let feasible = (0..index.len())
            .map(|s| {
                let value = state_values.row(s);
                let feasible = (0..actions.len())
                    .filter(|&a| model.constraint(actions[a], value))
                    .collect::<Vec<_>>();
                if feasible.is_empty() {
                    error!(state = s, value = ?value.to_vec(), "No feasible action");
                    Err(McError::EmptyFeasibleSet { state: s })
                } else {
                    Ok(feasible)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            model,
            actions: actions.to_vec(),
            distributions,
            index,
            state_values,
            feasible,
        })
    }

    pub fn actions(&self) -> &[Continous] {
        &self.actions
    }

    pub fn index(&self) -> &StateSpaceIndex {
        &self.index
    }

    /// Bin midpoints of each state, one row per linear state index.
    pub fn state_values(&self) -> &Array2<Continous> {
        &self.state_values
    }

    pub fn state_value(&self, s: Discrete) -> ArrayView1<Continous> {
        self.state_values.row(s)
    }
}

impl<M: SampledModel> DiscreteMdp for DiscretizedMdp<M> {
    fn n_s(&self) -> usize {
        self.index.len()
    }

    fn n_a(&self) -> usize {
        self.actions.len()
    }

    fn feasible_actions(&self, s: Discrete) -> &[Discrete] {
        &self.feasible[s]
    }

    fn sample_next_state(&self, a: Discrete, rng: &mut StdRng) -> Result<Discrete> {
        let bins = self.distributions[a].sample(rng)?;
        Ok(self.index.encode(&bins))
    }

    fn reward(&self, s: Discrete, a: Discrete, next: Discrete) -> Continous {
        self.model.reward(
            self.state_values.row(s),
            self.actions[a],
            self.state_values.row(next),
        )
    }

    fn episode_length(&self) -> usize {
        self.model.episode_length()
    }
}
