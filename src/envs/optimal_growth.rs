use crate::common::defs::*;
use crate::error::{McError, Result};
use crate::mdps::model::SampledModel;
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;
use rand_distr::LogNormal;

/// Stochastic optimal growth (consumption/savings).
///
/// In state `x` the agent saves `k` with `lo <= k <= x` and consumes `x - k`.
/// Next period's income is `y = k^alpha * z` with `z ~ LogNormal(0, 1)`, which
/// does not depend on `x`. Utility is `U(c) = 1 - exp(-theta * c)` and the
/// reward carries the discounted utility of next period's income.
/// Ref: https://julia.quantecon.org/dynamic_programming/optgrowth.html
#[derive(Clone, Debug)]
pub struct OptimalGrowthModel {
    theta: Continous,
    alpha: Continous,
    df: Continous,
    limits: Vec<(Continous, Continous)>,
    shock: LogNormal<Continous>,
}

impl OptimalGrowthModel {
    pub fn new(
        theta: Continous,
        alpha: Continous,
        df: Continous,
        state_lim: (Continous, Continous),
    ) -> Result<Self> {
        let shock = LogNormal::new(0., 1.).map_err(|e| McError::Distribution(e.to_string()))?;

        Ok(Self {
            theta,
            alpha,
            df,
            limits: vec![state_lim],
            shock,
        })
    }

    pub fn utility(&self, c: Continous) -> Continous {
        1. - (-self.theta * c).exp()
    }
}

impl SampledModel for OptimalGrowthModel {
    fn state_limits(&self) -> &[(Continous, Continous)] {
        &self.limits
    }

    fn sample_transitions(
        &self,
        action: Continous,
        n: usize,
        rng: &mut StdRng,
    ) -> Array2<Continous> {
        let k = action.powf(self.alpha);
        Array2::from_shape_fn((n, 1), |_| k * self.shock.sample(rng))
    }

    fn constraint(&self, action: Continous, state: ArrayView1<Continous>) -> bool {
        self.limits[0].0 <= action && action <= state[0]
    }

    fn reward(
        &self,
        state: ArrayView1<Continous>,
        action: Continous,
        next_state: ArrayView1<Continous>,
    ) -> Continous {
        self.utility(state[0] - action) + self.df * self.utility(next_state[0])
    }
}
