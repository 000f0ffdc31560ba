//! Run configuration for the optimal growth solver.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::common::{defs::*, utils::linspace};
use crate::envs::optimal_growth::OptimalGrowthModel;
use crate::error::{McError, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    #[default]
    ExploringStarts,
    EpsilonSoft,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Fixed seed for a reproducible run, entropy otherwise.
    pub seed: Option<u64>,
    pub method: Method,
    pub n_iterations: usize,
    /// Only used by [`Method::EpsilonSoft`].
    pub epsilon: Continous,
    pub n_samples_per_action: usize,
    /// Bins per state variable.
    pub n_bins: Vec<usize>,
    /// Actions are spread evenly over the state limits.
    pub n_actions: usize,
    pub model: GrowthConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            method: Method::default(),
            n_iterations: 100000,
            epsilon: 0.1,
            n_samples_per_action: 10000,
            n_bins: vec![50],
            n_actions: 50,
            model: GrowthConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub theta: Continous,
    pub alpha: Continous,
    pub df: Continous,
    pub state_lim: Vec<(Continous, Continous)>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            theta: 0.5,
            alpha: 0.8,
            df: 0.9,
            state_lim: vec![(0., 8.)],
        }
    }
}

impl RunConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config = serde_json::from_str::<Self>(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(McError::InvalidConfig(msg));

        if !(0. ..=1.).contains(&self.epsilon) {
            return invalid(format!("epsilon {} is not in [0, 1]", self.epsilon));
        }
        if self.n_iterations == 0 {
            return invalid("n_iterations must be positive".to_string());
        }
        if self.n_samples_per_action == 0 {
            return invalid("n_samples_per_action must be positive".to_string());
        }
        if self.n_actions == 0 {
            return invalid("n_actions must be positive".to_string());
        }
        if self.n_bins.len() != self.model.state_lim.len() {
            return invalid(format!(
                "{} bin counts for {} state variables",
                self.n_bins.len(),
                self.model.state_lim.len()
            ));
        }
        if self.n_bins.contains(&0) {
            return invalid("every state variable needs at least one bin".to_string());
        }
        if let Some((lo, hi)) = self
            .model
            .state_lim
            .iter()
            .find(|(lo, hi)| !lo.is_finite() || !hi.is_finite() || lo >= hi)
        {
            return invalid(format!("state limits [{lo}, {hi}] are empty"));
        }

        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Saving levels spread evenly over the first state variable's limits.
    pub fn actions(&self) -> Vec<Continous> {
        let (lo, hi) = self.model.state_lim[0];
        linspace(lo, hi, self.n_actions)
    }

    pub fn growth_model(&self) -> Result<OptimalGrowthModel> {
        let m = &self.model;
        if m.state_lim.len() != 1 {
            return Err(McError::InvalidConfig(format!(
                "optimal growth has one state variable, got {}",
                m.state_lim.len()
            )));
        }

        OptimalGrowthModel::new(m.theta, m.alpha, m.df, m.state_lim[0])
    }
}
