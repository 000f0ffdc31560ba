use crate::common::defs::Discrete;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, McError>;

/// Fatal errors raised while discretizing a model or running a control loop.
/// None of them are retried: they point at a misconfigured model or too few
/// samples per action.
#[derive(Error, Debug)]
pub enum McError {
    #[error("state {state} has no feasible action")]
    EmptyFeasibleSet { state: Discrete },

    #[error("reward {reward} for state {state} and action {action} is not finite")]
    NonFiniteReward {
        state: Discrete,
        action: Discrete,
        reward: f64,
    },

    #[error("histogram for variable {variable} received no samples")]
    DegenerateHistogram { variable: usize },

    #[error("inverse cdf lookup found no bin for variable {variable}")]
    SamplingExhausted { variable: usize },

    #[error("failed to discretize action {action}: {source}")]
    Discretization {
        action: Discrete,
        #[source]
        source: Box<McError>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid distribution parameters: {0}")]
    Distribution(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
