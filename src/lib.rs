//! Monte Carlo control on a discretized continuous-state MDP.
//!
//! A [`SampledModel`] is simulated once per action to build empirical
//! next-state distributions over a grid of bins ([`DiscretizedMdp`]); the
//! resulting finite MDP is then solved with first-visit Monte Carlo control,
//! either with exploring starts ([`run_mces`]) or with an epsilon-soft
//! policy ([`run_epsilon_soft`]).

pub mod common;
pub mod config;
pub mod envs;
pub mod error;
pub mod mdps;

pub use common::defs::*;
pub use error::{McError, Result};
pub use mdps::{
    discretized_mdp::DiscretizedMdp,
    mdp::DiscreteMdp,
    model::SampledModel,
    soft_policy::SoftPolicy,
    state_space::StateSpaceIndex,
    solvers::mc_control::{run_epsilon_soft, run_mces, Solution, SoftSolution},
};
