pub mod discretized_mdp;
pub mod discretizer;
pub mod distribution;
pub mod episode;
pub mod mdp;
pub mod model;
pub mod soft_policy;
pub mod solvers;
pub mod state_space;
