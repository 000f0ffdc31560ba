use crate::common::defs::*;
use crate::error::{McError, Result};
use itertools::Itertools;
use ndarray::Array1;
use rand::prelude::*;

/// `n` equally spaced points over `[lo, hi]`, both ends included.
pub fn linspace(lo: Continous, hi: Continous, n: usize) -> Vec<Continous> {
    Array1::linspace(lo, hi, n).to_vec()
}

/// All combinations of per-variable indices `0..dims[i]`, last variable
/// varying fastest. Yields `dims.iter().product()` rows.
pub fn combinations(dims: &[usize]) -> Vec<Vec<Discrete>> {
    dims.iter().map(|&n| 0..n).multi_cartesian_product().collect()
}

/// Cumulative distribution of a discrete density over bins of equal `width`.
/// The result has one more entry than `density` and starts at 0.
pub fn cumulative(density: &[Continous], width: Continous) -> Vec<Continous> {
    let mut cdf = Vec::with_capacity(density.len() + 1);
    cdf.push(0.);
    for (k, d) in density.iter().enumerate() {
        cdf.push(cdf[k] + d * width);
    }

    cdf
}

/// Finds the bin `k` with `cdf[k] <= u < cdf[k + 1]`.
///
/// A draw at or past the last cumulative value (only possible when rounding
/// leaves `cdf[last]` a hair below 1) is clamped to the last bin that carries
/// mass. Returns `None` only when no bin carries any mass.
pub fn invert_cdf(cdf: &[Continous], u: Continous) -> Option<Discrete> {
    let n = cdf.len().checked_sub(1)?;
    (0..n)
        .find(|&k| u < cdf[k + 1])
        .or_else(|| (0..n).rev().find(|&k| cdf[k + 1] > cdf[k]))
}

/// Inverse transform sampling from probabilities that sum to one.
/// Ref: https://en.wikipedia.org/wiki/Inverse_transform_sampling
pub fn sample_discrete(densities: &[Continous], rng: &mut StdRng) -> Result<Discrete> {
    let cdf = cumulative(densities, 1.);
    let u = rng.gen::<Continous>();
    invert_cdf(&cdf, u).ok_or(McError::SamplingExhausted { variable: 0 })
}

/// Uniformly picks one feasible action per state.
pub fn random_policy(feasible: &[Vec<Discrete>], rng: &mut StdRng) -> Result<Vec<Discrete>> {
    feasible
        .iter()
        .enumerate()
        .map(|(s, actions)| {
            actions
                .choose(rng)
                .copied()
                .ok_or(McError::EmptyFeasibleSet { state: s })
        })
        .collect()
}
