use super::discretizer::Bins;
use crate::common::{defs::*, utils::*};
use crate::error::{McError, Result};
use ndarray::ArrayView2;
use rand::prelude::*;

/// Discrete distribution built from a sample of continuous next states.
/// Every state variable gets its own histogram, so correlation between
/// variables in the sample is not retained.
#[derive(Clone, Debug)]
pub struct EmpiricalDistribution {
    hists: Vec<Vec<Continous>>,
    densities: Vec<Vec<Continous>>,
    cdfs: Vec<Vec<Continous>>,
    dropped: usize,
}

impl EmpiricalDistribution {
    /// `samples` holds one row per draw and one column per state variable.
    /// Values outside a variable's `[lo, hi)` are left out of its histogram.
    pub fn new(samples: ArrayView2<Continous>, bins: &[Bins]) -> Result<Self> {
        if samples.ncols() != bins.len() {
            return Err(McError::InvalidConfig(format!(
                "samples have {} columns for {} state variables",
                samples.ncols(),
                bins.len()
            )));
        }

        let mut dropped = 0;
        let mut hists = bins.iter().map(|b| vec![0.; b.len()]).collect::<Vec<_>>();
        for sample in samples.rows() {
            for (v, &x) in sample.iter().enumerate() {
                match bins[v].locate(x) {
                    Some(k) => hists[v][k] += 1.,
                    None => dropped += 1,
                }
            }
        }

        let mut densities = Vec::with_capacity(bins.len());
        let mut cdfs = Vec::with_capacity(bins.len());
        for (variable, (hist, b)) in hists.iter().zip(bins).enumerate() {
            let total = hist.iter().sum::<Continous>();
            if total == 0. {
                return Err(McError::DegenerateHistogram { variable });
            }

            let density = hist
                .iter()
                .map(|h| h / (total * b.width))
                .collect::<Vec<_>>();
            cdfs.push(cumulative(&density, b.width));
            densities.push(density);
        }

        Ok(Self {
            hists,
            densities,
            cdfs,
            dropped,
        })
    }

    /// Draws a bin index for every state variable by inverting its cdf.
    pub fn sample(&self, rng: &mut StdRng) -> Result<Vec<Discrete>> {
        self.cdfs
            .iter()
            .enumerate()
            .map(|(variable, cdf)| {
                let u = rng.gen::<Continous>();
                invert_cdf(cdf, u).ok_or(McError::SamplingExhausted { variable })
            })
            .collect()
    }

    pub fn n_variables(&self) -> usize {
        self.cdfs.len()
    }

    pub fn hist(&self, variable: usize) -> &[Continous] {
        &self.hists[variable]
    }

    pub fn density(&self, variable: usize) -> &[Continous] {
        &self.densities[variable]
    }

    pub fn cdf(&self, variable: usize) -> &[Continous] {
        &self.cdfs[variable]
    }

    /// Sample values that fell outside their variable's limits.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
