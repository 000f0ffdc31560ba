use crate::common::{defs::*, utils::combinations};
use crate::error::{McError, Result};

/// Bijection between per-variable bin indices and linear state indices.
///
/// For bin counts `(n_0, .., n_{d-1})` the vector `(i_0, .., i_{d-1})` maps to
/// `sum_k i_k * prod_{j>k} n_j`, which is the row order of [`combinations`].
#[derive(Clone, Debug)]
pub struct StateSpaceIndex {
    n_bins: Vec<usize>,
    strides: Vec<usize>,
    len: usize,
}

impl StateSpaceIndex {
    pub fn new(n_bins: &[usize]) -> Result<Self> {
        if n_bins.is_empty() || n_bins.contains(&0) {
            return Err(McError::InvalidConfig(format!(
                "bin counts {n_bins:?} do not describe a state space"
            )));
        }

        let overflow = || {
            McError::InvalidConfig(format!(
                "bin counts {n_bins:?} give more states than fit in usize"
            ))
        };

        let mut strides = vec![1usize; n_bins.len()];
        for k in (0..n_bins.len() - 1).rev() {
            strides[k] = strides[k + 1]
                .checked_mul(n_bins[k + 1])
                .ok_or_else(overflow)?;
        }
        let len = strides[0].checked_mul(n_bins[0]).ok_or_else(overflow)?;

        Ok(Self {
            n_bins: n_bins.to_vec(),
            strides,
            len,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Linear index of a bin-index vector.
    pub fn encode(&self, bins: &[Discrete]) -> Discrete {
        debug_assert_eq!(bins.len(), self.n_bins.len());
        bins.iter().zip(&self.strides).map(|(i, s)| i * s).sum()
    }

    /// Bin-index vector of a linear index.
    pub fn decode(&self, s: Discrete) -> Vec<Discrete> {
        debug_assert!(s < self.len);
        self.strides
            .iter()
            .zip(&self.n_bins)
            .map(|(stride, n)| (s / stride) % n)
            .collect()
    }

    /// Every bin-index vector, in linear index order.
    pub fn enumerate(&self) -> Vec<Vec<Discrete>> {
        combinations(&self.n_bins)
    }
}
