use crate::common::{defs::*, utils::linspace};
use crate::error::{McError, Result};

/// Equal-width bins partitioning `[lo, hi)` of one state variable.
#[derive(Clone, Debug)]
pub struct Bins {
    pub edges: Vec<Continous>,
    pub values: Vec<Continous>,
    pub width: Continous,
}

impl Bins {
    /// `n + 1` edges and the `n` bin midpoints.
    pub fn new(lo: Continous, hi: Continous, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(McError::InvalidConfig(
                "number of bins must be positive".to_string(),
            ));
        }
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(McError::InvalidConfig(format!(
                "state limits [{lo}, {hi}] do not form a finite interval"
            )));
        }

        let edges = linspace(lo, hi, n + 1);
        let values = edges.windows(2).map(|w| (w[0] + w[1]) / 2.).collect();
        let width = edges[1] - edges[0];

        Ok(Self {
            edges,
            values,
            width,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bin holding `x`, or `None` when `x` lies outside `[lo, hi)`.
    pub fn locate(&self, x: Continous) -> Option<Discrete> {
        self.edges
            .windows(2)
            .position(|w| w[0] <= x && x < w[1])
    }
}

/// Bins for every state variable.
pub fn make_bins(limits: &[(Continous, Continous)], n_bins: &[usize]) -> Result<Vec<Bins>> {
    if limits.len() != n_bins.len() {
        return Err(McError::InvalidConfig(format!(
            "{} state variables but {} bin counts",
            limits.len(),
            n_bins.len()
        )));
    }

    limits
        .iter()
        .zip(n_bins)
        .map(|(&(lo, hi), &n)| Bins::new(lo, hi, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;

    #[test]
    fn bins_partition_limits() {
        let bins = Bins::new(0., 8., 5).unwrap();

        assert_float_eq!(
            bins.edges,
            vec![0., 1.6, 3.2, 4.8, 6.4, 8.],
            abs_all <= 1e-12
        );
        assert_float_eq!(
            bins.values,
            vec![0.8, 2.4, 4.0, 5.6, 7.2],
            abs_all <= 1e-12
        );
        assert_float_eq!(bins.width, 1.6, abs <= 1e-12);
    }

    #[test]
    fn locate_is_half_open() {
        let bins = Bins::new(0., 4., 4).unwrap();

        assert_eq!(bins.locate(0.), Some(0));
        assert_eq!(bins.locate(0.999), Some(0));
        assert_eq!(bins.locate(1.), Some(1));
        assert_eq!(bins.locate(3.5), Some(3));
        assert_eq!(bins.locate(4.), None);
        assert_eq!(bins.locate(-0.1), None);
    }

    #[test]
    fn invalid_bins_are_rejected() {
        assert!(matches!(
            Bins::new(0., 1., 0),
            Err(McError::InvalidConfig(_))
        ));
        assert!(matches!(
            Bins::new(1., 1., 3),
            Err(McError::InvalidConfig(_))
        ));
        assert!(matches!(
            make_bins(&[(0., 1.)], &[2, 3]),
            Err(McError::InvalidConfig(_))
        ));
    }
}
