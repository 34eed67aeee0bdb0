//! Walker/Vose alias tables for O(1) categorical sampling.
//!
//! Construction is O(n) in the number of outcomes; each draw costs one
//! uniform integer plus one biased coin flip.
//!
//! References:
//! - Walker (1974): An efficient method for generating discrete random
//!   variables with general distributions.
//! - Vose (1991): A linear algorithm for generating random numbers with a
//!   given distribution.

use rand::Rng;

use crate::error::{Error, Result};

/// An immutable alias table over a fixed outcome set `0..n`.
#[derive(Debug, Clone)]
pub struct AliasTable {
    /// Split probability per slot.
    probability: Vec<f64>,
    /// Fallback outcome per slot.
    alias: Vec<u32>,
}

impl AliasTable {
    /// Build a table from non-negative weights. The weights need not be
    /// normalized; they are divided by their sum. A zero-sum (or empty)
    /// vector fails with [`Error::DegenerateDistribution`].
    pub fn new(weights: &[f64]) -> Result<Self> {
        let n = weights.len();
        let sum: f64 = weights.iter().sum();
        if n == 0 || !(sum > 0.0) {
            return Err(Error::DegenerateDistribution(n));
        }

        let mut probability = vec![0.0f64; n];
        let mut alias = vec![0u32; n];

        let mut smaller: Vec<usize> = Vec::with_capacity(n);
        let mut larger: Vec<usize> = Vec::with_capacity(n);

        for i in 0..n {
            probability[i] = (n as f64) * weights[i] / sum;
            if probability[i] < 1.0 {
                smaller.push(i);
            } else {
                larger.push(i);
            }
        }

        while let (Some(small), Some(large)) = (smaller.pop(), larger.pop()) {
            alias[small] = large as u32;
            probability[large] += probability[small] - 1.0;
            if probability[large] < 1.0 {
                smaller.push(large);
            } else {
                larger.push(large);
            }
        }

        Ok(Self { probability, alias })
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.probability.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probability.is_empty()
    }

    /// Draw an outcome index in `0..len()`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let i = rng.random_range(0..self.probability.len());
        if rng.random::<f64>() < self.probability[i] {
            i
        } else {
            self.alias[i] as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn single_outcome_always_returns_zero() {
        let table = AliasTable::new(&[3.7]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(table.sample(&mut rng), 0);
        }
    }

    #[test]
    fn zero_sum_is_degenerate() {
        assert!(matches!(
            AliasTable::new(&[0.0, 0.0]),
            Err(Error::DegenerateDistribution(2))
        ));
        assert!(matches!(
            AliasTable::new(&[]),
            Err(Error::DegenerateDistribution(0))
        ));
    }

    #[test]
    fn draw_distribution_smoke() {
        // Deterministic chi-squared smoke test: catches egregious alias bugs
        // without being overly sensitive.
        //
        // Unnormalized weights [1, 2, 7] => probabilities [0.1, 0.2, 0.7].
        let table = AliasTable::new(&[1.0, 2.0, 7.0]).unwrap();

        let trials = 20_000usize;
        let mut counts = [0usize; 3];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..trials {
            counts[table.sample(&mut rng)] += 1;
        }

        let expected = [
            trials as f64 * 0.1,
            trials as f64 * 0.2,
            trials as f64 * 0.7,
        ];
        let chi2: f64 = counts
            .iter()
            .zip(expected.iter())
            .map(|(&c, &e)| {
                let diff = c as f64 - e;
                (diff * diff) / e
            })
            .sum();

        // df = 2; E[chi2] ~ 2, Var ~ 4. Very conservative cutoff.
        assert!(
            chi2 < 50.0,
            "chi2 too large (chi2={chi2:.2}). counts={counts:?} expected={expected:?}"
        );
    }

    #[test]
    fn uniform_weights_fill_every_slot() {
        let table = AliasTable::new(&[2.0, 2.0, 2.0, 2.0]).unwrap();
        assert_eq!(table.len(), 4);
        for &p in &table.probability {
            assert!((p - 1.0).abs() < 1e-9);
        }
    }
}
