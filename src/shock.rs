//! Shock sampling.
//!
//! A shock is a single random perturbation fed to every response function.
//! Each render cycle draws a fresh, independent sample; nothing is cached
//! between cycles.

use crate::config::{Distribution, SimParams};
use crate::rng::SimRng;

/// An ordered sequence of shock magnitudes for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ShockSample {
    values: Vec<f64>,
}

impl ShockSample {
    /// Draw a fresh sample of `params.shock_count` values.
    #[must_use]
    pub fn draw(params: &SimParams, rng: &mut SimRng) -> Self {
        let n = params.shock_count as usize;
        let sigma = params.volatility;

        let values = match params.distribution {
            Distribution::Normal => (0..n).map(|_| rng.gen_normal(0.0, sigma)).collect(),
            Distribution::Uniform => {
                (0..n).map(|_| rng.gen_range_f64(-sigma, sigma)).collect()
            }
            Distribution::Bimodal => (0..n)
                .map(|_| if rng.gen_f64() < 0.5 { -sigma } else { sigma })
                .collect(),
        };

        Self { values }
    }

    /// Construct from explicit values (used by tests and the raw log).
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Shock values in draw order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of shocks in the sample.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the sample is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic sum of the sample.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Iterate over the shock values.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a ShockSample {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::SimParams;
    use proptest::prelude::*;

    proptest! {
        /// Falsification test: sample length equals shock_count for every
        /// distribution, count, volatility, and seed.
        #[test]
        fn prop_sample_length(
            seed in 0u64..u64::MAX,
            count in 1u32..=100,
            sigma in 0.1f64..=3.0,
            dist_idx in 0usize..3,
        ) {
            let params = SimParams::builder()
                .shock_count(count)
                .volatility(sigma)
                .distribution(Distribution::ALL[dist_idx])
                .build();
            let sample = ShockSample::draw(&params, &mut SimRng::new(seed));
            prop_assert_eq!(sample.len(), count as usize);
        }

        /// Falsification test: uniform and bimodal shocks stay in [-σ, σ].
        #[test]
        fn prop_bounded_distributions(
            seed in 0u64..u64::MAX,
            sigma in 0.1f64..=3.0,
            uniform in proptest::bool::ANY,
        ) {
            let dist = if uniform { Distribution::Uniform } else { Distribution::Bimodal };
            let params = SimParams::builder()
                .shock_count(100)
                .volatility(sigma)
                .distribution(dist)
                .build();
            let sample = ShockSample::draw(&params, &mut SimRng::new(seed));
            for &v in &sample {
                prop_assert!(v >= -sigma && v <= sigma, "shock {} outside ±{}", v, sigma);
            }
        }
    }
}
