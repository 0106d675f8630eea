//! Simulation parameters with schema validation.
//!
//! Parameters are mutated by the dashboard controls and are immutable within
//! one render cycle. They can also be loaded from a YAML file to seed the
//! dashboard, with full schema validation (`deny_unknown_fields` plus range
//! constraints) so a bad file is rejected before the first cycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use validator::Validate;

use crate::error::{SimError, SimResult};

/// Bounds for the shock count control.
pub const SHOCK_COUNT_RANGE: (u32, u32) = (1, 100);
/// Bounds for the volatility control.
pub const VOLATILITY_RANGE: (f64, f64) = (0.1, 3.0);
/// Step used by the volatility control.
pub const VOLATILITY_STEP: f64 = 0.1;

/// Shock distribution kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Gaussian with mean 0 and standard deviation = volatility.
    #[default]
    Normal,
    /// Uniform on the closed interval [-volatility, +volatility].
    Uniform,
    /// Uniform over the two-element set {-volatility, +volatility}.
    Bimodal,
}

impl Distribution {
    /// All distribution kinds, in selector order.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Uniform, Self::Bimodal];

    /// The next kind in selector order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Uniform,
            Self::Uniform => Self::Bimodal,
            Self::Bimodal => Self::Normal,
        }
    }

    /// Parse from a CLI argument.
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "uniform" => Some(Self::Uniform),
            "bimodal" => Some(Self::Bimodal),
            _ => None,
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal (μ=0, σ)"),
            Self::Uniform => write!(f, "Uniform (-σ, σ)"),
            Self::Bimodal => write!(f, "Bimodal (±σ)"),
        }
    }
}

/// Simulation parameters driving one render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SimParams {
    /// Number of shocks per sample.
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_shock_count")]
    pub shock_count: u32,

    /// Shock volatility (σ).
    #[validate(range(min = 0.1, max = 3.0))]
    #[serde(default = "default_volatility")]
    pub volatility: f64,

    /// Shock distribution kind.
    #[serde(default)]
    pub distribution: Distribution,

    /// Optional RNG seed for reproducible runs. Default is seedless.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_shock_count() -> u32 {
    10
}

fn default_volatility() -> f64 {
    1.0
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            shock_count: default_shock_count(),
            volatility: default_volatility(),
            distribution: Distribution::default(),
            seed: None,
        }
    }
}

impl SimParams {
    /// Load parameters from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsing fails, or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse parameters from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let params: Self = serde_yaml::from_str(yaml)?;
        params.validate()?;
        params.validate_semantic()?;
        Ok(params)
    }

    /// Create a builder for parameters.
    #[must_use]
    pub fn builder() -> SimParamsBuilder {
        SimParamsBuilder::default()
    }

    /// Validate semantic constraints beyond the schema.
    fn validate_semantic(&self) -> SimResult<()> {
        if !self.volatility.is_finite() {
            return Err(SimError::config("Volatility must be finite"));
        }
        Ok(())
    }

    /// Adjust the shock count by `delta`, clamped to the control range.
    pub fn bump_shock_count(&mut self, delta: i64) {
        let (lo, hi) = SHOCK_COUNT_RANGE;
        let next = i64::from(self.shock_count) + delta;
        self.shock_count = next.clamp(i64::from(lo), i64::from(hi)) as u32;
    }

    /// Adjust the volatility by `steps` volatility steps, clamped to the
    /// control range and rounded back onto the step grid.
    pub fn bump_volatility(&mut self, steps: i64) {
        let (lo, hi) = VOLATILITY_RANGE;
        let next = self.volatility + steps as f64 * VOLATILITY_STEP;
        // Snap to the 0.1 grid so repeated bumps don't accumulate fp drift
        let snapped = (next / VOLATILITY_STEP).round() * VOLATILITY_STEP;
        self.volatility = snapped.clamp(lo, hi);
    }

    /// Cycle the distribution selector to the next kind.
    pub fn cycle_distribution(&mut self) {
        self.distribution = self.distribution.next();
    }
}

/// Parameter builder for programmatic construction.
#[derive(Debug, Default)]
pub struct SimParamsBuilder {
    shock_count: Option<u32>,
    volatility: Option<f64>,
    distribution: Option<Distribution>,
    seed: Option<u64>,
}

impl SimParamsBuilder {
    /// Set the shock count.
    #[must_use]
    pub const fn shock_count(mut self, count: u32) -> Self {
        self.shock_count = Some(count);
        self
    }

    /// Set the volatility.
    #[must_use]
    pub const fn volatility(mut self, sigma: f64) -> Self {
        self.volatility = Some(sigma);
        self
    }

    /// Set the distribution kind.
    #[must_use]
    pub const fn distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = Some(distribution);
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the parameters.
    #[must_use]
    pub fn build(self) -> SimParams {
        let mut params = SimParams::default();
        if let Some(count) = self.shock_count {
            params.shock_count = count;
        }
        if let Some(sigma) = self.volatility {
            params.volatility = sigma;
        }
        if let Some(distribution) = self.distribution {
            params.distribution = distribution;
        }
        params.seed = self.seed;
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SimParams::default();
        assert_eq!(params.shock_count, 10);
        assert!((params.volatility - 1.0).abs() < f64::EPSILON);
        assert_eq!(params.distribution, Distribution::Normal);
        assert_eq!(params.seed, None);
    }

    #[test]
    fn test_builder() {
        let params = SimParams::builder()
            .shock_count(50)
            .volatility(2.5)
            .distribution(Distribution::Bimodal)
            .seed(7)
            .build();
        assert_eq!(params.shock_count, 50);
        assert!((params.volatility - 2.5).abs() < f64::EPSILON);
        assert_eq!(params.distribution, Distribution::Bimodal);
        assert_eq!(params.seed, Some(7));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = "shock_count: 25\nvolatility: 0.5\ndistribution: uniform\n";
        let params = SimParams::from_yaml(yaml).unwrap();
        assert_eq!(params.shock_count, 25);
        assert!((params.volatility - 0.5).abs() < f64::EPSILON);
        assert_eq!(params.distribution, Distribution::Uniform);
    }

    #[test]
    fn test_from_yaml_defaults() {
        let params = SimParams::from_yaml("{}").unwrap();
        assert_eq!(params, SimParams::default());
    }

    #[test]
    fn test_from_yaml_rejects_out_of_range_count() {
        let yaml = "shock_count: 500\n";
        assert!(SimParams::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_from_yaml_rejects_out_of_range_volatility() {
        let yaml = "volatility: 9.0\n";
        assert!(SimParams::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_from_yaml_rejects_unknown_fields() {
        let yaml = "shock_count: 10\nbogus: 1\n";
        assert!(SimParams::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_bump_shock_count_clamps() {
        let mut params = SimParams::default();
        params.bump_shock_count(1000);
        assert_eq!(params.shock_count, 100);
        params.bump_shock_count(-1000);
        assert_eq!(params.shock_count, 1);
    }

    #[test]
    fn test_bump_volatility_clamps() {
        let mut params = SimParams::default();
        params.bump_volatility(100);
        assert!((params.volatility - 3.0).abs() < 1e-12);
        params.bump_volatility(-100);
        assert!((params.volatility - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_bump_volatility_stays_on_grid() {
        let mut params = SimParams::default();
        for _ in 0..7 {
            params.bump_volatility(1);
        }
        // 1.0 + 7 * 0.1 must land exactly on 1.7, not 1.7000000000000004
        assert!((params.volatility - 1.7).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_cycle_wraps() {
        let mut d = Distribution::Normal;
        d = d.next();
        assert_eq!(d, Distribution::Uniform);
        d = d.next();
        assert_eq!(d, Distribution::Bimodal);
        d = d.next();
        assert_eq!(d, Distribution::Normal);
    }

    #[test]
    fn test_distribution_from_arg() {
        assert_eq!(Distribution::from_arg("normal"), Some(Distribution::Normal));
        assert_eq!(
            Distribution::from_arg("UNIFORM"),
            Some(Distribution::Uniform)
        );
        assert_eq!(
            Distribution::from_arg("bimodal"),
            Some(Distribution::Bimodal)
        );
        assert_eq!(Distribution::from_arg("cauchy"), None);
    }

    #[test]
    fn test_distribution_display() {
        assert!(Distribution::Normal.to_string().contains("Normal"));
        assert!(Distribution::Uniform.to_string().contains("Uniform"));
        assert!(Distribution::Bimodal.to_string().contains("±σ"));
    }
}
