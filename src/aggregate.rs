//! Evaluation of response functions over the sweep and the shock sample.
//!
//! One [`Report`] per render cycle: for every function a dense curve, the
//! shock points, and the cumulative gain. The curve step is deterministic
//! given the parameters; the shock step is deterministic given a fixed
//! sample.
//!
//! # Failure containment
//!
//! A custom function may be undefined at a particular point (NaN or infinite
//! result). Such a point is dropped from its trace and excluded from the
//! cumulative sum, and the drop is counted in `skipped`; other functions and
//! other points are never affected. A function whose every sweep point fails
//! is marked failed but still listed, so the rest of the chart renders
//! normally.

use crate::config::SimParams;
use crate::response::{FunctionSet, TraceColor};
use crate::shock::ShockSample;

/// Number of points in the dense curve sweep.
pub const SWEEP_POINTS: usize = 200;

/// Evenly spaced x values over [-3σ, +3σ], endpoints exact.
#[must_use]
pub fn sweep(volatility: f64) -> Vec<f64> {
    let lo = -3.0 * volatility;
    let hi = 3.0 * volatility;
    (0..SWEEP_POINTS)
        .map(|i| {
            let t = i as f64 / (SWEEP_POINTS - 1) as f64;
            // Lerp form keeps both endpoints exact
            lo * (1.0 - t) + hi * t
        })
        .collect()
}

/// Evaluation results for one response function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionReport {
    /// Function label.
    pub label: String,
    /// Trace color.
    pub color: TraceColor,
    /// Dense curve over the sweep, finite points only.
    pub curve: Vec<(f64, f64)>,
    /// (shock, f(shock)) pairs, finite points only.
    pub shock_points: Vec<(f64, f64)>,
    /// Sum of f(shock) over the finite shock evaluations.
    pub cumulative: f64,
    /// Number of points dropped because evaluation was non-finite.
    pub skipped: usize,
    /// Set when the whole curve failed to evaluate.
    pub failed: Option<String>,
}

/// Full evaluation output for one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Sweep range endpoints (-3σ, +3σ).
    pub x_range: (f64, f64),
    /// The shock sample this report was computed from.
    pub shocks: ShockSample,
    /// Per-function results, in function-set order.
    pub functions: Vec<FunctionReport>,
}

impl Report {
    /// Overall y range across all curves and shock points, padded slightly.
    ///
    /// Falls back to (-1, 1) when nothing evaluated.
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for report in &self.functions {
            for &(_, y) in report.curve.iter().chain(report.shock_points.iter()) {
                lo = lo.min(y);
                hi = hi.max(y);
            }
        }
        if lo > hi {
            return (-1.0, 1.0);
        }
        let pad = ((hi - lo) * 0.05).max(0.1);
        (lo - pad, hi + pad)
    }

    /// Label → cumulative gain pairs for the raw log.
    #[must_use]
    pub fn cumulative_gains(&self) -> Vec<(&str, f64)> {
        self.functions
            .iter()
            .map(|f| (f.label.as_str(), f.cumulative))
            .collect()
    }
}

/// Evaluate every function over the sweep and the shock sample.
#[must_use]
pub fn evaluate(functions: &FunctionSet, params: &SimParams, shocks: &ShockSample) -> Report {
    let xs = sweep(params.volatility);
    let x_range = (xs[0], xs[SWEEP_POINTS - 1]);

    let reports = functions
        .iter()
        .map(|function| {
            let mut skipped = 0;

            let curve: Vec<(f64, f64)> = xs
                .iter()
                .filter_map(|&x| {
                    let y = function.eval(x);
                    if y.is_finite() {
                        Some((x, y))
                    } else {
                        skipped += 1;
                        None
                    }
                })
                .collect();

            let mut cumulative = 0.0;
            let shock_points: Vec<(f64, f64)> = shocks
                .iter()
                .filter_map(|&x| {
                    let y = function.eval(x);
                    if y.is_finite() {
                        cumulative += y;
                        Some((x, y))
                    } else {
                        skipped += 1;
                        None
                    }
                })
                .collect();

            let failed = if curve.is_empty() {
                Some(format!(
                    "'{}' produced no finite value over the sweep",
                    function.label()
                ))
            } else {
                None
            };

            FunctionReport {
                label: function.label().to_string(),
                color: function.color(),
                curve,
                shock_points,
                cumulative,
                skipped,
                failed,
            }
        })
        .collect();

    Report {
        x_range,
        shocks: shocks.clone(),
        functions: reports,
    }
}
