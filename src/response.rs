//! Response functions and the session function set.
//!
//! Three built-in curves are fixed for the session and always render first:
//! Fragile (concave), Robust (linear), Antifragile (convex). Custom functions
//! compiled from user expressions append after them in submission order. The
//! set is append-only state owned by the dashboard app and passed by
//! reference into the evaluator and renderer each cycle.

use crate::expr::{self, Expr, ExprError};
use std::fmt;

/// Default label for a custom function when the label field is blank.
pub const DEFAULT_CUSTOM_LABEL: &str = "Custom Function";

/// Trace color assigned to a response function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum TraceColor {
    Red,
    Gray,
    Green,
    Blue,
    Magenta,
    Cyan,
    Yellow,
    LightBlue,
}

/// Palette cycled through for user-defined functions.
const CUSTOM_PALETTE: [TraceColor; 5] = [
    TraceColor::Blue,
    TraceColor::Magenta,
    TraceColor::Cyan,
    TraceColor::Yellow,
    TraceColor::LightBlue,
];

impl fmt::Display for TraceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Gray => "gray",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::Yellow => "yellow",
            Self::LightBlue => "light blue",
        };
        write!(f, "{name}")
    }
}

/// The three built-in response shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Concave: f(x) = -(2^x - 1). Penalizes positive shocks heavily.
    Fragile,
    /// Linear: f(x) = x. Symmetric gain and loss.
    Robust,
    /// Convex: f(x) = 2^x - 1. Gains accelerate, loss bounded by -1.
    Antifragile,
}

impl Builtin {
    const fn label(self) -> &'static str {
        match self {
            Self::Fragile => "Fragile",
            Self::Robust => "Robust",
            Self::Antifragile => "Antifragile",
        }
    }

    const fn color(self) -> TraceColor {
        match self {
            Self::Fragile => TraceColor::Red,
            Self::Robust => TraceColor::Gray,
            Self::Antifragile => TraceColor::Green,
        }
    }

    fn eval(self, x: f64) -> f64 {
        match self {
            Self::Fragile => -(x.exp2() - 1.0),
            Self::Robust => x,
            Self::Antifragile => x.exp2() - 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Body {
    Builtin(Builtin),
    Custom(Expr),
}

/// One response function: a label, a trace color, and a real → real mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFunction {
    label: String,
    color: TraceColor,
    body: Body,
}

impl ResponseFunction {
    fn builtin(kind: Builtin) -> Self {
        Self {
            label: kind.label().to_string(),
            color: kind.color(),
            body: Body::Builtin(kind),
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Trace color.
    #[must_use]
    pub fn color(&self) -> TraceColor {
        self.color
    }

    /// Whether this function came from a user expression.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self.body, Body::Custom(_))
    }

    /// Evaluate at `x`.
    ///
    /// Built-ins are total and finite for finite input; custom functions may
    /// produce NaN or infinity at particular points, which the aggregator
    /// treats as per-point failures.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        match &self.body {
            Body::Builtin(kind) => kind.eval(x),
            Body::Custom(expr) => expr.eval(x),
        }
    }
}

/// Append-only set of response functions for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSet {
    functions: Vec<ResponseFunction>,
}

impl FunctionSet {
    /// The fixed built-in set: Fragile, Robust, Antifragile, in that order.
    #[must_use]
    pub fn builtins() -> Self {
        Self {
            functions: vec![
                ResponseFunction::builtin(Builtin::Fragile),
                ResponseFunction::builtin(Builtin::Robust),
                ResponseFunction::builtin(Builtin::Antifragile),
            ],
        }
    }

    /// Compile `source` and append it as a custom function.
    ///
    /// A blank label falls back to [`DEFAULT_CUSTOM_LABEL`]. On error nothing
    /// is appended and the set is untouched.
    ///
    /// # Errors
    ///
    /// Returns the compilation error for a malformed or out-of-allow-list
    /// expression.
    pub fn add_custom(&mut self, source: &str, label: &str) -> Result<&ResponseFunction, ExprError> {
        let expr = expr::compile(source)?;
        let label = if label.trim().is_empty() {
            DEFAULT_CUSTOM_LABEL.to_string()
        } else {
            label.trim().to_string()
        };
        let color = CUSTOM_PALETTE[self.custom_count() % CUSTOM_PALETTE.len()];
        self.functions.push(ResponseFunction {
            label,
            color,
            body: Body::Custom(expr),
        });
        // Just pushed, so last() cannot be empty
        Ok(&self.functions[self.functions.len() - 1])
    }

    /// All functions: built-ins first, customs in submission order.
    #[must_use]
    pub fn functions(&self) -> &[ResponseFunction] {
        &self.functions
    }

    /// Total function count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Always false: the built-ins are present for the whole session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Number of user-defined functions.
    #[must_use]
    pub fn custom_count(&self) -> usize {
        self.functions.iter().filter(|f| f.is_custom()).count()
    }

    /// Iterate over all functions.
    pub fn iter(&self) -> std::slice::Iter<'_, ResponseFunction> {
        self.functions.iter()
    }
}

impl<'a> IntoIterator for &'a FunctionSet {
    type Item = &'a ResponseFunction;
    type IntoIter = std::slice::Iter<'a, ResponseFunction>;

    fn into_iter(self) -> Self::IntoIter {
        self.functions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_colors() {
        let set = FunctionSet::builtins();
        let labels: Vec<&str> = set.iter().map(ResponseFunction::label).collect();
        assert_eq!(labels, vec!["Fragile", "Robust", "Antifragile"]);

        let colors: Vec<TraceColor> = set.iter().map(ResponseFunction::color).collect();
        assert_eq!(
            colors,
            vec![TraceColor::Red, TraceColor::Gray, TraceColor::Green]
        );
    }

    #[test]
    fn test_fragile_is_concave_penalty() {
        let set = FunctionSet::builtins();
        let fragile = &set.functions()[0];
        // -(2^1 - 1) = -1
        assert!((fragile.eval(1.0) + 1.0).abs() < 1e-12);
        // -(2^-1 - 1) = 0.5
        assert!((fragile.eval(-1.0) - 0.5).abs() < 1e-12);
        assert!(fragile.eval(0.0).abs() < 1e-12);
    }

    #[test]
    fn test_robust_is_identity() {
        let set = FunctionSet::builtins();
        let robust = &set.functions()[1];
        for x in [-2.5, -1.0, 0.0, 0.3, 3.0] {
            assert!((robust.eval(x) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn test_antifragile_is_convex_gain() {
        let set = FunctionSet::builtins();
        let anti = &set.functions()[2];
        // 2^1 - 1 = 1
        assert!((anti.eval(1.0) - 1.0).abs() < 1e-12);
        // 2^-1 - 1 = -0.5
        assert!((anti.eval(-1.0) + 0.5).abs() < 1e-12);
        // Loss bounded: approaches -1 for large negative x
        assert!(anti.eval(-20.0) > -1.0);
    }

    #[test]
    fn test_antifragile_mirrors_fragile() {
        let set = FunctionSet::builtins();
        let fragile = &set.functions()[0];
        let anti = &set.functions()[2];
        for x in [-2.0, -0.5, 0.0, 0.5, 2.0] {
            assert!((fragile.eval(x) + anti.eval(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_add_custom_appends_after_builtins() {
        let mut set = FunctionSet::builtins();
        set.add_custom("x**2", "Quadratic").unwrap();
        assert_eq!(set.len(), 4);
        let added = &set.functions()[3];
        assert_eq!(added.label(), "Quadratic");
        assert!(added.is_custom());
        assert!((added.eval(2.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_add_custom_blank_label_uses_default() {
        let mut set = FunctionSet::builtins();
        set.add_custom("x", "  ").unwrap();
        assert_eq!(set.functions()[3].label(), DEFAULT_CUSTOM_LABEL);
    }

    #[test]
    fn test_add_custom_malformed_leaves_set_unchanged() {
        let mut set = FunctionSet::builtins();
        let before = set.len();
        let err = set.add_custom("x +", "Broken");
        assert!(err.is_err());
        assert_eq!(set.len(), before);
    }

    #[test]
    fn test_custom_colors_cycle_palette() {
        let mut set = FunctionSet::builtins();
        for i in 0..6 {
            set.add_custom("x", &format!("f{i}")).unwrap();
        }
        let customs: Vec<TraceColor> = set
            .iter()
            .filter(|f| f.is_custom())
            .map(ResponseFunction::color)
            .collect();
        assert_eq!(customs[0], TraceColor::Blue);
        assert_eq!(customs[4], TraceColor::LightBlue);
        // Sixth custom wraps back to the start of the palette
        assert_eq!(customs[5], TraceColor::Blue);
    }

    #[test]
    fn test_submission_order_preserved() {
        let mut set = FunctionSet::builtins();
        set.add_custom("x", "First").unwrap();
        set.add_custom("x*2", "Second").unwrap();
        let labels: Vec<&str> = set.iter().map(ResponseFunction::label).collect();
        assert_eq!(
            labels,
            vec!["Fragile", "Robust", "Antifragile", "First", "Second"]
        );
    }

    #[test]
    fn test_custom_count() {
        let mut set = FunctionSet::builtins();
        assert_eq!(set.custom_count(), 0);
        set.add_custom("x", "A").unwrap();
        assert_eq!(set.custom_count(), 1);
    }
}
