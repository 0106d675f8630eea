//! Custom-function expression language.
//!
//! User-typed expressions are compiled once into a closed expression tree and
//! evaluated by recursive descent. The only reachable symbols are the bound
//! variable `x`, the constants `pi` and `e`, and the enumerated math
//! functions in [`Func`]. There is deliberately no escape hatch into a
//! general-purpose evaluator: unrestricted evaluation of user input is a
//! security liability, and the allow-list is the enforcement boundary.
//!
//! Evaluation itself is total over `f64`: domain errors (`ln` of a negative,
//! division by zero) surface as NaN or infinity and are handled downstream by
//! the aggregator's per-point skip policy.

mod lexer;
mod parser;

use thiserror::Error;

/// Compile an expression source string into an expression tree.
///
/// # Errors
///
/// Returns a typed [`ExprError`] for syntax errors, unknown symbols or
/// functions, and arity mismatches.
///
/// # Example
///
/// ```rust
/// use shocksim::expr::compile;
///
/// let f = compile("x**2 - sin(x)").unwrap();
/// assert!((f.eval(0.0)).abs() < 1e-12);
/// ```
pub fn compile(source: &str) -> Result<Expr, ExprError> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(&tokens)
}

/// Errors produced while compiling an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// Character outside the grammar.
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    /// Malformed numeric literal.
    #[error("malformed number at position {0}")]
    BadNumber(usize),
    /// Token in an invalid position.
    #[error("unexpected token at position {0}")]
    UnexpectedToken(usize),
    /// Expression ended mid-construct.
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    /// Identifier that is neither `x`, a constant, nor a known function.
    #[error("unknown symbol '{0}' (only 'x', 'pi' and 'e' are available)")]
    UnknownSymbol(String),
    /// Call target outside the function allow-list.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    /// Call with the wrong number of arguments.
    #[error("function '{name}' expects {expected} argument(s), got {got}")]
    WrongArity {
        /// Function name as written.
        name: String,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Exponentiation (`^` or `**`).
    Pow,
}

/// Allow-listed math functions callable from expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log2,
    Log10,
    Sqrt,
    Cbrt,
    Abs,
    Floor,
    Ceil,
    Round,
    Signum,
    Pow,
    Min,
    Max,
    Atan2,
}

impl Func {
    /// Look up a function by source name. `log` is an alias for `ln`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "asin" => Some(Self::Asin),
            "acos" => Some(Self::Acos),
            "atan" => Some(Self::Atan),
            "sinh" => Some(Self::Sinh),
            "cosh" => Some(Self::Cosh),
            "tanh" => Some(Self::Tanh),
            "exp" => Some(Self::Exp),
            "ln" | "log" => Some(Self::Ln),
            "log2" => Some(Self::Log2),
            "log10" => Some(Self::Log10),
            "sqrt" => Some(Self::Sqrt),
            "cbrt" => Some(Self::Cbrt),
            "abs" => Some(Self::Abs),
            "floor" => Some(Self::Floor),
            "ceil" => Some(Self::Ceil),
            "round" => Some(Self::Round),
            "signum" => Some(Self::Signum),
            "pow" => Some(Self::Pow),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "atan2" => Some(Self::Atan2),
            _ => None,
        }
    }

    /// Required argument count.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Pow | Self::Min | Self::Max | Self::Atan2 => 2,
            _ => 1,
        }
    }

    fn apply(self, args: &[f64]) -> f64 {
        match self {
            Self::Sin => args[0].sin(),
            Self::Cos => args[0].cos(),
            Self::Tan => args[0].tan(),
            Self::Asin => args[0].asin(),
            Self::Acos => args[0].acos(),
            Self::Atan => args[0].atan(),
            Self::Sinh => args[0].sinh(),
            Self::Cosh => args[0].cosh(),
            Self::Tanh => args[0].tanh(),
            Self::Exp => args[0].exp(),
            Self::Ln => args[0].ln(),
            Self::Log2 => args[0].log2(),
            Self::Log10 => args[0].log10(),
            Self::Sqrt => args[0].sqrt(),
            Self::Cbrt => args[0].cbrt(),
            Self::Abs => args[0].abs(),
            Self::Floor => args[0].floor(),
            Self::Ceil => args[0].ceil(),
            Self::Round => args[0].round(),
            Self::Signum => args[0].signum(),
            Self::Pow => args[0].powf(args[1]),
            Self::Min => args[0].min(args[1]),
            Self::Max => args[0].max(args[1]),
            Self::Atan2 => args[0].atan2(args[1]),
        }
    }
}

/// A compiled expression over the single bound variable `x`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal (includes resolved constants).
    Literal(f64),
    /// The bound variable `x`.
    Variable,
    /// Unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Call to an allow-listed function.
    Call {
        /// Callee.
        func: Func,
        /// Arguments, already arity-checked.
        args: Vec<Expr>,
    },
}

impl Expr {
    pub(crate) fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub(crate) fn binary(op: BinOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Evaluate the expression at `x`.
    ///
    /// Total over `f64`: domain errors surface as NaN or infinity rather
    /// than panicking.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Literal(value) => *value,
            Self::Variable => x,
            Self::Unary {
                op: UnaryOp::Neg,
                operand,
            } => -operand.eval(x),
            Self::Binary { op, lhs, rhs } => {
                let l = lhs.eval(x);
                let r = rhs.eval(x);
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                }
            }
            Self::Call { func, args } => {
                let values: Vec<f64> = args.iter().map(|a| a.eval(x)).collect();
                func.apply(&values)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic() {
        let f = compile("x**2").unwrap();
        assert!((f.eval(2.0) - 4.0).abs() < 1e-12);
        assert!((f.eval(-1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_polynomial() {
        let f = compile("x^3 - 2*x").unwrap();
        assert!((f.eval(2.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        let f = compile("1 / x").unwrap();
        assert!(f.eval(0.0).is_infinite());
    }

    #[test]
    fn test_domain_error_is_nan() {
        let f = compile("ln(x)").unwrap();
        assert!(f.eval(-1.0).is_nan());
        let f = compile("sqrt(x)").unwrap();
        assert!(f.eval(-4.0).is_nan());
    }

    #[test]
    fn test_log_alias() {
        let f = compile("log(x)").unwrap();
        let g = compile("ln(x)").unwrap();
        assert!((f.eval(10.0) - g.eval(10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_two_arg_pow() {
        let f = compile("pow(x, 3)").unwrap();
        assert!((f.eval(2.0) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_atan2() {
        let f = compile("atan2(x, 1)").unwrap();
        assert!((f.eval(1.0) - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_all_unary_functions_resolve() {
        for name in [
            "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh",
            "exp", "ln", "log2", "log10", "sqrt", "cbrt", "abs", "floor", "ceil",
            "round", "signum",
        ] {
            let func = Func::from_name(name).unwrap();
            assert_eq!(func.arity(), 1, "{name} should take one argument");
        }
    }

    #[test]
    fn test_no_io_symbols_reachable() {
        for forbidden in ["open", "read", "write", "import", "eval", "exec"] {
            assert!(
                Func::from_name(forbidden).is_none(),
                "'{forbidden}' must not be callable"
            );
            assert!(compile(&format!("{forbidden}(x)")).is_err());
        }
    }

    #[test]
    fn test_compile_is_reusable() {
        let f = compile("2^x - 1").unwrap();
        // One compiled tree, many evaluations
        assert!((f.eval(1.0) - 1.0).abs() < 1e-12);
        assert!((f.eval(0.0)).abs() < 1e-12);
        assert!((f.eval(-1.0) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_error_display() {
        let err = compile("x +").unwrap_err();
        assert!(err.to_string().contains("unexpected end"));
        let err = compile("y").unwrap_err();
        assert!(err.to_string().contains("unknown symbol"));
    }
}
