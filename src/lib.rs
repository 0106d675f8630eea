//! # shocksim
//!
//! An interactive terminal dashboard demonstrating how fragile, robust, and
//! antifragile systems respond to random shocks.
//!
//! Three built-in response curves (concave, linear, convex) plus user-defined
//! expressions are evaluated over a dense sweep and over a freshly sampled
//! sequence of random perturbations. Each interaction cycle recomputes
//! everything from the current parameters: no state carries between cycles
//! beyond the append-only list of response functions.
//!
//! ## Example
//!
//! ```rust
//! use shocksim::prelude::*;
//!
//! let params = SimParams::builder().seed(42).shock_count(20).build();
//! let mut rng = SimRng::new(42);
//! let shocks = ShockSample::draw(&params, &mut rng);
//! let functions = FunctionSet::builtins();
//! let report = evaluate(&functions, &params, &shocks);
//! assert_eq!(report.functions.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops
)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod expr;
pub mod response;
pub mod rng;
pub mod shock;
pub mod tui;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::aggregate::{evaluate, sweep, FunctionReport, Report};
    pub use crate::config::{Distribution, SimParams, SimParamsBuilder};
    pub use crate::error::{SimError, SimResult};
    pub use crate::expr::{Expr, ExprError};
    pub use crate::response::{FunctionSet, ResponseFunction, TraceColor};
    pub use crate::rng::SimRng;
    pub use crate::shock::ShockSample;
}

pub use error::{SimError, SimResult};
