//! End-to-end checks of the observable dashboard behavior, phrased as
//! falsifiable hypotheses over the public API.

use crossterm::event::KeyCode;
use shocksim::aggregate::{evaluate, sweep, SWEEP_POINTS};
use shocksim::prelude::*;
use shocksim::tui::App;

// H0: the generated shock sample has exactly shock_count elements for every
// distribution kind.
// Falsification: draw with each kind and compare lengths.
#[test]
fn h0_1_sample_length_matches_count_for_all_kinds() {
    for distribution in Distribution::ALL {
        let params = SimParams::builder()
            .shock_count(37)
            .distribution(distribution)
            .seed(42)
            .build();
        let sample = ShockSample::draw(&params, &mut SimRng::new(42));
        assert_eq!(sample.len(), 37, "wrong length for {distribution}");
    }
}

// H0: Uniform and Bimodal shocks stay within [-σ, σ]; Bimodal values are
// exactly ±σ.
#[test]
fn h0_2_bounded_distributions_respect_volatility() {
    let sigma = 2.0;
    let params = SimParams::builder()
        .shock_count(100)
        .volatility(sigma)
        .distribution(Distribution::Uniform)
        .build();
    let sample = ShockSample::draw(&params, &mut SimRng::new(1));
    for &v in &sample {
        assert!((-sigma..=sigma).contains(&v));
    }

    let params = SimParams::builder()
        .shock_count(100)
        .volatility(sigma)
        .distribution(Distribution::Bimodal)
        .build();
    let sample = ShockSample::draw(&params, &mut SimRng::new(1));
    for &v in &sample {
        assert!(v == sigma || v == -sigma, "bimodal shock {v} not ±σ");
    }
}

// H0: the sweep endpoints are exactly ±3σ across the whole control range.
#[test]
fn h0_3_sweep_endpoints_exact() {
    let mut sigma = 0.1;
    while sigma <= 3.0 {
        let xs = sweep(sigma);
        assert_eq!(xs.len(), SWEEP_POINTS);
        assert_eq!(xs[0], -3.0 * sigma);
        assert_eq!(xs[SWEEP_POINTS - 1], 3.0 * sigma);
        sigma += 0.1;
    }
}

// H0: Robust's cumulative gain equals the arithmetic sum of the sample.
#[test]
fn h0_4_robust_identity() {
    let params = SimParams::builder().seed(7).shock_count(50).build();
    let sample = ShockSample::draw(&params, &mut SimRng::new(7));
    let report = evaluate(&FunctionSet::builtins(), &params, &sample);
    assert!((report.functions[1].cumulative - sample.sum()).abs() < 1e-9);
}

// H0: on a symmetric ± pair, convexity beats concavity: Antifragile sums to
// +0.5 and Fragile to -0.5 for shocks [-1, 1].
#[test]
fn h0_5_convexity_vs_concavity() {
    let params = SimParams::default();
    let sample = ShockSample::from_values(vec![-1.0, 1.0]);
    let report = evaluate(&FunctionSet::builtins(), &params, &sample);
    let fragile = report.functions[0].cumulative;
    let antifragile = report.functions[2].cumulative;
    assert!((fragile + 0.5).abs() < 1e-12);
    assert!((antifragile - 0.5).abs() < 1e-12);
    assert!(antifragile > fragile);
}

// H0: submitting `x**2` labeled "Quadratic" adds exactly one function whose
// curve passes through (2, 4) and whose cumulative over [1, -1] is 2.
#[test]
fn h0_6_quadratic_submission() {
    let mut functions = FunctionSet::builtins();
    let before = functions.len();
    functions.add_custom("x**2", "Quadratic").unwrap();
    assert_eq!(functions.len(), before + 1);

    let quad = &functions.functions()[before];
    assert_eq!(quad.label(), "Quadratic");
    assert!((quad.eval(2.0) - 4.0).abs() < 1e-12);

    let params = SimParams::default();
    let sample = ShockSample::from_values(vec![1.0, -1.0]);
    let report = evaluate(&functions, &params, &sample);
    assert!((report.functions[before].cumulative - 2.0).abs() < 1e-12);
}

// H0: a malformed expression produces an error indicator and leaves the
// function count unchanged.
#[test]
fn h0_7_malformed_submission_rejected() {
    let mut app = App::new(SimParams::builder().seed(42).build());
    let before = app.functions.len();
    app.expression_input = "x +".to_string();
    app.apply_custom();

    assert_eq!(app.functions.len(), before);
    let status = app.status.as_ref().unwrap();
    assert!(status.error);
    assert!(!app.should_quit, "session must stay interactive");
}

// H0: two cycles with identical parameters draw different samples but
// identical curves.
#[test]
fn h0_8_seedless_resample_keeps_curves() {
    let mut app = App::new(SimParams::default());
    let shocks_before = app.report.shocks.clone();
    let curves_before: Vec<_> = app
        .report
        .functions
        .iter()
        .map(|f| f.curve.clone())
        .collect();

    app.handle_key(KeyCode::Char('r'));

    assert_ne!(app.report.shocks, shocks_before, "sample must be fresh");
    for (f, before) in app.report.functions.iter().zip(&curves_before) {
        assert_eq!(&f.curve, before, "curves are deterministic given params");
    }
}

// H0: a fixed seed makes the whole shock stream reproducible end to end.
#[test]
fn h0_9_seeded_runs_reproduce() {
    let params = SimParams::builder().seed(123).shock_count(30).build();
    let a = App::new(params.clone());
    let b = App::new(params);
    assert_eq!(a.report.shocks, b.report.shocks);
    assert_eq!(a.report.functions, b.report.functions);
}

// H0: a custom function that fails on part of its domain never disturbs the
// built-in traces.
#[test]
fn h0_10_per_point_failures_are_contained() {
    let mut app = App::new(SimParams::builder().seed(42).build());
    app.expression_input = "ln(x)".to_string();
    app.label_input = "Log".to_string();
    app.apply_custom();

    assert_eq!(app.report.functions.len(), 4);
    let log = &app.report.functions[3];
    assert!(log.skipped > 0);
    for builtin in &app.report.functions[..3] {
        assert_eq!(builtin.skipped, 0);
        assert_eq!(builtin.curve.len(), SWEEP_POINTS);
    }
}
