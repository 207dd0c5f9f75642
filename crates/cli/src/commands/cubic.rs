//! Fit a cubic to endpoint constraints and report on it.

use anyhow::Result;
use pienoon_motive::{
    CubicCurve, CubicInit, Curve, CurveValueType, GraphSize, RangeF32, graph_curve_on_x_range,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::PlotValue;
use crate::error::CliError;
use crate::output;

/// Relative tolerance for the endpoint checks.
const ENDPOINT_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Serialize)]
struct EndpointCheck {
    name: &'static str,
    expected: f32,
    actual: f32,
    ok: bool,
}

impl EndpointCheck {
    fn new(name: &'static str, expected: f32, actual: f32) -> Self {
        let scale = expected.abs().max(1.0);
        Self {
            name,
            expected,
            actual,
            ok: (expected - actual).abs() <= ENDPOINT_TOLERANCE * scale,
        }
    }
}

/// Execute the cubic command.
pub fn execute(init_json: &str, plot: PlotValue, size: GraphSize, json: bool) -> Result<()> {
    let init: CubicInit = serde_json::from_str(init_json).map_err(CliError::from)?;
    let curve = CubicCurve::try_from_init(&init).map_err(CliError::from)?;
    debug!(%curve, width_x = init.width_x, "fit cubic");

    let w = init.width_x;
    let checks = [
        EndpointCheck::new("start_y", init.start_y, curve.evaluate(0.0)),
        EndpointCheck::new("start_derivative", init.start_derivative, curve.derivative(0.0)),
        EndpointCheck::new("end_y", init.end_y, curve.evaluate(w)),
        EndpointCheck::new("end_derivative", init.end_derivative, curve.derivative(w)),
    ];
    let x_range = RangeF32::new(0.0, w);
    let uniform = curve.uniform_curvature(&x_range);
    let value_type = CurveValueType::from(plot);
    let graph = graph_curve_on_x_range(&curve, value_type, &x_range, size);

    if json {
        let coefficients: Vec<f32> = (0..curve.num_coeff()).rev().map(|i| curve.coeff(i)).collect();
        return output::print_json(&json!({
            "success": true,
            "curve": curve.to_string(),
            "coefficients": coefficients,
            "endpoints": checks,
            "uniform_curvature": uniform,
            "graph": graph,
        }));
    }

    output::heading("Cubic");
    println!("  f(x) = {curve}");
    println!("  x range: [0, {w}]");
    println!("  uniform curvature: {uniform}");
    output::heading("Endpoint checks");
    for check in &checks {
        println!(
            "  {:<17} expected {:>10.4}  actual {:>10.4}  {}",
            check.name,
            check.expected,
            check.actual,
            output::mark(check.ok)
        );
    }
    output::heading(&format!("Graph ({value_type:?})"));
    println!("{graph}");
    Ok(())
}
