//! Solve a quadratic and split a range by its sign.

use anyhow::Result;
use pienoon_motive::{Curve, QuadraticCurve, RangeF32};
use serde_json::json;

use crate::error::CliError;
use crate::output;

fn bounds(ranges: &[RangeF32]) -> Vec<[f32; 2]> {
    ranges.iter().map(|r| [r.start(), r.end()]).collect()
}

fn format_ranges(ranges: &[RangeF32]) -> String {
    if ranges.is_empty() {
        return "none".to_string();
    }
    ranges
        .iter()
        .map(|r| format!("[{:.4}, {:.4}]", r.start(), r.end()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Execute the roots command.
pub fn execute(coefficients: [f32; 3], start: f32, end: f32, json: bool) -> Result<()> {
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(CliError::ValidationError("coefficients must be finite".to_string()).into());
    }
    if !(start.is_finite() && end.is_finite() && start <= end) {
        return Err(CliError::ValidationError(format!(
            "x range [{start}, {end}] must be finite with start <= end"
        ))
        .into());
    }

    let [c2, c1, c0] = coefficients;
    let curve = QuadraticCurve::new(c2, c1, c0);
    let limits = RangeF32::new(start, end);
    let roots = curve.roots();
    let in_range = curve.roots_in_range(&limits);
    let above = curve.ranges_above_zero(&limits);
    let below = curve.ranges_below_zero(&limits);

    if json {
        return output::print_json(&json!({
            "success": true,
            "curve": curve.to_string(),
            "discriminant": curve.discriminant(),
            "epsilon": curve.epsilon(),
            "roots": roots.as_slice(),
            "roots_in_range": in_range.as_slice(),
            "x_range": [start, end],
            "above_zero": bounds(&above),
            "below_zero": bounds(&below),
        }));
    }

    output::heading("Quadratic");
    println!("  f(x) = {curve}");
    println!("  discriminant: {:.4}", curve.discriminant());
    println!("  roots: {}", output::format_values(&roots));
    output::heading(&format!("On [{start}, {end}]"));
    println!("  roots: {}", output::format_values(&in_range));
    println!("  above zero: {}", format_ranges(&above));
    println!("  below zero: {}", format_ranges(&below));
    Ok(())
}
