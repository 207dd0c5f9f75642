//! ASCII plots of points and curves, for debugging and the command line.

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, CurveValueType};
use crate::range::RangeF32;

/// Character grid dimensions for a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSize {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
}

impl GraphSize {
    /// Create a graph size.
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

impl Default for GraphSize {
    fn default() -> Self {
        Self::new(80, 30)
    }
}

const POINT: u8 = b'*';
const AXIS: u8 = b'-';

/// Map `percent` in `[0, 1]` onto a cell index in `0..cells`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn cell(percent: f32, cells: usize) -> usize {
    let last = cells.saturating_sub(1);
    if !percent.is_finite() {
        return last / 2;
    }
    let scaled = (percent.clamp(0.0, 1.0) * last as f32).round() as usize;
    scaled.min(last)
}

/// Render `points` into a `size.width x size.height` grid of characters.
///
/// The top row holds the largest y. Points are drawn as `*`; the x axis is
/// drawn as a row of `-` when `y = 0` is inside the plotted range. When all
/// points share an x (or y) they are drawn in the first column (or middle
/// row). Non-finite points are skipped. Trailing spaces are trimmed from each
/// row and rows are joined with `\n`.
pub fn graph_2d_points(points: &[(f32, f32)], size: GraphSize) -> String {
    if size.width == 0 || size.height == 0 {
        return String::new();
    }

    let finite = || points.iter().filter(|(x, y)| x.is_finite() && y.is_finite());
    let (x_range, y_range) = finite().fold(
        (RangeF32::empty(), RangeF32::empty()),
        |(xr, yr), &(x, y)| (xr.include(x), yr.include(y)),
    );

    let mut grid = vec![vec![b' '; size.width]; size.height];
    let row_for = |y: f32| {
        let percent = if y_range.length() > 0.0 {
            y_range.percent(y)
        } else {
            f32::NAN
        };
        size.height - 1 - cell(percent, size.height)
    };

    if y_range.is_valid() && y_range.contains(0.0) {
        if let Some(row) = grid.get_mut(row_for(0.0)) {
            row.fill(AXIS);
        }
    }

    for &(x, y) in finite() {
        let col = if x_range.length() > 0.0 {
            cell(x_range.percent(x), size.width)
        } else {
            0
        };
        if let Some(c) = grid.get_mut(row_for(y)).and_then(|row| row.get_mut(col)) {
            *c = POINT;
        }
    }

    grid.iter()
        .map(|row| String::from_utf8_lossy(row).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sample `curve` at `size.width` evenly spaced x values across `x_range`
/// and graph the result.
#[allow(clippy::cast_precision_loss)]
pub fn graph_curve_on_x_range<C: Curve + ?Sized>(
    curve: &C,
    value_type: CurveValueType,
    x_range: &RangeF32,
    size: GraphSize,
) -> String {
    let samples = size.width;
    let denominator = samples.saturating_sub(1).max(1) as f32;
    let points: Vec<(f32, f32)> = (0..samples)
        .map(|i| {
            let x = x_range.lerp(i as f32 / denominator);
            (x, curve.value(x, value_type))
        })
        .collect();
    graph_2d_points(&points, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadratic::QuadraticCurve;

    #[test]
    fn test_default_size() {
        assert_eq!(GraphSize::default(), GraphSize::new(80, 30));
    }

    #[test]
    fn test_points_with_axis() {
        let graph = graph_2d_points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)], GraphSize::new(3, 3));
        assert_eq!(graph, "  *\n *\n*--");
    }

    #[test]
    fn test_points_without_axis() {
        let graph = graph_2d_points(&[(0.0, 1.0), (1.0, 2.0)], GraphSize::new(2, 2));
        assert_eq!(graph, " *\n*");
    }

    #[test]
    fn test_degenerate_ranges() {
        let graph = graph_2d_points(&[(5.0, 7.0)], GraphSize::new(4, 3));
        assert_eq!(graph, "\n*\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(graph_2d_points(&[], GraphSize::new(3, 2)), "\n");
        assert_eq!(graph_2d_points(&[(0.0, 0.0)], GraphSize::new(0, 5)), "");
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let graph = graph_2d_points(
            &[(0.0, 1.0), (f32::NAN, 3.0), (1.0, 2.0)],
            GraphSize::new(2, 2),
        );
        assert_eq!(graph, " *\n*");
    }

    #[test]
    fn test_graph_curve_shape() {
        let curve = QuadraticCurve::new(1.0, 0.0, 0.0);
        let graph = graph_curve_on_x_range(
            &curve,
            CurveValueType::Value,
            &RangeF32::new(-1.0, 1.0),
            GraphSize::new(5, 3),
        );
        insta::assert_snapshot!(graph, @r"
        *   *
         * *
        --*--
        ");
    }
}
