//! Quantized cubic splines and their playback parameters.
//!
//! A [`CompactSpline`] stores `(x, y, slope)` nodes in six bytes each: x as a
//! multiple of the spline's granularity, y as one of 65536 rungs across the
//! spline's y range, and the slope as an angle. Consecutive nodes are joined
//! by the [`CubicCurve`] that matches both nodes' values and slopes.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cubic::{CubicCurve, CubicInit};
use crate::curve::Curve;
use crate::error::{CurveError, CurveResult, ensure_finite};
use crate::range::RangeF32;

/// Largest representable x, in grains.
pub const MAX_X_GRAIN: u16 = u16::MAX;

/// Number of y rungs above the bottom of the y range.
pub const MAX_Y_RUNG: u16 = u16::MAX;

/// Quantized angle corresponding to a vertical slope.
const MAX_ANGLE: i16 = i16::MAX;

/// Clearance, relative to `1 + slope^2`, kept between an inflection node's
/// slope and the edge of its one-way interval. Well above one angle step.
const SLOPE_MARGIN: f32 = 1e-3;

/// One quantized spline node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompactSplineNode {
    x: u16,
    y: u16,
    angle: i16,
}

impl CompactSplineNode {
    /// Create a node from already-quantized values.
    pub const fn new(x: u16, y: u16, angle: i16) -> Self {
        Self { x, y, angle }
    }

    /// x, in multiples of the spline's granularity.
    pub const fn x(&self) -> u16 {
        self.x
    }

    /// y, as a rung of the spline's y range.
    pub const fn y(&self) -> u16 {
        self.y
    }

    /// Slope, as a quantized angle in `-32767..=32767` (-90 to +90 degrees).
    pub const fn angle(&self) -> i16 {
        self.angle
    }
}

/// Location of an x value relative to a spline's nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplineIndex {
    /// Before the first node (or the spline is empty).
    Before,
    /// On the segment that starts at this node.
    Node(usize),
    /// At or after the last node.
    After,
}

/// How [`CompactSpline::add_node`] treats the new segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SplineAddMethod {
    /// Append the node as given.
    AddWithoutModification,
    /// Also insert a node at the segment's inflection point, if it has one,
    /// so that every stored segment curves in one direction.
    #[default]
    EnsureCubicWellBehaved,
}

/// A smooth curve through quantized nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompactSpline {
    nodes: Vec<CompactSplineNode>,
    y_range: RangeF32,
    x_granularity: f32,
}

impl Default for CompactSpline {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            y_range: RangeF32::new(0.0, 1.0),
            x_granularity: 1.0,
        }
    }
}

impl CompactSpline {
    /// Create an empty spline.
    ///
    /// `y_range` bounds every node's y; leave some headroom because
    /// [`SplineAddMethod::EnsureCubicWellBehaved`] may insert nodes slightly
    /// beyond the source values. `x_granularity` is the x spacing of the
    /// grid nodes are snapped to.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidConfiguration`] if `y_range` is invalid
    /// or `x_granularity` is not a positive finite number.
    pub fn new(y_range: RangeF32, x_granularity: f32, num_nodes_hint: usize) -> CurveResult<Self> {
        let mut spline = Self::default();
        spline.init(y_range, x_granularity, num_nodes_hint)?;
        Ok(spline)
    }

    /// Reset to an empty spline with new ranges.
    ///
    /// # Errors
    ///
    /// See [`CompactSpline::new`]. On error the spline is left unchanged.
    pub fn init(
        &mut self,
        y_range: RangeF32,
        x_granularity: f32,
        num_nodes_hint: usize,
    ) -> CurveResult<()> {
        ensure_finite("y_range.start", y_range.start())?;
        ensure_finite("y_range.end", y_range.end())?;
        if !y_range.is_valid() {
            return Err(CurveError::InvalidConfiguration(format!(
                "y range [{}, {}] is inverted",
                y_range.start(),
                y_range.end()
            )));
        }
        if !(x_granularity.is_finite() && x_granularity > 0.0) {
            return Err(CurveError::InvalidConfiguration(format!(
                "x granularity must be positive, got {x_granularity}"
            )));
        }

        self.y_range = y_range;
        self.x_granularity = x_granularity;
        self.nodes.clear();
        self.nodes.reserve(num_nodes_hint);
        Ok(())
    }

    /// The finest granularity that still represents `max_x`.
    pub fn recommend_x_granularity(max_x: f32) -> f32 {
        if max_x > 0.0 {
            max_x / f32::from(MAX_X_GRAIN)
        } else {
            1.0
        }
    }

    /// Append a node at `(x, y)` with slope `derivative`.
    ///
    /// A node whose x does not land on a later grain than the current last
    /// node is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is not finite, `y` is outside the y range
    /// or `x` does not fit in the grain grid.
    pub fn add_node(
        &mut self,
        x: f32,
        y: f32,
        derivative: f32,
        method: SplineAddMethod,
    ) -> CurveResult<()> {
        let node = CompactSplineNode::new(
            self.x_to_grain(ensure_finite("x", x)?)?,
            self.y_to_rung(ensure_finite("y", y)?)?,
            derivative_to_angle(ensure_finite("derivative", derivative)?),
        );

        if let Some(last) = self.nodes.last().copied() {
            if node.x <= last.x {
                trace!(
                    x,
                    last_x = self.grain_to_x(last.x),
                    "ignoring spline node that does not advance x"
                );
                return Ok(());
            }
            if method == SplineAddMethod::EnsureCubicWellBehaved {
                self.insert_inflection_node(last, node);
            }
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Append an already-quantized node, unchecked.
    pub fn add_node_verbatim(&mut self, x: u16, y: u16, angle: i16) {
        self.nodes.push(CompactSplineNode::new(x, y, angle));
    }

    /// Remove every node. Ranges are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The quantized nodes, in x order.
    pub fn nodes(&self) -> &[CompactSplineNode] {
        &self.nodes
    }

    /// Bounds for every node's y.
    pub fn range_y(&self) -> RangeF32 {
        self.y_range
    }

    /// Size of one x grain.
    pub fn x_granularity(&self) -> f32 {
        self.x_granularity
    }

    /// Find the segment containing `x`.
    ///
    /// `guess` is checked first, then the segment after it, before falling
    /// back to a binary search. Callers stepping forward through x should
    /// pass the previous result.
    pub fn index_for_x(&self, x: f32, guess: usize) -> SplineIndex {
        let (Some(first), Some(last)) = (self.nodes.first(), self.nodes.last()) else {
            return SplineIndex::Before;
        };

        let grain = x / self.x_granularity;
        if grain < f32::from(first.x) {
            return SplineIndex::Before;
        }
        if grain >= f32::from(last.x) {
            return SplineIndex::After;
        }
        if self.segment_contains(grain, guess) {
            return SplineIndex::Node(guess);
        }
        if self.segment_contains(grain, guess + 1) {
            return SplineIndex::Node(guess + 1);
        }

        // At least the first node is <= grain, so this is >= 1.
        let after = self.nodes.partition_point(|node| f32::from(node.x) <= grain);
        SplineIndex::Node(after.saturating_sub(1))
    }

    /// x of the first node, or 0 for an empty spline.
    pub fn start_x(&self) -> f32 {
        self.nodes.first().map_or(0.0, |n| self.grain_to_x(n.x))
    }

    /// y of the first node, or 0 for an empty spline.
    pub fn start_y(&self) -> f32 {
        self.nodes.first().map_or(0.0, |n| self.rung_to_y(n.y))
    }

    /// Slope at the first node, or 0 for an empty spline.
    pub fn start_derivative(&self) -> f32 {
        self.nodes.first().map_or(0.0, |n| angle_to_derivative(n.angle))
    }

    /// x of the last node, or 0 for an empty spline.
    pub fn end_x(&self) -> f32 {
        self.nodes.last().map_or(0.0, |n| self.grain_to_x(n.x))
    }

    /// y of the last node, or 0 for an empty spline.
    pub fn end_y(&self) -> f32 {
        self.nodes.last().map_or(0.0, |n| self.rung_to_y(n.y))
    }

    /// Slope at the last node, or 0 for an empty spline.
    pub fn end_derivative(&self) -> f32 {
        self.nodes.last().map_or(0.0, |n| angle_to_derivative(n.angle))
    }

    /// x of node `index`, or 0 if there is no such node.
    pub fn node_x(&self, index: usize) -> f32 {
        self.nodes.get(index).map_or(0.0, |n| self.grain_to_x(n.x))
    }

    /// y of node `index`, or 0 if there is no such node.
    pub fn node_y(&self, index: usize) -> f32 {
        self.nodes.get(index).map_or(0.0, |n| self.rung_to_y(n.y))
    }

    /// Slope at node `index`, or 0 if there is no such node.
    pub fn node_derivative(&self, index: usize) -> f32 {
        self.nodes.get(index).map_or(0.0, |n| angle_to_derivative(n.angle))
    }

    /// `end_x() - start_x()`.
    pub fn length_x(&self) -> f32 {
        self.end_x() - self.start_x()
    }

    /// `[start_x(), end_x()]`.
    pub fn range_x(&self) -> RangeF32 {
        RangeF32::new(self.start_x(), self.end_x())
    }

    /// x extent of the segment at `index`. Outside the spline this extends
    /// to infinity on the open side.
    pub fn segment_range_x(&self, index: SplineIndex) -> RangeF32 {
        match index {
            SplineIndex::Before => RangeF32::new(f32::NEG_INFINITY, self.start_x()),
            SplineIndex::After => RangeF32::new(self.end_x(), f32::INFINITY),
            SplineIndex::Node(i) => match (self.nodes.get(i), self.nodes.get(i + 1)) {
                (Some(s), Some(e)) => RangeF32::new(self.grain_to_x(s.x), self.grain_to_x(e.x)),
                (Some(s), None) => RangeF32::new(self.grain_to_x(s.x), f32::INFINITY),
                _ => RangeF32::default(),
            },
        }
    }

    /// Parameters of the cubic for the segment at `index`, in coordinates
    /// local to the segment start.
    ///
    /// Outside the spline the curve is flat at the nearest end's y.
    pub fn create_cubic_init(&self, index: SplineIndex) -> CubicInit {
        match index {
            SplineIndex::Before => constant_init(self.start_y()),
            SplineIndex::After => constant_init(self.end_y()),
            SplineIndex::Node(i) => match (self.nodes.get(i), self.nodes.get(i + 1)) {
                (Some(&s), Some(&e)) => self.cubic_init_between(s, e),
                (Some(s), None) => constant_init(self.rung_to_y(s.y)),
                _ => constant_init(self.end_y()),
            },
        }
    }

    /// Evaluate the spline at `x`.
    ///
    /// Searches for the segment and rebuilds its cubic on every call; use
    /// [`CompactSpline::ys`] to sample many x values.
    pub fn y_calculated_slowly(&self, x: f32) -> f32 {
        let index = self.index_for_x(x, 0);
        SegmentCurve::new(self, index).evaluate(x)
    }

    /// Sample the spline at `count` x values `start_x + i * delta_x`.
    #[allow(clippy::cast_precision_loss)]
    pub fn ys(&self, start_x: f32, delta_x: f32, count: usize) -> Vec<f32> {
        let mut ys = Vec::with_capacity(count);
        let mut segment = SegmentCurve::new(self, self.index_for_x(start_x, 0));
        for i in 0..count {
            let x = start_x + delta_x * i as f32;
            let guess = match segment.index {
                SplineIndex::Node(n) => n,
                SplineIndex::Before | SplineIndex::After => 0,
            };
            let index = self.index_for_x(x, guess);
            if index != segment.index {
                segment = SegmentCurve::new(self, index);
            }
            ys.push(segment.evaluate(x));
        }
        ys
    }

    /// Sample several splines at the same x values.
    ///
    /// The result is row-major: `count` rows of `splines.len()` values, so
    /// element `i * splines.len() + s` is spline `s` at
    /// `start_x + i * delta_x`.
    pub fn bulk_ys(splines: &[Self], start_x: f32, delta_x: f32, count: usize) -> Vec<f32> {
        let columns: Vec<Vec<f32>> = splines
            .iter()
            .map(|spline| spline.ys(start_x, delta_x, count))
            .collect();
        (0..count)
            .flat_map(|i| columns.iter().map(move |c| c.get(i).copied().unwrap_or(0.0)))
            .collect()
    }

    fn segment_contains(&self, grain: f32, index: usize) -> bool {
        match (self.nodes.get(index), self.nodes.get(index + 1)) {
            (Some(s), Some(e)) => f32::from(s.x) <= grain && grain < f32::from(e.x),
            _ => false,
        }
    }

    fn cubic_init_between(&self, s: CompactSplineNode, e: CompactSplineNode) -> CubicInit {
        CubicInit::new(
            self.rung_to_y(s.y),
            angle_to_derivative(s.angle),
            self.rung_to_y(e.y),
            angle_to_derivative(e.angle),
            f32::from(e.x.saturating_sub(s.x)) * self.x_granularity,
        )
    }

    /// If the cubic from `s` to `e` changes curvature, push a node at the
    /// grain nearest the point where `f''` crosses zero. The node's slope is
    /// chosen so that both quantized halves still curve one way.
    fn insert_inflection_node(&mut self, s: CompactSplineNode, e: CompactSplineNode) {
        let init = self.cubic_init_between(s, e);
        let cubic = CubicCurve::from_init(&init);
        if cubic.uniform_curvature(&RangeF32::new(0.0, init.width_x)) {
            return;
        }
        let c3 = cubic.coeff(3);
        if c3.abs() < cubic.epsilon() {
            return;
        }

        let inflection_x = -cubic.coeff(2) / (3.0 * c3);
        let Ok(offset) = self.x_to_grain(inflection_x) else {
            return;
        };
        let grain = s.x.saturating_add(offset);
        if grain <= s.x || grain >= e.x {
            return;
        }

        let local_x = f32::from(grain - s.x) * self.x_granularity;
        let y = self.y_range.clamp(cubic.evaluate(local_x));
        let rung = match self.y_to_rung(y) {
            Ok(rung) => rung,
            Err(err) => {
                debug!(%err, "skipping inflection node");
                return;
            }
        };
        let mid = CompactSplineNode::new(grain, rung, 0);
        let Some(derivative) = self.one_way_slope(s, mid, e, cubic.derivative(local_x)) else {
            debug!(x = self.grain_to_x(grain), "no slope keeps both halves curving one way");
            return;
        };
        debug!(
            x = self.grain_to_x(grain),
            y, derivative, "inserting spline node at inflection point"
        );
        self.nodes.push(CompactSplineNode::new(grain, rung, derivative_to_angle(derivative)));
    }

    /// The slope at `mid` nearest `target` for which the cubics `s..mid` and
    /// `mid..e` each keep one sign of `f''`, kept clear of the interval's
    /// edges by more than one angle step.
    fn one_way_slope(
        &self,
        s: CompactSplineNode,
        mid: CompactSplineNode,
        e: CompactSplineNode,
        target: f32,
    ) -> Option<f32> {
        let mid_y = self.rung_to_y(mid.y);
        let left = one_way_slopes(
            (mid_y - self.rung_to_y(s.y)) / (f32::from(mid.x - s.x) * self.x_granularity),
            angle_to_derivative(s.angle),
        );
        let right = one_way_slopes(
            (self.rung_to_y(e.y) - mid_y) / (f32::from(e.x - mid.x) * self.x_granularity),
            angle_to_derivative(e.angle),
        );
        let lo = left.0.max(right.0);
        let hi = left.1.min(right.1);
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return None;
        }
        let nearest = target.max(lo).min(hi);
        let margin = ((hi - lo) * 0.5).min(SLOPE_MARGIN * (1.0 + nearest * nearest));
        Some(target.max(lo + margin).min(hi - margin))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn x_to_grain(&self, x: f32) -> CurveResult<u16> {
        let grains = (x / self.x_granularity).round();
        if (0.0..=f32::from(MAX_X_GRAIN)).contains(&grains) {
            Ok(grains as u16)
        } else {
            Err(CurveError::XOutOfRange {
                x,
                granularity: self.x_granularity,
                max_grains: MAX_X_GRAIN,
            })
        }
    }

    fn grain_to_x(&self, grain: u16) -> f32 {
        f32::from(grain) * self.x_granularity
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn y_to_rung(&self, y: f32) -> CurveResult<u16> {
        if !self.y_range.contains(y) {
            return Err(CurveError::YOutOfRange {
                y,
                start: self.y_range.start(),
                end: self.y_range.end(),
            });
        }
        if self.y_range.length() <= 0.0 {
            return Ok(0);
        }
        let rung = (self.y_range.percent(y) * f32::from(MAX_Y_RUNG)).round();
        Ok(rung.clamp(0.0, f32::from(MAX_Y_RUNG)) as u16)
    }

    fn rung_to_y(&self, rung: u16) -> f32 {
        self.y_range.lerp(f32::from(rung) / f32::from(MAX_Y_RUNG))
    }
}

/// The cubic for one segment, with the x where its local coordinates start.
#[derive(Debug)]
struct SegmentCurve {
    index: SplineIndex,
    start_x: f32,
    cubic: CubicCurve,
}

impl SegmentCurve {
    fn new(spline: &CompactSpline, index: SplineIndex) -> Self {
        let start_x = match index {
            SplineIndex::Node(i) => spline.node_x(i),
            SplineIndex::Before | SplineIndex::After => 0.0,
        };
        Self {
            index,
            start_x,
            cubic: CubicCurve::from_init(&spline.create_cubic_init(index)),
        }
    }

    fn evaluate(&self, x: f32) -> f32 {
        match self.index {
            SplineIndex::Node(_) => self.cubic.evaluate(x - self.start_x),
            SplineIndex::Before | SplineIndex::After => self.cubic.evaluate(0.0),
        }
    }
}

/// Bounds on the slope at one end of a Hermite cubic that keep `f''` from
/// changing sign, given the cubic's secant slope and its other end's slope.
/// One bound puts the zero of `f''` at this end, the other at the far end.
fn one_way_slopes(secant: f32, other: f32) -> (f32, f32) {
    let zero_here = (3.0 * secant - other) * 0.5;
    let zero_there = 3.0 * secant - 2.0 * other;
    (zero_here.min(zero_there), zero_here.max(zero_there))
}

fn constant_init(y: f32) -> CubicInit {
    CubicInit::new(y, 0.0, y, 0.0, 1.0)
}

#[allow(clippy::cast_possible_truncation)]
fn derivative_to_angle(derivative: f32) -> i16 {
    let angle = (f64::from(derivative).atan() / FRAC_PI_2 * f64::from(MAX_ANGLE)).round();
    angle.clamp(-f64::from(MAX_ANGLE), f64::from(MAX_ANGLE)) as i16
}

#[allow(clippy::cast_possible_truncation)]
fn angle_to_derivative(angle: i16) -> f32 {
    // MAX_ANGLE maps to exactly FRAC_PI_2, just below the true pole, so the
    // slope stays finite and positive.
    (f64::from(angle) / f64::from(MAX_ANGLE) * FRAC_PI_2).tan() as f32
}

/// How a spline is traversed over time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplinePlayback {
    /// Spline x at time zero.
    pub start_x: f32,
    /// Spline x units per unit of time. 0 pauses, 2 is double speed.
    pub playback_rate: f32,
    /// Wrap back to the start after reaching the end.
    pub repeat: bool,
}

impl Default for SplinePlayback {
    fn default() -> Self {
        Self {
            start_x: 0.0,
            playback_rate: 1.0,
            repeat: false,
        }
    }
}

impl SplinePlayback {
    /// Create playback parameters.
    pub const fn new(start_x: f32, playback_rate: f32, repeat: bool) -> Self {
        Self {
            start_x,
            playback_rate,
            repeat,
        }
    }

    /// Spline x after `elapsed` time, for a spline covering `range_x`.
    pub fn x_at(&self, range_x: &RangeF32, elapsed: f32) -> f32 {
        let x = self.start_x + elapsed * self.playback_rate;
        if range_x.length() <= 0.0 {
            return range_x.start();
        }
        if range_x.contains(x) {
            x
        } else if self.repeat {
            range_x.normalize_wild_value(x)
        } else {
            range_x.clamp(x)
        }
    }

    /// Evaluate every channel after `elapsed` time.
    pub fn evaluate(&self, splines: &[CompactSpline], elapsed: f32) -> Vec<f32> {
        splines
            .iter()
            .map(|spline| spline.y_calculated_slowly(self.x_at(&spline.range_x(), elapsed)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, tolerance: f32) -> bool {
        (a - b).abs() < tolerance
    }

    fn ramp() -> CurveResult<CompactSpline> {
        let mut spline = CompactSpline::new(RangeF32::new(0.0, 10.0), 0.01, 2)?;
        spline.add_node(0.0, 0.0, 1.0, SplineAddMethod::AddWithoutModification)?;
        spline.add_node(10.0, 10.0, 1.0, SplineAddMethod::AddWithoutModification)?;
        Ok(spline)
    }

    #[test]
    fn test_new_rejects_bad_configuration() {
        assert!(CompactSpline::new(RangeF32::new(1.0, 0.0), 1.0, 0).is_err());
        assert!(CompactSpline::new(RangeF32::new(0.0, 1.0), 0.0, 0).is_err());
        assert!(CompactSpline::new(RangeF32::new(0.0, f32::NAN), 1.0, 0).is_err());
    }

    #[test]
    fn test_empty_spline_accessors() {
        let spline = CompactSpline::default();
        assert_eq!(spline.num_nodes(), 0);
        assert!(close(spline.start_x(), 0.0, 1e-6));
        assert!(close(spline.end_y(), 0.0, 1e-6));
        assert!(close(spline.node_derivative(3), 0.0, 1e-6));
        assert_eq!(spline.index_for_x(5.0, 0), SplineIndex::Before);
        assert!(close(spline.y_calculated_slowly(5.0), 0.0, 1e-6));
    }

    #[test]
    fn test_nodes_round_trip_within_quantization() -> CurveResult<()> {
        let spline = ramp()?;
        assert_eq!(spline.num_nodes(), 2);
        assert!(close(spline.start_x(), 0.0, 1e-6));
        assert!(close(spline.end_x(), 10.0, 1e-3));
        assert!(close(spline.end_y(), 10.0, 1e-3));
        assert!(close(spline.start_derivative(), 1.0, 1e-3));
        assert!(close(spline.length_x(), 10.0, 1e-3));
        assert_eq!(spline.range_y(), RangeF32::new(0.0, 10.0));
        Ok(())
    }

    #[test]
    fn test_add_node_rejects_out_of_range_values() -> CurveResult<()> {
        let mut spline = CompactSpline::new(RangeF32::new(0.0, 1.0), 1.0, 0)?;
        assert!(matches!(
            spline.add_node(0.0, 2.0, 0.0, SplineAddMethod::AddWithoutModification),
            Err(CurveError::YOutOfRange { .. })
        ));
        assert!(matches!(
            spline.add_node(-5.0, 0.5, 0.0, SplineAddMethod::AddWithoutModification),
            Err(CurveError::XOutOfRange { .. })
        ));
        assert!(matches!(
            spline.add_node(70_000.0, 0.5, 0.0, SplineAddMethod::AddWithoutModification),
            Err(CurveError::XOutOfRange { .. })
        ));
        assert_eq!(spline.num_nodes(), 0);
        Ok(())
    }

    #[test]
    fn test_add_node_ignores_non_increasing_x() -> CurveResult<()> {
        let mut spline = CompactSpline::new(RangeF32::new(0.0, 1.0), 1.0, 0)?;
        spline.add_node(5.0, 0.5, 0.0, SplineAddMethod::AddWithoutModification)?;
        spline.add_node(5.0, 0.7, 0.0, SplineAddMethod::AddWithoutModification)?;
        spline.add_node(3.0, 0.7, 0.0, SplineAddMethod::AddWithoutModification)?;
        assert_eq!(spline.num_nodes(), 1);
        Ok(())
    }

    #[test]
    fn test_well_behaved_inserts_inflection_node() -> CurveResult<()> {
        // Smoothstep from 0 to 1 changes curvature at its midpoint.
        let mut spline = CompactSpline::new(RangeF32::new(0.0, 1.0), 0.01, 0)?;
        spline.add_node(0.0, 0.0, 0.0, SplineAddMethod::EnsureCubicWellBehaved)?;
        spline.add_node(1.0, 1.0, 0.0, SplineAddMethod::EnsureCubicWellBehaved)?;
        assert_eq!(spline.num_nodes(), 3);
        assert!(close(spline.node_x(1), 0.5, 1e-4));
        assert!(close(spline.node_y(1), 0.5, 1e-3));
        assert!(close(spline.node_derivative(1), 1.5, 1e-2));
        assert!(segments_curve_one_way(&spline));

        let mut plain = CompactSpline::new(RangeF32::new(0.0, 1.0), 0.01, 0)?;
        plain.add_node(0.0, 0.0, 0.0, SplineAddMethod::AddWithoutModification)?;
        plain.add_node(1.0, 1.0, 0.0, SplineAddMethod::AddWithoutModification)?;
        assert_eq!(plain.num_nodes(), 2);
        Ok(())
    }

    fn segments_curve_one_way(spline: &CompactSpline) -> bool {
        (0..spline.num_nodes().saturating_sub(1)).all(|i| {
            let init = spline.create_cubic_init(SplineIndex::Node(i));
            CubicCurve::from_init(&init).uniform_curvature(&RangeF32::new(0.0, init.width_x))
        })
    }

    #[test]
    fn test_well_behaved_splits_s_curves_into_one_way_halves() -> CurveResult<()> {
        // Inflections off the grain and off the rung, so the inserted node
        // cannot carry the cubic's own slope exactly.
        let mut spline = CompactSpline::new(RangeF32::new(-2.0, 2.0), 0.01, 0)?;
        for (x, y, derivative) in [(0.0, -1.0, 0.3), (1.0, 0.7, -0.4), (2.0, -0.2, 1.7)] {
            spline.add_node(x, y, derivative, SplineAddMethod::EnsureCubicWellBehaved)?;
        }
        assert!(spline.num_nodes() > 3);
        assert!(segments_curve_one_way(&spline));
        Ok(())
    }

    #[test]
    fn test_well_behaved_leaves_uniform_segments_alone() -> CurveResult<()> {
        // x^2 on [0, 1]: f'' is constant.
        let mut spline = CompactSpline::new(RangeF32::new(0.0, 1.0), 0.01, 0)?;
        spline.add_node(0.0, 0.0, 0.0, SplineAddMethod::EnsureCubicWellBehaved)?;
        spline.add_node(1.0, 1.0, 2.0, SplineAddMethod::EnsureCubicWellBehaved)?;
        assert_eq!(spline.num_nodes(), 2);
        Ok(())
    }

    #[test]
    fn test_index_for_x() -> CurveResult<()> {
        let mut spline = CompactSpline::new(RangeF32::new(0.0, 1.0), 1.0, 0)?;
        for x in [0.0, 10.0, 20.0, 30.0] {
            spline.add_node(x, 0.5, 0.0, SplineAddMethod::AddWithoutModification)?;
        }
        assert_eq!(spline.index_for_x(-1.0, 0), SplineIndex::Before);
        assert_eq!(spline.index_for_x(0.0, 0), SplineIndex::Node(0));
        assert_eq!(spline.index_for_x(15.0, 0), SplineIndex::Node(1));
        assert_eq!(spline.index_for_x(25.0, 0), SplineIndex::Node(2));
        assert_eq!(spline.index_for_x(25.0, 2), SplineIndex::Node(2));
        assert_eq!(spline.index_for_x(5.0, 2), SplineIndex::Node(0));
        assert_eq!(spline.index_for_x(30.0, 0), SplineIndex::After);
        assert_eq!(spline.index_for_x(99.0, 0), SplineIndex::After);
        assert_eq!(
            spline.segment_range_x(SplineIndex::Node(1)),
            RangeF32::new(10.0, 20.0)
        );
        Ok(())
    }

    #[test]
    fn test_cubic_init_outside_spline_is_constant() -> CurveResult<()> {
        let spline = ramp()?;
        let before = spline.create_cubic_init(SplineIndex::Before);
        assert!(close(before.start_y, 0.0, 1e-6));
        assert!(close(before.end_y, 0.0, 1e-6));
        assert!(close(before.start_derivative, 0.0, 1e-6));
        let after = spline.create_cubic_init(SplineIndex::After);
        assert!(close(after.start_y, 10.0, 1e-3));
        assert!(close(after.end_derivative, 0.0, 1e-6));
        Ok(())
    }

    #[test]
    fn test_y_calculated_slowly() -> CurveResult<()> {
        let spline = ramp()?;
        assert!(close(spline.y_calculated_slowly(5.0), 5.0, 1e-2));
        assert!(close(spline.y_calculated_slowly(-3.0), 0.0, 1e-3));
        assert!(close(spline.y_calculated_slowly(12.0), 10.0, 1e-3));
        Ok(())
    }

    #[test]
    fn test_ys_matches_slow_evaluation() -> CurveResult<()> {
        let mut spline = CompactSpline::new(RangeF32::new(-2.0, 2.0), 0.01, 0)?;
        spline.add_node(0.0, 0.0, 0.0, SplineAddMethod::EnsureCubicWellBehaved)?;
        spline.add_node(1.0, 1.0, 0.0, SplineAddMethod::EnsureCubicWellBehaved)?;
        spline.add_node(2.0, -1.0, 0.5, SplineAddMethod::EnsureCubicWellBehaved)?;

        let ys = spline.ys(-0.5, 0.25, 14);
        assert_eq!(ys.len(), 14);
        for (i, y) in ys.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = -0.5 + 0.25 * i as f32;
            assert!(close(*y, spline.y_calculated_slowly(x), 1e-5), "x = {x}");
        }
        Ok(())
    }

    #[test]
    fn test_bulk_ys_is_row_major() -> CurveResult<()> {
        let rising = ramp()?;
        let mut flat = CompactSpline::new(RangeF32::new(0.0, 10.0), 0.01, 0)?;
        flat.add_node(0.0, 3.0, 0.0, SplineAddMethod::AddWithoutModification)?;
        flat.add_node(10.0, 3.0, 0.0, SplineAddMethod::AddWithoutModification)?;

        let ys = CompactSpline::bulk_ys(&[rising, flat], 0.0, 5.0, 3);
        assert_eq!(ys.len(), 6);
        let expected = [0.0, 3.0, 5.0, 3.0, 10.0, 3.0];
        for (y, e) in ys.iter().zip(expected) {
            assert!(close(*y, e, 1e-2), "{ys:?}");
        }
        Ok(())
    }

    #[test]
    fn test_recommend_x_granularity() {
        assert!(close(CompactSpline::recommend_x_granularity(65_535.0), 1.0, 1e-6));
        assert!(close(CompactSpline::recommend_x_granularity(0.0), 1.0, 1e-6));
    }

    #[test]
    fn test_verbatim_and_clear() {
        let mut spline = CompactSpline::default();
        spline.add_node_verbatim(0, 0, 0);
        spline.add_node_verbatim(4, MAX_Y_RUNG, MAX_ANGLE);
        assert_eq!(spline.num_nodes(), 2);
        assert!(close(spline.end_y(), 1.0, 1e-6));
        assert!(spline.end_derivative() > 1e6);
        spline.clear();
        assert_eq!(spline.num_nodes(), 0);
    }

    #[test]
    fn test_playback_maps_time_to_x() -> CurveResult<()> {
        let spline = ramp()?;
        let range = spline.range_x();

        let once = SplinePlayback::default();
        assert!(close(once.x_at(&range, 4.0), 4.0, 1e-6));
        assert!(close(once.x_at(&range, 25.0), range.end(), 1e-6));

        let looping = SplinePlayback::new(0.0, 1.0, true);
        assert!(close(looping.x_at(&range, 13.0), 3.0, 1e-2));

        let slow = SplinePlayback::new(2.0, 0.5, false);
        assert!(close(slow.x_at(&range, 4.0), 4.0, 1e-6));

        let ys = slow.evaluate(&[spline.clone(), spline], 4.0);
        assert_eq!(ys.len(), 2);
        assert!(ys.iter().all(|y| close(*y, 4.0, 1e-2)));
        Ok(())
    }

    #[test]
    fn test_playback_defaults_from_json() -> Result<(), serde_json::Error> {
        let playback: SplinePlayback = serde_json::from_str(r#"{"repeat":true}"#)?;
        assert_eq!(playback, SplinePlayback::new(0.0, 1.0, true));
        Ok(())
    }
}
