//! Closed intervals on a number line, with modular-arithmetic helpers.
//!
//! A [`Range`] is valid when `start <= end`. An invalid range is not an
//! error: it is the representation of "no interval", and inverting the
//! invalid result of [`Range::intersect`] yields the gap between two ranges.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Scalar types that a [`Range`] can be built over.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;
    /// The value two, used for midpoints.
    const TWO: Self;

    /// Widens to `f64` for mixed-precision interpolation.
    fn to_f64(self) -> f64;

    /// Narrows from `f64`. Integer types truncate toward zero and saturate.
    fn from_f64(value: f64) -> Self;
}

/// Floating-point scalars, which additionally support modular arithmetic.
pub trait FloatScalar: Scalar + Neg<Output = Self> {
    /// Positive infinity.
    const INFINITY: Self;

    /// Largest integer value less than or equal to `self`.
    fn floor(self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty => $zero:expr, $one:expr, $two:expr);* $(;)?) => {
        $(
            impl Scalar for $ty {
                const ZERO: Self = $zero;
                const ONE: Self = $one;
                const TWO: Self = $two;

                #[inline]
                fn to_f64(self) -> f64 {
                    f64::from(self)
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_scalar! {
    f32 => 0.0, 1.0, 2.0;
    f64 => 0.0, 1.0, 2.0;
    i32 => 0, 1, 2;
    u32 => 0, 1, 2;
}

macro_rules! impl_float_scalar {
    ($($ty:ty),*) => {
        $(
            impl FloatScalar for $ty {
                const INFINITY: Self = <$ty>::INFINITY;

                #[inline]
                fn floor(self) -> Self {
                    <$ty>::floor(self)
                }

                #[inline]
                fn abs(self) -> Self {
                    <$ty>::abs(self)
                }
            }
        )*
    };
}

impl_float_scalar!(f32, f64);

/// Ways to travel between two points when values wrap around a range.
///
/// Under modular arithmetic (angles, for example) there are two paths from
/// `a` to `b`: one that goes directly and one that wraps around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ModularDirection {
    /// The shorter of the two paths.
    #[default]
    Closest,
    /// The longer of the two paths.
    Farthest,
    /// Whichever path has a non-negative difference.
    Positive,
    /// Whichever path has a negative difference.
    Negative,
    /// `b - a`, ignoring wrap-around entirely.
    Direct,
}

/// An interval `[start, end]` on a number line.
///
/// Most operations are only meaningful for valid ranges (`start <= end`);
/// on invalid ranges they return unspecified values but never panic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    start: T,
    end: T,
}

/// Range over `f32`, the common case for animation values.
pub type RangeF32 = Range<f32>;
/// Range over `f64`.
pub type RangeF64 = Range<f64>;
/// Range over `i32`.
pub type RangeI32 = Range<i32>;
/// Range over `u32`.
pub type RangeU32 = Range<u32>;

impl<T: Scalar> Default for Range<T> {
    /// The invalid range `(1, 0)`.
    fn default() -> Self {
        Self {
            start: T::ONE,
            end: T::ZERO,
        }
    }
}

impl<T: Scalar> Range<T> {
    /// Create a range. No ordering is enforced; see [`Range::create_valid`].
    #[inline]
    pub const fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    /// Create a valid range with the lower of `a` and `b` as start.
    pub fn create_valid(a: T, b: T) -> Self {
        if b < a { Self::new(b, a) } else { Self::new(a, b) }
    }

    /// Start of the range.
    #[inline]
    pub fn start(&self) -> T {
        self.start
    }

    /// End of the range (inclusive).
    #[inline]
    pub fn end(&self) -> T {
        self.end
    }

    /// Overwrite the start of the range.
    pub fn set_start(&mut self, start: T) {
        self.start = start;
    }

    /// Overwrite the end of the range.
    pub fn set_end(&mut self, end: T) {
        self.end = end;
    }

    /// A range is valid if it contains at least one number.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Mid-point of the range, rounded toward zero for integers.
    #[inline]
    pub fn middle(&self) -> T {
        (self.start + self.end) / T::TWO
    }

    /// Span of the range. Zero when the range holds exactly one number.
    #[inline]
    pub fn length(&self) -> T {
        self.end - self.start
    }

    /// `x` if inside the range, otherwise whichever bound is closer.
    #[inline]
    pub fn clamp(&self, x: T) -> T {
        self.clamp_before_end(self.clamp_after_start(x))
    }

    /// Clamp `x` against the start bound only.
    #[inline]
    pub fn clamp_after_start(&self, x: T) -> T {
        if x < self.start { self.start } else { x }
    }

    /// Clamp `x` against the end bound only.
    #[inline]
    pub fn clamp_before_end(&self, x: T) -> T {
        if x > self.end { self.end } else { x }
    }

    /// Distance from `x` to the nearest point of the range; zero inside it.
    pub fn distance_from(&self, x: T) -> T {
        if x < self.start {
            self.start - x
        } else if x > self.end {
            x - self.end
        } else {
            T::ZERO
        }
    }

    /// Interpolate from start (`percent == 0`) to end (`percent == 1`).
    pub fn lerp(&self, percent: f32) -> T {
        let start = self.start.to_f64();
        let end = self.end.to_f64();
        T::from_f64(start + (end - start) * f64::from(percent))
    }

    /// Where `x` sits between start (0) and end (1). Not clamped.
    ///
    /// `-1` means `start - length()`, `0.5` means [`Range::middle`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn percent(&self, x: T) -> f32 {
        let start = self.start.to_f64();
        ((x.to_f64() - start) / (self.end.to_f64() - start)) as f32
    }

    /// [`Range::percent`] clamped to `[0, 1]`.
    pub fn percent_clamped(&self, x: T) -> f32 {
        self.percent(x).clamp(0.0, 1.0)
    }

    /// Inclusive membership test.
    #[inline]
    pub fn contains(&self, x: T) -> bool {
        self.start <= x && x <= self.end
    }

    /// Swap start and end.
    ///
    /// When `a` and `b` don't overlap, inverting `Range::intersect(a, b)`
    /// gives the gap between them.
    #[inline]
    pub fn invert(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// A range `percent` longer, grown equally on both sides. Values below
    /// zero shrink the range.
    pub fn lengthen(&self, percent: f32) -> Self {
        let extra = self.length().to_f64() * f64::from(percent) * 0.5;
        Self::new(
            T::from_f64(self.start.to_f64() - extra),
            T::from_f64(self.end.to_f64() + extra),
        )
    }

    /// Smallest range containing both `self` and `x`.
    pub fn include(&self, x: T) -> Self {
        Self::new(
            if x < self.start { x } else { self.start },
            if x > self.end { x } else { self.end },
        )
    }

    /// Overlap of `a` and `b`, or an invalid range if they are disjoint.
    pub fn intersect(a: &Self, b: &Self) -> Self {
        // start = max of starts, end = min of ends covers every arrangement
        // of the two ranges, including the disjoint ones.
        Self::new(
            if a.start > b.start { a.start } else { b.start },
            if a.end < b.end { a.end } else { b.end },
        )
    }

    /// Intersect every range of `a` with every range of `b`, row-major over
    /// `(a, b)`, keeping only the non-empty intersections.
    pub fn intersect_ranges(a: &[Self], b: &[Self]) -> Vec<Self> {
        a.iter()
            .flat_map(|ra| b.iter().map(move |rb| Self::intersect(ra, rb)))
            .filter(Self::is_valid)
            .collect()
    }

    /// Like [`Range::intersect_ranges`], also returning the gaps between
    /// every disjoint pair (as valid ranges) in a second list.
    pub fn intersect_ranges_with_gaps(a: &[Self], b: &[Self]) -> (Vec<Self>, Vec<Self>) {
        let mut intersections = Vec::new();
        let mut gaps = Vec::new();
        for ra in a {
            for rb in b {
                let intersection = Self::intersect(ra, rb);
                if intersection.is_valid() {
                    intersections.push(intersection);
                } else {
                    gaps.push(intersection.invert());
                }
            }
        }
        (intersections, gaps)
    }

    /// Keep only the entries of `values` within `epsilon` of `range`,
    /// clamping the survivors into it. Returns how many were kept.
    ///
    /// Floating-point error can put a value that belongs on a boundary
    /// slightly outside it; this pulls such values back in.
    pub fn values_in_range(range: &Self, epsilon: T, values: &mut Vec<T>) -> usize {
        values.retain(|&value| range.distance_from(value) <= epsilon);
        for value in values.iter_mut() {
            *value = range.clamp(*value);
        }
        values.len()
    }

    /// Index of the longest range, or `None` if `ranges` is empty.
    ///
    /// The first of several equally long ranges wins.
    pub fn index_of_longest(ranges: &[Self]) -> Option<usize> {
        let mut best: Option<(usize, T)> = None;
        for (i, range) in ranges.iter().enumerate() {
            let length = range.length();
            if best.is_none_or(|(_, longest)| length > longest) {
                best = Some((i, length));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index of the shortest range, or `None` if `ranges` is empty.
    pub fn index_of_shortest(ranges: &[Self]) -> Option<usize> {
        let mut best: Option<(usize, T)> = None;
        for (i, range) in ranges.iter().enumerate() {
            let length = range.length();
            if best.is_none_or(|(_, shortest)| length < shortest) {
                best = Some((i, length));
            }
        }
        best.map(|(i, _)| i)
    }
}

impl<T: FloatScalar> Range<T> {
    /// The range that contains every value.
    pub fn full() -> Self {
        Self::new(-T::INFINITY, T::INFINITY)
    }

    /// The emptiest range: start above everything, end below everything.
    ///
    /// Useful as the seed when folding values with [`Range::include`].
    pub fn empty() -> Self {
        Self::new(T::INFINITY, -T::INFINITY)
    }

    /// Bring `x` into `(start, end]` by adding or subtracting `length()`.
    ///
    /// `x` must be within one `length()` of the bounds; use
    /// [`Range::normalize_wild_value`] for arbitrary inputs.
    #[inline]
    pub fn normalize(&self, x: T) -> T {
        x + self.modular_adjustment(x)
    }

    /// Bring any `x` into `(start, end]` by removing whole multiples of
    /// `length()`.
    pub fn normalize_wild_value(&self, x: T) -> T {
        let length = self.length();
        let whole_units = ((x - self.start) / length).floor();

        // Mathematically `close` is already normalized, but rounding can leave
        // it just outside a bound, so finish with the bounded normalize.
        let close = x - whole_units * length;
        close + self.modular_adjustment(close)
    }

    /// `length()` if `x` is at or below start, `-length()` if `x` is above
    /// end, otherwise zero.
    ///
    /// Debug builds assert that `x` is within one `length()` of the range.
    pub fn modular_adjustment(&self, x: T) -> T {
        let length = self.length();
        debug_assert!(
            self.start - length < x && x <= self.end + length,
            "{x:?} is more than one length from {self:?}; use normalize_wild_value"
        );
        if x <= self.start {
            length
        } else if x > self.end {
            -length
        } else {
            T::ZERO
        }
    }

    /// Shortest signed difference from `a` to `b` under modular arithmetic.
    #[inline]
    pub fn mod_diff_close(&self, a: T, b: T) -> T {
        self.normalize(b - a)
    }

    /// Longest signed difference from `a` to `b` under modular arithmetic.
    pub fn mod_diff_far(&self, a: T, b: T) -> T {
        let length = self.length();
        let close = self.mod_diff_close(a, b);
        if close >= T::ZERO { close - length } else { close + length }
    }

    /// Non-negative difference from `a` to `b` under modular arithmetic.
    pub fn mod_diff_positive(&self, a: T, b: T) -> T {
        let close = self.mod_diff_close(a, b);
        if close >= T::ZERO { close } else { close + self.length() }
    }

    /// Negative difference from `a` to `b` under modular arithmetic.
    pub fn mod_diff_negative(&self, a: T, b: T) -> T {
        let close = self.mod_diff_close(a, b);
        if close >= T::ZERO { close - self.length() } else { close }
    }

    /// Difference from `a` to `b` travelling in `direction`.
    pub fn mod_diff(&self, a: T, b: T, direction: ModularDirection) -> T {
        match direction {
            ModularDirection::Closest => self.mod_diff_close(a, b),
            ModularDirection::Farthest => self.mod_diff_far(a, b),
            ModularDirection::Positive => self.mod_diff_positive(a, b),
            ModularDirection::Negative => self.mod_diff_negative(a, b),
            ModularDirection::Direct => b - a,
        }
    }
}

impl<T: Scalar> Mul<f32> for Range<T> {
    type Output = Self;

    /// Scale both bounds.
    fn mul(self, s: f32) -> Self {
        let s = f64::from(s);
        Self::new(
            T::from_f64(self.start.to_f64() * s),
            T::from_f64(self.end.to_f64() * s),
        )
    }
}
