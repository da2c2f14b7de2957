//! Strongly-typed numeric primitives for dialmark (zero-cost newtypes).
//!
//! - `Length`: distance in dial units, the outer boundary sits at 100.
//! - `Turn`: fractional angle on the circular domain [0, 1), 0 = 12 o'clock,
//!   increasing clockwise.
//! - `AngularRange`: a closed slice of the circular domain that never crosses
//!   the 0/1 seam (seam-crossing footprints are split into two ranges).

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::ops::Sub;

use glam::{DVec2, dvec2};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Length in dial units
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Length(pub f64);

impl Length {
    /// Create a Length with validation (rejects NaN/infinite)
    #[inline]
    pub fn try_new(val: f64) -> Result<Length, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else {
            Ok(Length(val))
        }
    }

    /// Create a non-negative Length with validation
    #[inline]
    pub fn try_non_negative(val: f64) -> Result<Length, NumericError> {
        let len = Length::try_new(val)?;
        if val < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(len)
        }
    }

    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

/// Fraction of a full revolution, always kept in [0, 1)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Turn(f64);

impl Turn {
    pub const ZERO: Turn = Turn(0.0);

    /// Wrap any finite value onto the circular domain
    #[inline]
    pub fn wrapping(val: f64) -> Turn {
        let t = val.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negative inputs
        if t >= 1.0 { Turn(0.0) } else { Turn(t) }
    }

    /// `i / n` of a turn, computed from integers so equal fractions compare equal
    #[inline]
    pub fn fraction(i: u64, n: u64) -> Turn {
        Turn::wrapping(i as f64 / n as f64)
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Screen angle in radians: turn 0 points up, turns increase clockwise
    /// (SVG y axis points down).
    #[inline]
    pub fn radians(self) -> f64 {
        self.0 * TAU - FRAC_PI_2
    }

    /// Unit vector pointing from the centre towards this turn
    #[inline]
    pub fn direction(self) -> DVec2 {
        let rad = self.radians();
        dvec2(rad.cos(), rad.sin())
    }

    /// Unit vector perpendicular to `direction`, pointing clockwise
    #[inline]
    pub fn tangent(self) -> DVec2 {
        self.direction().perp()
    }
}

/// A closed slice `[start, end]` of the circular domain with `start <= end`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngularRange {
    pub start: f64,
    pub end: f64,
}

impl AngularRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn span(self) -> f64 {
        self.end - self.start
    }

    /// Open-interval overlap: touching endpoints do not count, any shared
    /// interior (including identical or nested ranges) does.
    pub fn overlaps(self, other: AngularRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_rejects_nan_and_infinity() {
        assert_eq!(Length::try_new(f64::NAN), Err(NumericError::NaN));
        assert_eq!(Length::try_new(f64::INFINITY), Err(NumericError::Infinite));
        assert_eq!(Length::try_non_negative(-1.0), Err(NumericError::Negative));
        assert_eq!(Length::try_non_negative(2.5), Ok(Length(2.5)));
    }

    #[test]
    fn turn_wraps_onto_unit_interval() {
        assert_eq!(Turn::wrapping(1.25).raw(), 0.25);
        assert_eq!(Turn::wrapping(-0.25).raw(), 0.75);
        assert_eq!(Turn::wrapping(1.0).raw(), 0.0);
        assert_eq!(Turn::wrapping(-1e-20).raw(), 0.0);
    }

    #[test]
    fn turn_zero_points_up_and_quarter_points_right() {
        let up = Turn::ZERO.direction();
        assert!(up.x.abs() < 1e-12);
        assert!((up.y + 1.0).abs() < 1e-12);

        let right = Turn::fraction(1, 4).direction();
        assert!((right.x - 1.0).abs() < 1e-12);
        assert!(right.y.abs() < 1e-12);
    }

    #[test]
    fn tangent_is_perpendicular_to_direction() {
        for i in 0..12 {
            let t = Turn::fraction(i, 12);
            assert!(t.direction().dot(t.tangent()).abs() < 1e-12);
        }
    }

    #[test]
    fn fractions_compare_exactly() {
        assert_eq!(Turn::fraction(3, 12), Turn::fraction(1, 4));
        assert_eq!(Turn::fraction(6, 6), Turn::ZERO);
    }

    #[test]
    fn ranges_touching_do_not_overlap() {
        let a = AngularRange::new(0.1, 0.2);
        let b = AngularRange::new(0.2, 0.3);
        assert!(!a.overlaps(b));
        assert!(!b.overlaps(a));
    }

    #[test]
    fn ranges_nested_or_identical_overlap() {
        let outer = AngularRange::new(0.1, 0.5);
        let inner = AngularRange::new(0.2, 0.3);
        assert!(outer.overlaps(inner));
        assert!(inner.overlaps(outer));
        assert!(outer.overlaps(outer));
    }
}
