//! Parameter types for width-set generation.
//!
//! These structs describe *which* widths a caller wants, not how they are
//! computed. They are the interface between request handling and the
//! [`WidthSetGenerator`](super::WidthSetGenerator).
//!
//! ## Types
//!
//! - [`Tolerance`]: validated ladder tolerance (finite, > 0, default 0.08).
//! - [`WidthBounds`]: min/max bounds, explicit widths, tolerance override.
//! - [`BaseDimensions`]: the rendered size, for aspect ratio and 1×/2×/3× widths.

use crate::config::DEFAULT_WIDTH_TOLERANCE;
use crate::error::{Error, Result};
use crate::types::Params;

/// Ladder tolerance: the largest relative over- or under-fetch accepted
/// between two neighbouring widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(f64);

impl Tolerance {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidArgument(format!(
                "width tolerance must be greater than 0, got {value}"
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Step factor between neighbouring ladder widths.
    pub fn factor(self) -> f64 {
        1.0 + 2.0 * self.0
    }

    /// Cache key: the exact bit pattern, so `0.08` and `0.080000001` differ.
    pub(crate) fn key(self) -> u64 {
        self.0.to_bits()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(DEFAULT_WIDTH_TOLERANCE)
    }
}

/// Request-time overrides for a width srcset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidthBounds {
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    /// Explicit widths, used verbatim and in the given order.
    pub widths: Option<Vec<u32>>,
    /// Overrides the configured tolerance for this request.
    pub tolerance: Option<f64>,
}

impl WidthBounds {
    pub fn between(min_width: u32, max_width: u32) -> Self {
        Self {
            min_width: Some(min_width),
            max_width: Some(max_width),
            ..Self::default()
        }
    }

    pub fn explicit(widths: Vec<u32>) -> Self {
        Self {
            widths: Some(widths),
            ..Self::default()
        }
    }

    /// The tolerance to use: this request's override, else `fallback`.
    pub fn tolerance_or(&self, fallback: Tolerance) -> Result<Tolerance> {
        self.tolerance.map_or(Ok(fallback), Tolerance::new)
    }

    /// Whether `min_width > max_width` once both are given.
    pub fn is_inverted(&self) -> bool {
        matches!((self.min_width, self.max_width), (Some(min), Some(max)) if min > max)
    }
}

/// Size the image is rendered at, when fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl BaseDimensions {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self { width, height }
    }

    /// Read `w`/`h` out of request params. Non-integer values are ignored.
    pub fn from_params(params: &Params) -> Self {
        let dim = |key: &str| params.get(key).and_then(|v| v.parse::<u32>().ok());
        Self {
            width: dim("w"),
            height: dim("h"),
        }
    }

    /// `height / width`, when both are known and the width is non-zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 => Some(h as f64 / w as f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_rejects_non_positive_values() {
        assert!(Tolerance::new(0.0).is_err());
        assert!(Tolerance::new(-0.1).is_err());
        assert!(Tolerance::new(f64::NAN).is_err());
        assert!(Tolerance::new(f64::INFINITY).is_err());
        assert!(matches!(Tolerance::new(0.0), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn tolerance_default_is_eight_percent() {
        assert_eq!(Tolerance::default().value(), 0.08);
        assert_eq!(Tolerance::default().factor(), 1.16);
    }

    #[test]
    fn bounds_tolerance_falls_back() {
        let fallback = Tolerance::new(0.1).unwrap();
        assert_eq!(WidthBounds::default().tolerance_or(fallback).unwrap(), fallback);

        let bounds = WidthBounds {
            tolerance: Some(0.2),
            ..WidthBounds::default()
        };
        assert_eq!(bounds.tolerance_or(fallback).unwrap().value(), 0.2);

        let bad = WidthBounds {
            tolerance: Some(0.0),
            ..WidthBounds::default()
        };
        assert!(bad.tolerance_or(fallback).is_err());
    }

    #[test]
    fn inverted_bounds_detected() {
        assert!(WidthBounds::between(500, 100).is_inverted());
        assert!(!WidthBounds::between(100, 500).is_inverted());
        assert!(!WidthBounds::default().is_inverted());
    }

    #[test]
    fn base_dimensions_from_params() {
        let params = Params::from([
            ("w".to_string(), "600".to_string()),
            ("h".to_string(), "300".to_string()),
        ]);
        let base = BaseDimensions::from_params(&params);
        assert_eq!(base, BaseDimensions::new(Some(600), Some(300)));
        assert_eq!(base.aspect_ratio(), Some(0.5));
    }

    #[test]
    fn base_dimensions_ignore_non_integers() {
        let params = Params::from([("w".to_string(), "wide".to_string())]);
        assert_eq!(BaseDimensions::from_params(&params), BaseDimensions::default());
    }

    #[test]
    fn aspect_ratio_needs_both_dimensions() {
        assert_eq!(BaseDimensions::new(Some(600), None).aspect_ratio(), None);
        assert_eq!(BaseDimensions::new(Some(0), Some(300)).aspect_ratio(), None);
    }
}
