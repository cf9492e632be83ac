//! Bounding box types and operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A projected bounding box (eastings/northings in metres for the UK
/// composites, but any planar units work).
///
/// Fields use the same units as the raster header elements 34-37.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a bounding box from the argument order used by NIMROD tooling:
    /// `xmin, xmax, ymin, ymax`.
    pub fn from_extent(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self::new(xmin, ymin, xmax, ymax)
    }

    /// Parse a bounding box string: "xmin,xmax,ymin,ymax"
    pub fn from_extent_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| BboxParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self::from_extent(values[0], values[1], values[2], values[3]))
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if `other` lies entirely inside this box (edges inclusive).
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x {}..{}, y {}..{}",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bounding box format: {0}. Expected 'xmin,xmax,ymin,ymax'")]
    InvalidFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extent_string() {
        let bbox = BoundingBox::from_extent_string("355000,440000,534000,609000").unwrap();
        assert_eq!(bbox.min_x, 355000.0);
        assert_eq!(bbox.max_x, 440000.0);
        assert_eq!(bbox.min_y, 534000.0);
        assert_eq!(bbox.max_y, 609000.0);
    }

    #[test]
    fn test_parse_extent_string_with_spaces() {
        let bbox = BoundingBox::from_extent_string(" -1.5, 2.5 ,3,4 ").unwrap();
        assert_eq!(bbox, BoundingBox::new(-1.5, 3.0, 2.5, 4.0));
    }

    #[test]
    fn test_parse_extent_string_errors() {
        assert!(matches!(
            BoundingBox::from_extent_string("1,2,3"),
            Err(BboxParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            BoundingBox::from_extent_string("1,2,north,4"),
            Err(BboxParseError::InvalidNumber(n)) if n == "north"
        ));
    }

    #[test]
    fn test_parse_extent_string_rejects_non_finite() {
        for text in ["nan,nan,nan,nan", "0,inf,0,10", "0,10,-inf,10", "0,10,0,NaN"] {
            assert!(
                matches!(
                    BoundingBox::from_extent_string(text),
                    Err(BboxParseError::InvalidNumber(_))
                ),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_contains() {
        let outer = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let inner = BoundingBox::new(2.0, 2.0, 10.0, 8.0);
        let overlapping = BoundingBox::new(5.0, 5.0, 15.0, 15.0);

        assert!(outer.contains(&inner));
        assert!(!outer.contains(&overlapping));
        assert!(outer.contains_point(10.0, 0.0));
        assert_eq!(outer.width(), 10.0);
        assert_eq!(inner.height(), 6.0);
    }
}
