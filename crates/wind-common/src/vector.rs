//! Wind vector value types.
//!
//! The "no data" sentinel is modeled as `Option`: a `None` wind propagates
//! through spatial interpolation, distortion and screen-field queries without
//! ever raising an error.

use serde::{Deserialize, Serialize};

/// A wind sample in geographic space: (u, v) in m/s plus the Euclidean norm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    /// Eastward component
    pub u: f64,
    /// Northward component
    pub v: f64,
    /// Euclidean norm of (u, v)
    pub magnitude: f64,
}

impl WindVector {
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v, magnitude: u.hypot(v) }
    }
}

/// A screen-space displacement derived from a wind vector at one pixel.
///
/// `magnitude` keeps the geographic wind speed the displacement was derived
/// from; the renderer buckets by it, so projection distortion never changes
/// a particle's color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldVector {
    /// Horizontal pixel displacement per tick
    pub dx: f64,
    /// Vertical pixel displacement per tick (positive is down-screen)
    pub dy: f64,
    /// Geographic wind magnitude in m/s
    pub magnitude: f64,
}

/// A drawable streak from a particle's current position to its next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x: f64,
    pub y: f64,
    pub xt: f64,
    pub yt: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_vector_magnitude() {
        let w = WindVector::new(3.0, 4.0);
        assert!((w.magnitude - 5.0).abs() < 1e-12);
    }
}
