//! Pixel render bounds and the geographic map viewport.

use serde::{Deserialize, Serialize};

/// Visible render region within the full canvas extent, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Bounds {
    /// Build render bounds from `[[x0, y0], [x1, y1]]` pixel corners and the
    /// canvas size. The upper-left corner is rounded in, the lower-right is
    /// rounded out and clamped to the canvas; `x_max` spans the full canvas
    /// width so column construction covers every visible column.
    pub fn from_corners(upper_left: [f64; 2], lower_right: [f64; 2], width: u32, height: u32) -> Self {
        let x = upper_left[0].round() as i32;
        let y = upper_left[1].floor().max(0.0) as i32;
        let y_max = (lower_right[1].ceil() as i32).min(height as i32 - 1);
        Self { x, y, width, height, x_max: width as i32, y_max }
    }

    /// Bounds covering an entire canvas.
    pub fn full_canvas(width: u32, height: u32) -> Self {
        Self::from_corners([0.0, 0.0], [width as f64, height as f64], width, height)
    }
}

/// Geographic viewport used for projection.
///
/// Angles are in radians; `width`/`height` are the viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapExtent {
    pub south: f64,
    pub north: f64,
    pub east: f64,
    pub west: f64,
    pub width: u32,
    pub height: u32,
}

impl MapExtent {
    /// Build from a degree extent `[[west, south], [east, north]]` plus the
    /// viewport pixel size.
    pub fn from_degrees(extent: [[f64; 2]; 2], width: u32, height: u32) -> Self {
        Self {
            west: extent[0][0].to_radians(),
            south: extent[0][1].to_radians(),
            east: extent[1][0].to_radians(),
            north: extent[1][1].to_radians(),
            width,
            height,
        }
    }

    /// Longitudinal span in radians.
    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_clamp_to_canvas() {
        let b = Bounds::from_corners([10.4, -3.0], [500.0, 500.0], 400, 300);
        assert_eq!(b.x, 10);
        assert_eq!(b.y, 0);
        assert_eq!(b.x_max, 400);
        assert_eq!(b.y_max, 299);
        assert_eq!(b.width, 400);
        assert_eq!(b.height, 300);
    }

    #[test]
    fn test_extent_from_degrees() {
        let e = MapExtent::from_degrees([[-30.0, -45.0], [30.0, 45.0]], 600, 600);
        assert!((e.west + 30f64.to_radians()).abs() < 1e-12);
        assert!((e.north - 45f64.to_radians()).abs() < 1e-12);
        assert!((e.lon_span() - 60f64.to_radians()).abs() < 1e-12);
    }
}
