//! Viewport Mercator projection.
//!
//! Maps geographic coordinates onto the pixel rectangle of the current map
//! viewport, the way slippy-map libraries lay out their tiles. Because the
//! projection is conformal but not equal-area, a wind vector's geographic
//! direction is not its screen direction: `distortion` estimates the local
//! Jacobian of the projection by finite differencing, and `distort` applies
//! it so streaks point the right way all the way up to high latitudes.

use std::f64::consts::PI;

use wind_common::{FieldVector, MapExtent, WindVector};

/// Finite-difference step (degrees) for distortion probing: 10^-5.2,
/// small enough to stay local, large enough to survive f64 rounding.
const PROBE_STEP: f64 = 6.309_573_444_801_93e-6;

/// Mercator projection parameterized by the current map viewport.
///
/// Pure functions over an immutable extent; `y` grows southward to match
/// canvas pixel coordinates.
#[derive(Debug, Clone)]
pub struct Mercator {
    extent: MapExtent,
}

impl Mercator {
    pub fn new(extent: MapExtent) -> Self {
        Self { extent }
    }

    pub fn extent(&self) -> &MapExtent {
        &self.extent
    }

    /// Mercator ordinate for a latitude in radians.
    fn merc_y(lat: f64) -> f64 {
        (lat / 2.0 + PI / 4.0).tan().ln()
    }

    /// Forward projection of (lat, lon) in degrees to viewport pixels.
    pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        let y_min = Self::merc_y(self.extent.south);
        let y_max = Self::merc_y(self.extent.north);
        let x_factor = self.extent.width as f64 / self.extent.lon_span();
        let y_factor = self.extent.height as f64 / (y_max - y_min);

        let x = (lon.to_radians() - self.extent.west) * x_factor;
        let y = (y_max - Self::merc_y(lat.to_radians())) * y_factor;
        (x, y)
    }

    /// Inverse projection of a viewport pixel back to (lon, lat) in degrees.
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let lon_span_deg = self.extent.lon_span().to_degrees();
        let world_radius = self.extent.width as f64 / lon_span_deg * 360.0 / (2.0 * PI);
        let offset_y = world_radius / 2.0
            * ((1.0 + self.extent.south.sin()) / (1.0 - self.extent.south.sin())).ln();
        let equator_y = self.extent.height as f64 + offset_y;
        let a = (equator_y - y) / world_radius;

        let lat = (2.0 * a.exp().atan() - PI / 2.0).to_degrees();
        let lon = self.extent.west.to_degrees() + x / self.extent.width as f64 * lon_span_deg;
        (lon, lat)
    }

    /// Local Jacobian of the projection at (lon, lat), estimated by
    /// perturbing each coordinate by a small step signed toward the interior
    /// (so the probe never crosses a pole or the date line).
    ///
    /// The base point is re-projected here rather than taken from the
    /// caller: the difference is divided by the tiny probe step, so even a
    /// sub-pixel mismatch between a stored pixel coordinate and `project`
    /// would blow up into a displacement of hundreds of pixels.
    ///
    /// The longitudinal terms are divided by cos(lat), the meridian scale
    /// factor (Snyder, eq. 4-3, with R = 1): the length of one degree of
    /// longitude shrinks with latitude, and without this correction vectors
    /// pinch toward the poles.
    ///
    /// Returns `[a, b, c, d]` such that a geographic vector (u, v) maps to
    /// the screen displacement `(a*u + c*v, b*u + d*v)`.
    pub fn distortion(&self, lon: f64, lat: f64) -> [f64; 4] {
        let h_lon = if lon < 0.0 { PROBE_STEP } else { -PROBE_STEP };
        let h_lat = if lat < 0.0 { PROBE_STEP } else { -PROBE_STEP };

        let (x, y) = self.project(lat, lon);
        let (p_lon_x, p_lon_y) = self.project(lat, lon + h_lon);
        let (p_lat_x, p_lat_y) = self.project(lat + h_lat, lon);

        let k = lat.to_radians().cos();
        [
            (p_lon_x - x) / h_lon / k,
            (p_lon_y - y) / h_lon / k,
            (p_lat_x - x) / h_lat,
            (p_lat_y - y) / h_lat,
        ]
    }

    /// Map a geographic wind vector into a screen-space displacement at
    /// (lon, lat), scaling velocity first. The geographic magnitude rides
    /// along unchanged for intensity bucketing. `None` wind stays `None`.
    pub fn distort(
        &self,
        lon: f64,
        lat: f64,
        velocity_scale: f64,
        wind: Option<WindVector>,
    ) -> Option<FieldVector> {
        let wind = wind?;
        let u = wind.u * velocity_scale;
        let v = wind.v * velocity_scale;
        let d = self.distortion(lon, lat);

        Some(FieldVector {
            dx: d[0] * u + d[2] * v,
            dy: d[1] * u + d[3] * v,
            magnitude: wind.magnitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wind_common::MapExtent;

    /// Viewport whose pixel aspect matches the Mercator aspect of the extent,
    /// like a real slippy-map view.
    fn extent() -> MapExtent {
        // 60 deg of longitude at 600 px wide; height chosen so vertical and
        // horizontal pixel scales agree (round(R * (mercY(45) - mercY(-45)))).
        MapExtent::from_degrees([[-30.0, -45.0], [30.0, 45.0]], 600, 1010)
    }

    #[test]
    fn test_project_equator_centered() {
        let proj = Mercator::new(extent());
        let (x, y) = proj.project(0.0, 0.0);
        assert!((x - 300.0).abs() < 0.5, "x should be ~300, got {}", x);
        assert!((y - 505.0).abs() < 0.5, "y should be ~505, got {}", y);
    }

    #[test]
    fn test_project_y_grows_southward() {
        let proj = Mercator::new(extent());
        let (_, y_north) = proj.project(20.0, 0.0);
        let (_, y_south) = proj.project(-20.0, 0.0);
        assert!(y_north < y_south);
    }

    #[test]
    fn test_roundtrip_interior_points() {
        let proj = Mercator::new(extent());

        for &(lat, lon) in &[(20.0, 10.0), (-35.0, -25.0), (0.0, 29.0), (44.0, -29.0)] {
            let (x, y) = proj.project(lat, lon);
            let (lon2, lat2) = proj.invert(x, y);
            assert!((lon2 - lon).abs() < 1e-6, "lon roundtrip: {} vs {}", lon, lon2);
            assert!((lat2 - lat).abs() < 0.01, "lat roundtrip: {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_distortion_axes_at_equator() {
        let proj = Mercator::new(extent());
        let [a, b, c, d] = proj.distortion(0.0, 0.0);

        // Longitude moves pixels east only, latitude moves pixels up only.
        assert!(a > 0.0, "a should be positive, got {}", a);
        assert!(b.abs() < 1e-6, "b should be ~0, got {}", b);
        assert!(c.abs() < 1e-6, "c should be ~0, got {}", c);
        assert!(d < 0.0, "d should be negative (y grows south), got {}", d);
    }

    #[test]
    fn test_distortion_meridian_correction() {
        let proj = Mercator::new(extent());

        // Without the cos(lat) correction the longitudinal term would shrink
        // at high latitude; with it, it grows with the Mercator stretch.
        let a_equator = proj.distortion(0.0, 0.0)[0];
        let a_high = proj.distortion(0.0, 40.0)[0];

        assert!(
            a_high > a_equator,
            "corrected longitudinal scale should grow with latitude: {} vs {}",
            a_high,
            a_equator
        );
    }

    #[test]
    fn test_distort_preserves_magnitude_and_nulls() {
        let proj = Mercator::new(extent());

        let out = proj.distort(10.0, 10.0, 0.011, Some(WindVector::new(3.0, 4.0)));
        let out = out.expect("wind over the viewport should distort to Some");
        assert!((out.magnitude - 5.0).abs() < 1e-12);

        assert!(proj.distort(10.0, 10.0, 0.011, None).is_none());
    }

    #[test]
    fn test_distort_eastward_wind_moves_east() {
        let proj = Mercator::new(extent());
        let out = proj
            .distort(0.0, 0.0, 0.011, Some(WindVector::new(1.0, 0.0)))
            .unwrap();
        assert!(out.dx > 0.0);
        assert!(out.dy.abs() < 1e-6);
    }

    #[test]
    fn test_distortion_stable_on_rounded_viewport_height() {
        // Integer pixel heights are never exactly conformal to the extent.
        // The Jacobian must stay self-consistent anyway: an eastward wind
        // produces a sub-pixel eastward step with no vertical drift.
        let e = MapExtent::from_degrees([[2.0, 2.0], [7.0, 7.0]], 200, 201);
        let proj = Mercator::new(e);

        let out = proj
            .distort(4.5, 4.5, 0.011, Some(WindVector::new(1.0, 0.0)))
            .unwrap();
        assert!(out.dx > 0.0 && out.dx < 1.0, "dx should be sub-pixel, got {}", out.dx);
        assert!(out.dy.abs() < 1e-3, "eastward wind must not drift vertically, dy = {}", out.dy);
    }
}
