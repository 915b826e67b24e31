//! Decoded forecast records for wind component data.
//!
//! Records arrive already decoded from their wire format; this crate never
//! parses GRIB or NetCDF itself. A record is one frame of one scalar
//! component on a regular lat/lon grid, row-major with longitude varying
//! fastest (scan mode 0: longitude increases from `lo1`, latitude decreases
//! from `la1`).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// GRIB2 parameter category for momentum.
pub const WIND_CATEGORY: u8 = 2;
/// Parameter number of the u (eastward) wind component.
pub const U_COMPONENT: u8 = 2;
/// Parameter number of the v (northward) wind component.
pub const V_COMPONENT: u8 = 3;

/// Header describing one forecast frame's grid geometry and valid time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridHeader {
    /// Longitude of the grid origin in degrees (e.g. 0.0E)
    pub lo1: f64,
    /// Latitude of the grid origin in degrees (e.g. 90.0N)
    pub la1: f64,
    /// Longitude spacing between grid points in degrees
    pub dx: f64,
    /// Latitude spacing between grid points in degrees
    pub dy: f64,
    /// Number of grid points W-E
    pub nx: usize,
    /// Number of grid points N-S
    pub ny: usize,
    /// Model run reference time
    pub ref_time: DateTime<Utc>,
    /// Forecast hour offset from the reference time
    pub forecast_time: u32,
    /// GRIB2 parameter category
    pub parameter_category: u8,
    /// GRIB2 parameter number within the category
    pub parameter_number: u8,
}

impl GridHeader {
    /// The wall-clock time this frame is valid for (reference + offset).
    pub fn valid_datetime(&self) -> DateTime<Utc> {
        self.ref_time + Duration::hours(self.forecast_time as i64)
    }

    /// Whether two headers describe the same grid geometry.
    pub fn same_geometry(&self, other: &GridHeader) -> bool {
        self.nx == other.nx
            && self.ny == other.ny
            && self.dx == other.dx
            && self.dy == other.dy
            && self.lo1 == other.lo1
            && self.la1 == other.la1
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }

    /// The 1D array index for grid position (i, j).
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }
}

/// One decoded forecast frame: header plus row-major scalar samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub header: GridHeader,
    pub data: Vec<f32>,
}

impl ForecastRecord {
    /// Whether this record carries the u (eastward) wind component.
    pub fn is_u_component(&self) -> bool {
        self.header.parameter_category == WIND_CATEGORY
            && self.header.parameter_number == U_COMPONENT
    }

    /// Whether this record carries the v (northward) wind component.
    pub fn is_v_component(&self) -> bool {
        self.header.parameter_category == WIND_CATEGORY
            && self.header.parameter_number == V_COMPONENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn header(category: u8, number: u8) -> GridHeader {
        GridHeader {
            lo1: 0.0,
            la1: 90.0,
            dx: 2.5,
            dy: 2.5,
            nx: 144,
            ny: 73,
            ref_time: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            forecast_time: 6,
            parameter_category: category,
            parameter_number: number,
        }
    }

    #[test]
    fn test_valid_datetime_applies_forecast_offset() {
        let h = header(WIND_CATEGORY, U_COMPONENT);
        assert_eq!(
            h.valid_datetime(),
            Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_component_classification() {
        let u = ForecastRecord { header: header(2, 2), data: vec![] };
        let v = ForecastRecord { header: header(2, 3), data: vec![] };
        let scalar = ForecastRecord { header: header(0, 0), data: vec![] };

        assert!(u.is_u_component() && !u.is_v_component());
        assert!(v.is_v_component() && !v.is_u_component());
        assert!(!scalar.is_u_component() && !scalar.is_v_component());
    }

    #[test]
    fn test_flat_index_row_major() {
        let h = header(2, 2);
        assert_eq!(h.flat_index(0, 0), 0);
        assert_eq!(h.flat_index(3, 2), 2 * 144 + 3);
    }
}
