//! Synthetic forecast grids and viewport helpers shared by tests.

use chrono::{TimeZone, Utc};
use wind_common::{ForecastRecord, GridHeader, U_COMPONENT, V_COMPONENT, WIND_CATEGORY};

/// One-degree grid anchored at lon 0 with its first row at the north edge,
/// so cell (i, j) sits at lon `i`, lat `ny - 1 - j`.
pub fn header(nx: usize, ny: usize, parameter_number: u8, forecast_time: u32) -> GridHeader {
    GridHeader {
        lo1: 0.0,
        la1: (ny - 1) as f64,
        dx: 1.0,
        dy: 1.0,
        nx,
        ny,
        ref_time: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        forecast_time,
        parameter_category: WIND_CATEGORY,
        parameter_number,
    }
}

/// Interleaved u/v record pairs from explicit per-frame data, at 3-hour
/// forecast offsets.
pub fn records_from_frames(
    nx: usize,
    ny: usize,
    u_frames: Vec<Vec<f32>>,
    v_frames: Vec<Vec<f32>>,
) -> Vec<ForecastRecord> {
    let mut records = Vec::new();
    for (f, (u, v)) in u_frames.into_iter().zip(v_frames).enumerate() {
        let hours = (f * 3) as u32;
        records.push(ForecastRecord {
            header: header(nx, ny, U_COMPONENT, hours),
            data: u,
        });
        records.push(ForecastRecord {
            header: header(nx, ny, V_COMPONENT, hours),
            data: v,
        });
    }
    records
}

/// `frames` record pairs of spatially uniform wind.
pub fn uniform_records(nx: usize, ny: usize, frames: usize, u: f32, v: f32) -> Vec<ForecastRecord> {
    records_from_frames(
        nx,
        ny,
        vec![vec![u; nx * ny]; frames],
        vec![vec![v; nx * ny]; frames],
    )
}

/// Canvas height matching the Mercator aspect of `extent_deg` at `width`
/// pixels, so projection and inversion agree on both axes.
pub fn viewport_height(extent_deg: [[f64; 2]; 2], width: u32) -> u32 {
    let [[west, south], [east, north]] = extent_deg;
    let lon_span = (east - west).to_radians();
    let radius = width as f64 / lon_span;
    let merc_y = |lat_deg: f64| {
        let lat = lat_deg.to_radians();
        (lat / 2.0 + std::f64::consts::FRAC_PI_4).tan().ln()
    };
    (radius * (merc_y(north) - merc_y(south))).round() as u32
}
