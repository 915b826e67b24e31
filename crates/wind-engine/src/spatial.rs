//! Spatially interpolable wind field over a regular lat/lon grid.

use std::sync::Arc;

use tracing::info;
use wind_common::{
    ForecastRecord, ForecastSpan, GridHeader, WindError, WindResult, WindVector,
};

use crate::temporal::{CellSampler, FrameSeries};

/// Time- and space-interpolable wind field addressed by geographic
/// coordinates, built once per dataset load.
#[derive(Debug)]
pub struct SpatialField {
    header: GridHeader,
    rows: Vec<Vec<CellSampler>>,
    wrap: bool,
    span: ForecastSpan,
}

impl SpatialField {
    /// Build from decoded forecast records.
    ///
    /// Records with parameter (2,2) form the u series and (2,3) the v series,
    /// in the order given; anything else is ignored (reserved for scalar
    /// overlays). The two series must agree on frame count, grid geometry and
    /// data length — mismatches fail fast rather than interpolating garbage.
    ///
    /// `steps` is the total number of animation steps across the series.
    pub fn from_records(records: &[ForecastRecord], steps: u32) -> WindResult<Self> {
        let u: Vec<&ForecastRecord> = records.iter().filter(|r| r.is_u_component()).collect();
        let v: Vec<&ForecastRecord> = records.iter().filter(|r| r.is_v_component()).collect();

        if u.is_empty() {
            return Err(WindError::MissingComponent("u (parameter 2,2)"));
        }
        if v.is_empty() {
            return Err(WindError::MissingComponent("v (parameter 2,3)"));
        }
        if u.len() != v.len() {
            return Err(WindError::ComponentMismatch(format!(
                "{} u frames vs {} v frames",
                u.len(),
                v.len()
            )));
        }

        let header = u[0].header.clone();
        if header.is_empty() {
            return Err(WindError::EmptyGrid(format!(
                "{}x{} grid has no points",
                header.nx, header.ny
            )));
        }

        for (frame, (ur, vr)) in u.iter().zip(v.iter()).enumerate() {
            if !ur.header.same_geometry(&header) || !vr.header.same_geometry(&header) {
                return Err(WindError::ComponentMismatch(format!(
                    "frame {} grid geometry differs from frame 0",
                    frame
                )));
            }
            if ur.data.len() != header.len() || vr.data.len() != header.len() {
                return Err(WindError::ComponentMismatch(format!(
                    "frame {} data length {}/{} does not match {}x{} grid",
                    frame,
                    ur.data.len(),
                    vr.data.len(),
                    header.nx,
                    header.ny
                )));
            }
        }

        let span = ForecastSpan::new(
            u[0].header.valid_datetime(),
            u[u.len() - 1].header.valid_datetime(),
        );

        let series = Arc::new(FrameSeries::new(
            u.iter().map(|r| r.data.clone()).collect(),
            v.iter().map(|r| r.data.clone()).collect(),
            steps,
        ));

        // A grid spanning the full circle gets its first column duplicated as
        // a virtual last column, so interpolation across the seam just works.
        let wrap = (header.nx as f64 * header.dx).floor() >= 360.0;

        let mut rows = Vec::with_capacity(header.ny);
        for j in 0..header.ny {
            let mut row: Vec<CellSampler> = (0..header.nx)
                .map(|i| CellSampler::new(series.clone(), header.flat_index(i, j)))
                .collect();
            if wrap {
                row.push(CellSampler::new(series.clone(), header.flat_index(0, j)));
            }
            rows.push(row);
        }

        info!(
            nx = header.nx,
            ny = header.ny,
            frames = u.len(),
            wrap_continuous = wrap,
            "built spatial wind field"
        );

        Ok(Self { header, rows, wrap, span })
    }

    pub fn header(&self) -> &GridHeader {
        &self.header
    }

    /// Wall-clock span covered by the series.
    pub fn span(&self) -> ForecastSpan {
        self.span
    }

    pub fn is_wrap_continuous(&self) -> bool {
        self.wrap
    }

    fn cell(&self, j: isize, i: isize) -> Option<&CellSampler> {
        if j < 0 || i < 0 {
            return None;
        }
        self.rows.get(j as usize)?.get(i as usize)
    }

    /// Bilinearly interpolated wind at (lon, lat) in degrees and fractional
    /// time `t`. `None` unless all four surrounding cells exist and yield
    /// finite samples; the top row pair is checked before the bottom pair so
    /// an uncovered query bails out early.
    pub fn interpolate(&self, lon: f64, lat: f64, t: f64) -> Option<WindVector> {
        let i = floor_mod(lon - self.header.lo1, 360.0) / self.header.dx;
        let j = (self.header.la1 - lat) / self.header.dy;

        let fi = i.floor();
        let fj = j.floor();
        let (fi_i, fj_i) = (fi as isize, fj as isize);

        let g00 = sample_finite(self.cell(fj_i, fi_i)?, t)?;
        let g10 = sample_finite(self.cell(fj_i, fi_i + 1)?, t)?;
        let g01 = sample_finite(self.cell(fj_i + 1, fi_i)?, t)?;
        let g11 = sample_finite(self.cell(fj_i + 1, fi_i + 1)?, t)?;

        Some(bilinear(i - fi, j - fj, g00, g10, g01, g11))
    }
}

/// Remainder of floored division; keeps longitude offsets in [0, 360) for
/// negative inputs too.
fn floor_mod(a: f64, n: f64) -> f64 {
    a - n * (a / n).floor()
}

fn sample_finite(cell: &CellSampler, t: f64) -> Option<[f64; 2]> {
    let s = cell.sample(t);
    if s[0].is_finite() && s[1].is_finite() {
        Some(s)
    } else {
        None
    }
}

/// Standard 4-corner bilinear blend of (u, v) pairs at fractional offsets
/// (x, y) from the top-left corner.
fn bilinear(x: f64, y: f64, g00: [f64; 2], g10: [f64; 2], g01: [f64; 2], g11: [f64; 2]) -> WindVector {
    let rx = 1.0 - x;
    let ry = 1.0 - y;
    let (a, b, c, d) = (rx * ry, x * ry, rx * y, x * y);
    let u = g00[0] * a + g10[0] * b + g01[0] * c + g11[0] * d;
    let v = g00[1] * a + g10[1] * b + g01[1] * c + g11[1] * d;
    WindVector::new(u, v)
}
