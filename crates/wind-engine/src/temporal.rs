//! Temporal interpolation over per-frame wind component grids.

use std::cell::Cell;
use std::sync::Arc;

/// The full u/v component frame series, shared by every cell sampler.
///
/// `steps` is the total number of discrete animation steps spread across the
/// series; fractional times are normalized into it before blending.
#[derive(Debug)]
pub struct FrameSeries {
    u_frames: Vec<Vec<f32>>,
    v_frames: Vec<Vec<f32>>,
    steps: f64,
}

impl FrameSeries {
    /// Both component series must be equal length; callers validate that
    /// before construction (see `SpatialField::from_records`).
    pub fn new(u_frames: Vec<Vec<f32>>, v_frames: Vec<Vec<f32>>, steps: u32) -> Self {
        debug_assert_eq!(u_frames.len(), v_frames.len());
        Self { u_frames, v_frames, steps: steps as f64 }
    }

    pub fn frame_count(&self) -> usize {
        self.u_frames.len()
    }

    /// Temporal blend position for fractional time `t`: earlier frame index,
    /// later frame index (clamped to the last frame), and the blend weights
    /// on the later and earlier frame respectively.
    fn progress(&self, t: f64) -> (usize, usize, f64, f64) {
        let frames = self.u_frames.len();
        let p = t.rem_euclid(self.steps) / self.steps * (frames as f64 - 1.0);
        let p0 = p.floor() as usize;
        let p1 = p - p0 as f64;
        let q = if p0 + 1 >= frames { p0 } else { p0 + 1 };
        (p0, q, p1, 1.0 - p1)
    }
}

/// Time-parameterized (u, v) sampler for one flat grid index.
///
/// Holds a single-slot memo of the last queried time: during a tick every
/// particle queries at the same `t`, so repeated lookups hit the slot.
#[derive(Debug, Clone)]
pub struct CellSampler {
    series: Arc<FrameSeries>,
    index: usize,
    cache: Cell<Option<(f64, [f64; 2])>>,
}

impl CellSampler {
    pub fn new(series: Arc<FrameSeries>, index: usize) -> Self {
        Self { series, index, cache: Cell::new(None) }
    }

    /// Linearly blended (u, v) at fractional time `t`.
    pub fn sample(&self, t: f64) -> [f64; 2] {
        if let Some((last_t, value)) = self.cache.get() {
            if last_t == t {
                return value;
            }
        }

        let (p0, q, p1, p2) = self.series.progress(t);
        let i = self.index;
        let value = [
            self.series.u_frames[p0][i] as f64 * p2 + self.series.u_frames[q][i] as f64 * p1,
            self.series.v_frames[p0][i] as f64 * p2 + self.series.v_frames[q][i] as f64 * p1,
        ];
        self.cache.set(Some((t, value)));
        value
    }
}
