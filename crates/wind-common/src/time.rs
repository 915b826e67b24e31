//! Mapping between animation frames and forecast wall-clock time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock span covered by a forecast series, from the first frame's valid
/// time to the last frame's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ForecastSpan {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Linearly map a frame index in `[0, total_frames)` onto `[start, end]`.
    pub fn display_time(&self, frame: u32, total_frames: u32) -> DateTime<Utc> {
        if total_frames == 0 {
            return self.start;
        }
        let fraction = frame as f64 / total_frames as f64;
        let offset = self.duration().num_milliseconds() as f64 * fraction;
        self.start + Duration::milliseconds(offset.round() as i64)
    }
}
