//! Wind-speed color scale and stroke constants.

use serde::{Deserialize, Serialize};
use wind_common::WindResult;

/// Stroke width for particle trail segments, in pixels.
pub const PARTICLE_LINE_WIDTH: f64 = 1.0;

/// Fill style painted over the whole animation layer each tick. The alpha
/// controls trail persistence: higher keeps streaks longer.
pub const FADE_FILL_STYLE: &str = "rgba(0, 0, 0, 0.95)";

/// Maps wind speed to a stroke color by linear bucketing up to a saturation
/// threshold in m/s. Speeds at or above the threshold take the last color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityScale {
    colors: Vec<String>,
    max_intensity: f64,
}

impl Default for IntensityScale {
    fn default() -> Self {
        Self {
            colors: vec![
                "rgba(0, 255, 255, 0.5)".to_string(),
                "rgba(100, 240, 255, 0.5)".to_string(),
                "rgba(135, 225, 255, 0.5)".to_string(),
                "rgba(160, 208, 255, 0.5)".to_string(),
                "rgba(181, 192, 255, 0.5)".to_string(),
                "rgba(198, 173, 255, 0.5)".to_string(),
                "rgba(212, 155, 255, 0.5)".to_string(),
                "rgba(225, 133, 255, 0.5)".to_string(),
                "rgba(236, 109, 255, 0.5)".to_string(),
                "rgba(255, 30, 219, 0.5)".to_string(),
            ],
            max_intensity: 0.75,
        }
    }
}

impl IntensityScale {
    /// Default palette with a caller-supplied saturation threshold.
    pub fn with_max_intensity(max_intensity: f64) -> Self {
        Self { max_intensity, ..Self::default() }
    }

    pub fn from_json(json: &str) -> WindResult<Self> {
        let scale: Self = serde_json::from_str(json)
            .map_err(|e| wind_common::WindError::InvalidConfig(format!("intensity scale: {}", e)))?;
        if scale.colors.is_empty() {
            return Err(wind_common::WindError::InvalidConfig(
                "intensity scale needs at least one color".into(),
            ));
        }
        Ok(scale)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> &str {
        &self.colors[index]
    }

    /// Bucket index for a wind speed: speed clamps to the threshold, then
    /// maps linearly onto the palette.
    pub fn bucket_for(&self, magnitude: f64) -> usize {
        let clamped = magnitude.min(self.max_intensity);
        (clamped / self.max_intensity * (self.colors.len() - 1) as f64).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_speed_takes_first_bucket() {
        let scale = IntensityScale::default();
        assert_eq!(scale.bucket_for(0.0), 0);
    }

    #[test]
    fn test_saturated_speed_takes_last_bucket() {
        let scale = IntensityScale::default();
        let last = scale.len() - 1;
        assert_eq!(scale.bucket_for(0.75), last);
        assert_eq!(scale.bucket_for(100.0), last);
    }

    #[test]
    fn test_buckets_are_monotone() {
        let scale = IntensityScale::with_max_intensity(10.0);
        let mut previous = 0;
        for step in 0..100 {
            let bucket = scale.bucket_for(step as f64 * 0.12);
            assert!(bucket >= previous, "bucket must not decrease with speed");
            previous = bucket;
        }
    }

    #[test]
    fn test_json_round_trip() {
        let scale = IntensityScale::with_max_intensity(12.5);
        let json = serde_json::to_string(&scale).unwrap();
        let back = IntensityScale::from_json(&json).unwrap();
        assert_eq!(back.len(), scale.len());
        assert_eq!(back.bucket_for(12.5), scale.bucket_for(12.5));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(IntensityScale::from_json("not json").is_err());
    }

    #[test]
    fn test_empty_palette_rejected() {
        let err = IntensityScale::from_json(r#"{"colors": [], "max_intensity": 0.75}"#);
        assert!(err.is_err(), "a scale with no colors cannot bucket anything");
    }
}
