//! Configuration for the wind animation engine.

use crate::error::{WindError, WindResult};
use serde::{Deserialize, Serialize};

/// Tunables for field construction, particle advection and animation pacing.
///
/// The defaults reproduce the classic streak look: they are visual choices,
/// not physical constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scale applied to wind velocity before projection distortion.
    pub velocity_scale: f64,

    /// Wind magnitude (m/s) at which particle intensity saturates.
    pub max_wind_intensity: f64,

    /// Ticks a particle lives before it is respawned elsewhere.
    pub max_particle_age: u32,

    /// Particles per pixel of render area.
    pub particle_density: f64,

    /// Population factor applied on constrained (mobile-class) devices.
    pub particle_reduction: f64,

    /// Total discrete animation steps across the forecast series.
    pub timelapse_frames: u32,

    /// Logical frames advanced per display tick.
    pub timelapse_step: u32,

    /// Wall-clock budget per scheduling turn for chunked field construction.
    pub build_budget_ms: u64,

    /// Stop the animation on the first tick-boundary error instead of
    /// logging and skipping the tick.
    pub halt_on_error: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            velocity_scale: 0.011,
            max_wind_intensity: 0.75,
            max_particle_age: 50,
            particle_density: 0.001,
            particle_reduction: 0.75,
            timelapse_frames: 1440,
            timelapse_step: 1,
            build_budget_ms: 1000,
            halt_on_error: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("WIND_VELOCITY_SCALE") {
            if let Ok(scale) = val.parse() {
                config.velocity_scale = scale;
            }
        }

        if let Ok(val) = std::env::var("WIND_MAX_PARTICLE_AGE") {
            if let Ok(age) = val.parse() {
                config.max_particle_age = age;
            }
        }

        if let Ok(val) = std::env::var("WIND_PARTICLE_DENSITY") {
            if let Ok(density) = val.parse() {
                config.particle_density = density;
            }
        }

        if let Ok(val) = std::env::var("WIND_TIMELAPSE_FRAMES") {
            if let Ok(frames) = val.parse() {
                config.timelapse_frames = frames;
            }
        }

        if let Ok(val) = std::env::var("WIND_BUILD_BUDGET_MS") {
            if let Ok(budget) = val.parse() {
                config.build_budget_ms = budget;
            }
        }

        if let Ok(val) = std::env::var("WIND_HALT_ON_ERROR") {
            config.halt_on_error = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> WindResult<()> {
        if self.velocity_scale <= 0.0 {
            return Err(WindError::InvalidConfig("velocity_scale must be > 0".into()));
        }

        if self.max_wind_intensity <= 0.0 {
            return Err(WindError::InvalidConfig("max_wind_intensity must be > 0".into()));
        }

        if self.max_particle_age == 0 {
            return Err(WindError::InvalidConfig("max_particle_age must be > 0".into()));
        }

        if self.particle_density <= 0.0 {
            return Err(WindError::InvalidConfig("particle_density must be > 0".into()));
        }

        if !(0.0..=1.0).contains(&self.particle_reduction) || self.particle_reduction == 0.0 {
            return Err(WindError::InvalidConfig(
                "particle_reduction must be in (0, 1]".into(),
            ));
        }

        if self.timelapse_frames == 0 {
            return Err(WindError::InvalidConfig("timelapse_frames must be > 0".into()));
        }

        if self.timelapse_step == 0 {
            return Err(WindError::InvalidConfig("timelapse_step must be > 0".into()));
        }

        Ok(())
    }
}

/// Rough device classification supplied by the host; detection itself is the
/// host's concern. Mobile-class devices run a reduced particle population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    /// Particle population multiplier for this device class.
    pub fn population_factor(&self, config: &EngineConfig) -> f64 {
        match self {
            DeviceClass::Desktop => 1.0,
            DeviceClass::Mobile => config.particle_reduction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_age() {
        let config = EngineConfig { max_particle_age: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_frames() {
        let config = EngineConfig { timelapse_frames: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mobile_population_factor() {
        let config = EngineConfig::default();
        assert_eq!(DeviceClass::Desktop.population_factor(&config), 1.0);
        assert_eq!(DeviceClass::Mobile.population_factor(&config), 0.75);
    }
}
