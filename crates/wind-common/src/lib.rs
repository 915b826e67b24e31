//! Common types shared across the wind-streaks visualization crates.

pub mod bounds;
pub mod config;
pub mod error;
pub mod record;
pub mod time;
pub mod vector;

pub use bounds::{Bounds, MapExtent};
pub use config::{DeviceClass, EngineConfig};
pub use error::{WindError, WindResult};
pub use record::{ForecastRecord, GridHeader, U_COMPONENT, V_COMPONENT, WIND_CATEGORY};
pub use time::ForecastSpan;
pub use vector::{FieldVector, Segment, WindVector};
