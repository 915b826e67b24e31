//! Animated wind-streak visualization over projected forecast grids.
//!
//! The pipeline, leaf first:
//!
//! ```text
//! ForecastRecord (decoded u/v frames)
//!      │
//!      ▼
//! FrameSeries + CellSampler        temporal blend per grid cell
//!      │
//!      ▼
//! SpatialField::interpolate        bilinear, wrap-aware, sentinel-safe
//!      │
//!      ▼
//! ScreenFieldBuilder ─► ScreenField   inverse-projected, distortion-
//!      │                              corrected, built in cooperative chunks
//!      ▼
//! ParticleEngine::advance          advection, aging, magnitude buckets
//!      │
//!      ▼
//! AnimationDriver::on_frame        play/pause/stop, tick sequencing,
//!                                  time-change notifications
//! ```
//!
//! Everything runs on one thread; the two long-running operations (screen
//! field construction and the per-frame tick) are cooperative, resumed by
//! the host's frame notifier instead of blocking it.

pub mod animate;
pub mod intensity;
pub mod particles;
pub mod screen;
pub mod spatial;
pub mod temporal;
pub mod testdata;

pub use animate::{AnimationDriver, AnimationState, Surface};
pub use intensity::{IntensityScale, FADE_FILL_STYLE, PARTICLE_LINE_WIDTH};
pub use particles::{Particle, ParticleEngine};
pub use screen::{BuildProgress, ScreenField, ScreenFieldBuilder};
pub use spatial::SpatialField;
pub use temporal::{CellSampler, FrameSeries};
