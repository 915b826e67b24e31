//! Animation driver: lifecycle, tick sequencing, and render dispatch.
//!
//! The host owns the frame clock. Once per display refresh it calls
//! [`AnimationDriver::on_frame`], which either resumes screen-field
//! construction within the configured budget or runs one animation tick
//! (evolve particles, fade the surface, stroke the segment buckets, notify
//! time listeners). The return value tells the host whether to keep
//! scheduling frames.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use projection::Mercator;
use tracing::{error, info, warn};
use wind_common::{
    Bounds, DeviceClass, EngineConfig, ForecastRecord, ForecastSpan, MapExtent, Segment,
    WindResult,
};

use crate::intensity::IntensityScale;
use crate::particles::ParticleEngine;
use crate::screen::{BuildProgress, ScreenField, ScreenFieldBuilder};
use crate::spatial::SpatialField;

/// Render target abstraction. The driver never touches pixels directly; the
/// host supplies whatever canvas it draws on.
pub trait Surface {
    /// Paint the fade fill over `bounds` to decay existing trails.
    fn fade(&mut self, bounds: &Bounds) -> WindResult<()>;

    /// Stroke a batch of trail segments in one color.
    fn stroke(&mut self, color: &str, segments: &[Segment]) -> WindResult<()>;
}

/// Externally observable playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationState {
    pub current_frame: u32,
    pub paused: bool,
    pub stopped: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self { current_frame: 0, paused: false, stopped: true }
    }
}

enum FieldState {
    Idle,
    Building(ScreenFieldBuilder),
    Ready { field: ScreenField, engine: ParticleEngine },
}

type TimeListener = Box<dyn FnMut(DateTime<Utc>)>;

/// Owns the full animation pipeline for one dataset at a time.
pub struct AnimationDriver {
    config: EngineConfig,
    device: DeviceClass,
    scale: IntensityScale,
    state: AnimationState,
    field: FieldState,
    span: Option<ForecastSpan>,
    listeners: Vec<TimeListener>,
}

impl AnimationDriver {
    pub fn new(config: EngineConfig, device: DeviceClass) -> WindResult<Self> {
        config.validate()?;
        let scale = IntensityScale::with_max_intensity(config.max_wind_intensity);
        Ok(Self {
            config,
            device,
            scale,
            state: AnimationState::default(),
            field: FieldState::Idle,
            span: None,
            listeners: Vec::new(),
        })
    }

    /// Register a callback invoked after each unpaused tick with the
    /// forecast time the rendered frame represents.
    pub fn on_time_change(&mut self, listener: impl FnMut(DateTime<Utc>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_building(&self) -> bool {
        matches!(self.field, FieldState::Building(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.field, FieldState::Ready { .. })
    }

    /// Start animating a dataset over the given viewport. Any animation in
    /// progress, including an unfinished screen-field build, is discarded
    /// first. Grid validation happens here, eagerly, so bad data never
    /// reaches the render loop.
    pub fn start(
        &mut self,
        records: &[ForecastRecord],
        bounds: Bounds,
        extent: MapExtent,
    ) -> WindResult<()> {
        self.stop_internal();

        let spatial = Arc::new(SpatialField::from_records(
            records,
            self.config.timelapse_frames,
        )?);
        self.span = Some(spatial.span());

        let projector = Mercator::new(extent);
        let builder =
            ScreenFieldBuilder::new(spatial, projector, bounds, self.config.velocity_scale);
        self.field = FieldState::Building(builder);
        self.state = AnimationState { current_frame: 0, paused: false, stopped: false };

        info!(
            width = bounds.width,
            height = bounds.height,
            frames = self.config.timelapse_frames,
            "animation started"
        );
        Ok(())
    }

    /// Run one cooperative step. Returns `false` once stopped, telling the
    /// host to quit scheduling frames.
    pub fn on_frame(&mut self, surface: &mut dyn Surface) -> bool {
        if self.state.stopped {
            return false;
        }

        match mem::replace(&mut self.field, FieldState::Idle) {
            FieldState::Idle => false,
            FieldState::Building(builder) => {
                let budget = Duration::from_millis(self.config.build_budget_ms);
                match builder.resume(budget) {
                    BuildProgress::InProgress(builder) => {
                        self.field = FieldState::Building(builder);
                    }
                    BuildProgress::Complete(field) => {
                        let engine = ParticleEngine::new(
                            &field,
                            self.scale.clone(),
                            &self.config,
                            self.device,
                        );
                        self.field = FieldState::Ready { field, engine };
                    }
                }
                true
            }
            FieldState::Ready { field, mut engine } => {
                let keep_going = self.tick(surface, &field, &mut engine);
                if keep_going {
                    self.field = FieldState::Ready { field, engine };
                }
                keep_going
            }
        }
    }

    fn tick(
        &mut self,
        surface: &mut dyn Surface,
        field: &ScreenField,
        engine: &mut ParticleEngine,
    ) -> bool {
        let frames = self.config.timelapse_frames;

        if !self.state.paused {
            let next = self.state.current_frame + self.config.timelapse_step;
            if next >= frames {
                self.state.current_frame = 0;
                engine.reset(field);
            } else {
                self.state.current_frame = next;
            }
        }

        // Advect and report at the frame just advanced to, so the first
        // tick after a wrap moves the freshly reset particles at time zero.
        let t = self.state.current_frame.min(frames.saturating_sub(1));
        engine.advance(field, t as f64);

        if let Err(e) = self.render(surface, field, engine) {
            error!(error = %e, "surface render failed");
            if self.config.halt_on_error {
                self.stop();
                return false;
            }
        }

        if !self.state.paused {
            if let Some(span) = self.span {
                let shown = span.display_time(t, frames);
                for listener in &mut self.listeners {
                    listener(shown);
                }
            }
        }
        true
    }

    fn render(
        &self,
        surface: &mut dyn Surface,
        field: &ScreenField,
        engine: &ParticleEngine,
    ) -> WindResult<()> {
        surface.fade(field.bounds())?;
        for (index, segments) in engine.buckets() {
            surface.stroke(self.scale.color(index), segments)?;
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        self.state.paused = true;
    }

    pub fn play(&mut self) {
        self.state.paused = false;
    }

    /// Terminal for the current dataset; idempotent. A later `start` begins
    /// a fresh animation.
    pub fn stop(&mut self) {
        self.stop_internal();
    }

    fn stop_internal(&mut self) {
        match mem::replace(&mut self.field, FieldState::Idle) {
            FieldState::Idle => {}
            FieldState::Building(_) => {
                warn!("discarding unfinished screen field build");
            }
            FieldState::Ready { mut field, .. } => {
                field.release();
            }
        }
        self.span = None;
        self.state = AnimationState::default();
    }
}
