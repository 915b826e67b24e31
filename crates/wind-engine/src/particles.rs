//! Particle population: advection, aging, and magnitude-bucketed segments.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use wind_common::{Bounds, DeviceClass, EngineConfig, Segment};

use crate::intensity::IntensityScale;
use crate::screen::ScreenField;

/// One advected wind particle in screen coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub xt: f64,
    pub yt: f64,
    pub age: u32,
}

/// Fixed-size particle population advected through a [`ScreenField`].
///
/// Each call to [`advance`](Self::advance) moves every particle one step
/// along the local wind vector and groups the traversed segments by
/// intensity bucket, so the renderer issues one stroke batch per color.
pub struct ParticleEngine {
    particles: Vec<Particle>,
    buckets: Vec<Vec<Segment>>,
    scale: IntensityScale,
    max_age: u32,
    rng: StdRng,
}

impl ParticleEngine {
    /// Population size for a canvas: area times density, scaled down for
    /// constrained devices.
    pub fn population_size(bounds: &Bounds, config: &EngineConfig, device: DeviceClass) -> usize {
        let area = bounds.width as f64 * bounds.height as f64;
        ((area * config.particle_density).round() * device.population_factor(config)).round()
            as usize
    }

    pub fn new(
        field: &ScreenField,
        scale: IntensityScale,
        config: &EngineConfig,
        device: DeviceClass,
    ) -> Self {
        Self::with_rng(field, scale, config, device, StdRng::from_entropy())
    }

    /// Deterministic variant for tests.
    pub fn with_rng(
        field: &ScreenField,
        scale: IntensityScale,
        config: &EngineConfig,
        device: DeviceClass,
        mut rng: StdRng,
    ) -> Self {
        let population = Self::population_size(field.bounds(), config, device);
        let max_age = config.max_particle_age;

        let particles = (0..population)
            .map(|_| {
                let (x, y) = field.randomize_position(&mut rng);
                Particle { x, y, xt: x, yt: y, age: rng.gen_range(0..max_age) }
            })
            .collect();

        debug!(population, max_age, "seeded particle population");

        Self {
            particles,
            buckets: vec![Vec::new(); scale.len()],
            scale,
            max_age,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Respawn every particle at a fresh random position with a random age,
    /// used when the animation timeline wraps around.
    pub fn reset(&mut self, field: &ScreenField) {
        for particle in &mut self.particles {
            let (x, y) = field.randomize_position(&mut self.rng);
            particle.x = x;
            particle.y = y;
            particle.xt = x;
            particle.yt = y;
            particle.age = self.rng.gen_range(0..self.max_age);
        }
    }

    /// Advance every particle one tick at fractional time `t`.
    ///
    /// Expired particles respawn before moving. A particle whose position
    /// falls off data coverage is forced to expiry so it respawns next tick;
    /// one that stays covered records its traversed segment in the bucket of
    /// the local wind speed, then commits the move.
    pub fn advance(&mut self, field: &ScreenField, t: f64) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }

        for particle in &mut self.particles {
            if particle.age >= self.max_age {
                let (x, y) = field.randomize_position(&mut self.rng);
                particle.x = x;
                particle.y = y;
                particle.age = 0;
            }

            match field.query(particle.x, particle.y, t) {
                None => {
                    // Escaped coverage; expire so next tick respawns it.
                    particle.age = self.max_age;
                }
                Some(wind) => {
                    let xt = particle.x + wind.dx;
                    let yt = particle.y + wind.dy;

                    if field.query(xt, yt, t).is_some() {
                        particle.xt = xt;
                        particle.yt = yt;
                        let bucket = self.scale.bucket_for(wind.magnitude);
                        self.buckets[bucket].push(Segment {
                            x: particle.x,
                            y: particle.y,
                            xt,
                            yt,
                        });
                        particle.x = xt;
                        particle.y = yt;
                    } else {
                        // Destination is off coverage; jump without a trail.
                        particle.x = xt;
                        particle.y = yt;
                    }
                    particle.age = (particle.age + 1).min(self.max_age);
                }
            }
        }
    }

    /// Non-empty segment buckets from the last tick, in palette order.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[Segment])> {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, segments)| !segments.is_empty())
            .map(|(index, segments)| (index, segments.as_slice()))
    }
}
