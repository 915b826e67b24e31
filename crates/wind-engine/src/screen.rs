//! Screen-space wind field and its chunked, resumable construction.
//!
//! Construction inverse-projects every other pixel column/row of the render
//! bounds back to geographic coordinates and binds a memoizing sampler to
//! each. That is the most expensive step of the whole pipeline, so it runs
//! as a resumable task: `ScreenFieldBuilder::resume` fills whole columns
//! until a wall-clock budget is spent, then yields back to the scheduler.
//! Dropping a builder cancels the remaining work.

use std::cell::Cell;
use std::sync::Arc;
use std::time::{Duration, Instant};

use projection::Mercator;
use rand::Rng;
use tracing::{debug, info};
use wind_common::{Bounds, FieldVector};

use crate::spatial::SpatialField;

/// One inverse-projected pixel bound to the spatial field.
///
/// Memoizes the last queried time: a particle pair landing on the same
/// sampler during one tick skips the interpolate + distort recompute.
#[derive(Clone)]
struct PixelSampler {
    lon: f64,
    lat: f64,
    memo: Cell<Option<(f64, Option<FieldVector>)>>,
}

impl PixelSampler {
    fn sample(
        &self,
        spatial: &SpatialField,
        projector: &Mercator,
        velocity_scale: f64,
        t: f64,
    ) -> Option<FieldVector> {
        if let Some((last_t, value)) = self.memo.get() {
            if last_t == t {
                return value;
            }
        }

        let wind = spatial.interpolate(self.lon, self.lat, t);
        let value = projector.distort(self.lon, self.lat, velocity_scale, wind);
        self.memo.set(Some((t, value)));
        value
    }
}

/// Progress of chunked screen-field construction.
pub enum BuildProgress {
    /// Budget exhausted with columns remaining; resume on a later turn.
    InProgress(ScreenFieldBuilder),
    /// All columns filled.
    Complete(ScreenField),
}

/// Resumable construction task for a [`ScreenField`].
pub struct ScreenFieldBuilder {
    spatial: Arc<SpatialField>,
    projector: Mercator,
    bounds: Bounds,
    velocity_scale: f64,
    columns: Vec<Option<Vec<Option<PixelSampler>>>>,
    next_x: i32,
    started: Instant,
}

impl ScreenFieldBuilder {
    pub fn new(
        spatial: Arc<SpatialField>,
        projector: Mercator,
        bounds: Bounds,
        velocity_scale: f64,
    ) -> Self {
        let mut columns = Vec::new();
        columns.resize_with(bounds.width as usize, || None);
        Self {
            spatial,
            projector,
            bounds,
            velocity_scale,
            columns,
            next_x: bounds.x.max(0),
            started: Instant::now(),
        }
    }

    /// Fill columns until `budget` is spent, yielding instead of blocking
    /// once it runs out with work remaining.
    pub fn resume(mut self, budget: Duration) -> BuildProgress {
        let turn = Instant::now();

        while self.next_x < self.bounds.x_max {
            self.fill_column(self.next_x);
            self.next_x += 2;

            if turn.elapsed() >= budget && self.next_x < self.bounds.x_max {
                debug!(next_column = self.next_x, "screen field construction yielding");
                return BuildProgress::InProgress(self);
            }
        }

        info!(
            columns = self.columns.iter().filter(|c| c.is_some()).count(),
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "screen field ready"
        );

        BuildProgress::Complete(ScreenField {
            spatial: self.spatial,
            projector: self.projector,
            bounds: self.bounds,
            velocity_scale: self.velocity_scale,
            columns: self.columns,
        })
    }

    /// Run construction to completion in one call, for synchronous callers.
    pub fn build_blocking(self) -> ScreenField {
        match self.resume(Duration::MAX) {
            BuildProgress::Complete(field) => field,
            BuildProgress::InProgress(_) => unreachable!("unbounded budget cannot yield"),
        }
    }

    /// Fill column `x` and mirror it into `x + 1`: each sampler occupies
    /// both rows of its pair and each column both columns of its pair, so
    /// lookups stay exact whatever the parity of the bounds origin.
    fn fill_column(&mut self, x: i32) {
        let slots = (self.bounds.y_max.max(0) as usize) + 2;
        let mut column: Vec<Option<PixelSampler>> = Vec::new();
        column.resize_with(slots, || None);

        let mut y = self.bounds.y;
        while y <= self.bounds.y_max {
            let (lon, lat) = self.projector.invert(x as f64, y as f64);
            if lon.is_finite() {
                let sampler = PixelSampler { lon, lat, memo: Cell::new(None) };
                column[y as usize + 1] = Some(sampler.clone());
                column[y as usize] = Some(sampler);
            }
            y += 2;
        }

        if let Some(slot) = self.columns.get_mut(x as usize + 1) {
            *slot = Some(column.clone());
        }
        if let Some(slot) = self.columns.get_mut(x as usize) {
            *slot = Some(column);
        }
    }
}

/// Pixel-addressed wind field over the render bounds. Construction inverts
/// every other column/row and mirrors each into its neighbor, so every
/// in-bounds pixel resolves to a sampler.
pub struct ScreenField {
    spatial: Arc<SpatialField>,
    projector: Mercator,
    bounds: Bounds,
    velocity_scale: f64,
    columns: Vec<Option<Vec<Option<PixelSampler>>>>,
}

impl ScreenField {
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Screen-space wind at pixel (x, y) and fractional time `t`, or `None`
    /// outside data coverage. Coordinates round to the nearest pixel;
    /// neighboring pixels of a pair share one sampler.
    pub fn query(&self, x: f64, y: f64, t: f64) -> Option<FieldVector> {
        let xi = x.round() as i64;
        let yi = y.round() as i64;
        if xi < 0 || yi < 0 {
            return None;
        }

        let column = self.columns.get(xi as usize)?.as_ref()?;
        let sampler = column.get(yi as usize)?.as_ref()?;
        sampler.sample(&self.spatial, &self.projector, self.velocity_scale, t)
    }

    /// Draw a uniform random in-bounds pixel position.
    ///
    /// The draw is accepted whether or not it lands on data coverage; a
    /// particle spawned off-data is culled as escaped on its next tick.
    pub fn randomize_position<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let x = rng.gen_range(0..self.bounds.width) as f64 + self.bounds.x as f64;
        let y = rng.gen_range(0..self.bounds.height) as f64 + self.bounds.y as f64;
        (x, y)
    }

    /// Drop the sampler table. A released field reports no coverage anywhere;
    /// callers discard-and-rebuild rather than querying a released field.
    pub fn release(&mut self) {
        self.columns = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field_parts() -> (Arc<SpatialField>, Mercator, Bounds) {
        let records = testdata::uniform_records(10, 10, 2, 1.0, 0.0);
        let spatial = Arc::new(SpatialField::from_records(&records, 10).unwrap());
        let extent_deg = [[2.0, 2.0], [7.0, 7.0]];
        let width = 120;
        let height = testdata::viewport_height(extent_deg, width);
        let extent = wind_common::MapExtent::from_degrees(extent_deg, width, height);
        let bounds = Bounds::full_canvas(width, height);
        (spatial, Mercator::new(extent), bounds)
    }

    #[test]
    fn test_build_and_query_covered_pixel() {
        let (spatial, projector, bounds) = field_parts();
        let field = ScreenFieldBuilder::new(spatial, projector, bounds, 0.011).build_blocking();

        let v = field.query(60.0, 60.0, 0.0).expect("center pixel is covered");
        assert!(v.dx > 0.0, "eastward wind should move particles east");
        assert!((v.magnitude - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_paired_pixels_share_sampler() {
        let (spatial, projector, bounds) = field_parts();
        let field = ScreenFieldBuilder::new(spatial, projector, bounds, 0.011).build_blocking();

        let even = field.query(60.0, 60.0, 0.0).unwrap();
        let odd = field.query(61.0, 61.0, 0.0).unwrap();
        assert_eq!(even, odd);
    }

    #[test]
    fn test_odd_origin_bounds_keep_coverage() {
        let (spatial, projector, full) = field_parts();
        let bounds = Bounds::from_corners(
            [1.2, 1.4],
            [full.width as f64, full.height as f64],
            full.width,
            full.height,
        );
        assert_eq!(bounds.x, 1);
        assert_eq!(bounds.y, 1);

        let field = ScreenFieldBuilder::new(spatial, projector, bounds, 0.011).build_blocking();
        assert!(
            field.query(60.0, 60.0, 0.0).is_some(),
            "interior pixel must stay covered when the bounds origin is odd"
        );
        assert!(field.query(61.0, 61.0, 0.0).is_some());
    }

    #[test]
    fn test_query_outside_canvas_is_none() {
        let (spatial, projector, bounds) = field_parts();
        let field = ScreenFieldBuilder::new(spatial, projector, bounds, 0.011).build_blocking();

        assert!(field.query(-5.0, 60.0, 0.0).is_none());
        assert!(field.query(60.0, 100_000.0, 0.0).is_none());
    }

    #[test]
    fn test_zero_budget_yields_per_column() {
        let (spatial, projector, bounds) = field_parts();
        let mut builder = ScreenFieldBuilder::new(spatial, projector, bounds, 0.011);

        let mut yields = 0;
        let field = loop {
            match builder.resume(Duration::ZERO) {
                BuildProgress::InProgress(b) => {
                    yields += 1;
                    builder = b;
                }
                BuildProgress::Complete(field) => break field,
            }
        };

        assert!(yields > 10, "zero budget should yield once per column, got {}", yields);
        assert!(field.query(60.0, 60.0, 0.0).is_some());
    }

    #[test]
    fn test_released_field_has_no_coverage() {
        let (spatial, projector, bounds) = field_parts();
        let mut field = ScreenFieldBuilder::new(spatial, projector, bounds, 0.011).build_blocking();

        assert!(field.query(60.0, 60.0, 0.0).is_some());
        field.release();
        assert!(field.query(60.0, 60.0, 0.0).is_none());
    }

    #[test]
    fn test_randomize_position_stays_in_bounds() {
        let (spatial, projector, bounds) = field_parts();
        let field = ScreenFieldBuilder::new(spatial, projector, bounds, 0.011).build_blocking();

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let (x, y) = field.randomize_position(&mut rng);
            assert!(x >= bounds.x as f64 && x < (bounds.x + bounds.width as i32) as f64);
            assert!(y >= bounds.y as f64 && y < (bounds.y + bounds.height as i32) as f64);
        }
    }
}
