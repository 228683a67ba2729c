//! Demo scene construction.

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use gravitas_field::{FieldAggregator, FieldError, GravityMap, GravitySource, Sample, SourceId};
use gravitas_math::Placement;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::info;

pub(crate) const SUN: SourceId = SourceId(1);
pub(crate) const MOON: SourceId = SourceId(2);
pub(crate) const RIDGE: SourceId = SourceId(3);
pub(crate) const ASTEROID: SourceId = SourceId(4);
const DEBRIS_START: u32 = 100;

/// Bakes a disc-shaped body into a `size`x`size` map: forces point toward
/// the centre, the surface sits at `radius` (in unit-square coordinates).
pub(crate) fn bake_disc_map(size: u32, radius: f32) -> Result<GravityMap, FieldError> {
    let last = (size - 1) as f32;
    let samples = (0..size * size)
        .map(|i| {
            let uv = Vec2::new((i % size) as f32, (i / size) as f32) / last;
            let offset = uv - Vec2::splat(0.5);
            Sample::new(-offset.normalize_or_zero(), offset.length() - radius)
        })
        .collect();
    GravityMap::new(size, size, 0, samples, Vec2::splat(0.5))
}

/// Loads the asteroid map from `map_path`, or bakes a disc when none is given.
pub(crate) fn load_asteroid_map(map_path: Option<&Path>) -> Result<Arc<GravityMap>, FieldError> {
    let map = match map_path {
        Some(path) => GravityMap::load_ron(path)?,
        None => bake_disc_map(33, 0.35)?,
    };
    info!(
        "Asteroid map {}x{} (texture {}x{})",
        map.width(),
        map.height(),
        map.texture_size().x,
        map.texture_size().y
    );
    Ok(Arc::new(map))
}

/// Populates `field` with a sun, a moon, a ridge, a baked asteroid, and a
/// seeded ring of small repulsive debris.
pub(crate) fn populate(field: &mut FieldAggregator, asteroid_map: Arc<GravityMap>) {
    field.register(
        GravitySource::point(SUN, Vec2::ZERO, 25.0, 900.0).with_colour([1.0, 0.85, 0.3, 1.0]),
    );
    field.register(
        GravitySource::point(MOON, Vec2::new(160.0, 40.0), 6.0, 40.0)
            .with_bounciness(0.3)
            .with_colour([0.7, 0.7, 0.8, 1.0]),
    );
    field.register(GravitySource::segment(
        RIDGE,
        Vec2::new(-120.0, -200.0),
        Vec2::new(120.0, -220.0),
        5.0,
        120.0,
    ));
    field.register(GravitySource::region(
        ASTEROID,
        asteroid_map,
        Placement::new(Vec2::new(-180.0, 140.0), 0.6, 60.0),
        150.0,
    ));

    let mut rng = Xoshiro256StarStar::seed_from_u64(7);
    for i in 0..8 {
        let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
        let distance: f32 = rng.gen_range(260.0..340.0);
        let radius: f32 = rng.gen_range(1.0..3.0);
        field.register(GravitySource::point(
            SourceId(DEBRIS_START + i),
            Vec2::from_angle(angle) * distance,
            radius,
            -2.0,
        ));
    }

    info!("Scene populated with {} gravity sources", field.len());
}
