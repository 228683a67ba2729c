//! Demo binary that builds a small gravity scene and exercises the field API.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p gravitas-demo`.
//! Run with `cargo run -p gravitas-demo -- --steps 400 --map asteroid.ron` to
//! predict further through a custom baked body.

mod scene;

use std::error::Error;

use clap::Parser;
use glam::Vec2;
use gravitas_config::{CliArgs, Config, default_config_dir};
use gravitas_field::{
    FieldAggregator, SourceDescriptor, TrajectoryParams, direction_to_gravity_space, predict,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{info, warn};

/// Samples the field at seeded random points and reports what a body there
/// would feel.
fn demonstrate_field_queries(field: &FieldAggregator) {
    info!("Starting field query demonstration");

    let mut rng = Xoshiro256StarStar::seed_from_u64(42);
    let mut strongest = (Vec2::ZERO, 0.0_f32);
    let mut inside = 0;

    for _ in 0..256 {
        let probe = Vec2::new(rng.gen_range(-400.0..400.0), rng.gen_range(-400.0..400.0));
        let (force, signed_distance) = field.total_force_and_signed_distance(probe, None);
        if signed_distance <= 0.0 {
            inside += 1;
        }
        if force.length() > strongest.1 {
            strongest = (probe, force.length());
        }
    }

    info!(
        "Strongest pull {:.1} at ({:.1}, {:.1}); {} of 256 probes inside a body",
        strongest.1, strongest.0.x, strongest.0.y, inside
    );

    let probe = Vec2::new(60.0, 80.0);
    info!(
        "At ({}, {}): surface {:.2} away toward {:?}, closest point {:?}, polarity {:.3}",
        probe.x,
        probe.y,
        field.min_signed_distance(probe, None),
        field.direction_to_surface(probe, None),
        field.closest_surface_point(probe, None),
        field.gravity_polarity(probe, None)
    );
    info!("Field query demonstration completed successfully");
}

/// Predicts a launch from just above the sun and reports where it ends up.
fn demonstrate_trajectory(field: &FieldAggregator, config: &Config) -> Result<(), Box<dyn Error>> {
    info!("Starting trajectory demonstration");

    let params = TrajectoryParams::from_config(
        &config.predictor,
        Vec2::new(0.0, 40.0),
        Vec2::new(45.0, 20.0),
    );
    let path = predict(field, &params)?;

    if let Some(last) = path.last() {
        info!(
            "Predicted {} of {} steps, ending at ({:.2}, {:.2}) with speed {:.2} and signed distance {:.3}",
            path.len(),
            params.max_steps,
            last.position.x,
            last.position.y,
            last.velocity.length(),
            last.signed_distance
        );
    }
    if path.len() < params.max_steps {
        info!("Trajectory stopped on a surface");
    }

    let travelled: f32 = path
        .windows(2)
        .map(|pair| pair[0].position.distance(pair[1].position))
        .sum();
    info!("Path length {:.1}", travelled);
    info!("Trajectory demonstration completed successfully");
    Ok(())
}

/// Shows what the moon feels from everything else and how "down" rotates
/// player input.
fn demonstrate_body_gravity(field: &FieldAggregator) {
    info!("Starting body gravity demonstration");

    let Some(gravity) = field.current_gravity(scene::MOON) else {
        warn!("Moon is not registered");
        return;
    };
    info!("Moon feels gravity {:?}", gravity);

    let right = direction_to_gravity_space(gravity, Vec2::X);
    let jump = direction_to_gravity_space(gravity, Vec2::Y);
    info!("On the moon, 'right' is {:?} and 'jump' is {:?}", right, jump);
    info!("Body gravity demonstration completed successfully");
}

/// Walks through the dirty-flag export cycle a GPU host would follow.
fn demonstrate_gpu_export(field: &mut FieldAggregator) {
    info!("Starting GPU export demonstration");

    if field.is_dirty() {
        let export = field.export_descriptors();
        let descriptor_bytes = bytemuck::cast_slice::<SourceDescriptor, u8>(&export.descriptors);
        let sample_bytes = bytemuck::cast_slice::<[f32; 3], u8>(&export.samples);
        info!(
            "Uploading {} descriptors ({} bytes) and {} region samples ({} bytes)",
            export.descriptors.len(),
            descriptor_bytes.len(),
            export.samples.len(),
            sample_bytes.len()
        );
        field.clear_dirty();
    }

    if let Some(sun) = field.source_mut(scene::SUN) {
        sun.set_mass(sun.mass() * 1.5);
    }
    info!(
        "After changing the sun's mass: dirty={}, sample data dirty={}",
        field.is_dirty(),
        field.is_sample_data_dirty()
    );

    field.deregister(scene::RIDGE);
    info!("After removing the ridge: {} sources remain", field.len());
    info!("GPU export demonstration completed successfully");
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .ok_or("failed to resolve config directory")?;

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    // Initialize logging with config and debug settings
    let log_dir = config_dir.join("logs");
    gravitas_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut field = FieldAggregator::from_config(&config.field);
    let asteroid_map = scene::load_asteroid_map(args.map.as_deref())?;
    scene::populate(&mut field, asteroid_map);

    demonstrate_field_queries(&field);
    demonstrate_trajectory(&field, &config)?;
    demonstrate_body_gravity(&field);
    demonstrate_gpu_export(&mut field);

    if let Some(asteroid) = field.source(scene::ASTEROID) {
        info!("Asteroid centre of gravity at {:?}", asteroid.centre_of_gravity());
    }
    Ok(())
}
