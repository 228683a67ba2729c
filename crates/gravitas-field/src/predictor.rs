//! Trajectory prediction: a deterministic forward simulation of a test body
//! through the current field.
//!
//! Every call is a fresh, side-effect-free burst of queries against a shared
//! borrow of the aggregator. Identical inputs against an identical registry
//! produce bit-identical output.

use glam::Vec2;
use gravitas_config::PredictorConfig;

use crate::aggregator::FieldAggregator;
use crate::error::FieldError;
use crate::source::SourceId;

/// Upper bound on the up-front reservation in [`predict_into`]; longer paths
/// grow the buffer as they go.
const MAX_RESERVED_SAMPLES: usize = 4096;

/// One recorded state along a predicted path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrajectorySample {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Minimum signed distance reported by the step that produced this
    /// sample: the initial position's for the first sample, the previous
    /// position's afterwards.
    pub signed_distance: f32,
}

/// Inputs for [`predict`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryParams {
    pub initial_position: Vec2,
    pub initial_velocity: Vec2,
    /// Mass of the test body. May be negative, must not be zero.
    pub mass: f32,
    /// Source whose pull is ignored, typically the body being predicted.
    pub exclude: Option<SourceId>,
    /// Seconds per step, strictly positive.
    pub time_step: f32,
    /// Upper bound on the number of samples produced.
    pub max_steps: usize,
    /// Stop (and snap to the surface) once the body touches a surface.
    pub stop_on_collision: bool,
}

impl TrajectoryParams {
    /// Parameters with the step settings taken from the `predictor` section
    /// of the configuration.
    pub fn from_config(config: &PredictorConfig, initial_position: Vec2, initial_velocity: Vec2) -> Self {
        Self {
            initial_position,
            initial_velocity,
            mass: config.mass,
            exclude: None,
            time_step: config.time_step,
            max_steps: config.max_steps,
            stop_on_collision: config.stop_on_collision,
        }
    }

    /// Builder-style exclusion of one source.
    pub fn excluding(mut self, id: SourceId) -> Self {
        self.exclude = Some(id);
        self
    }

    fn validate(&self) -> Result<(), FieldError> {
        if !self.initial_position.is_finite() {
            return Err(FieldError::NonFiniteInput("initial_position"));
        }
        if !self.initial_velocity.is_finite() {
            return Err(FieldError::NonFiniteInput("initial_velocity"));
        }
        if !self.mass.is_finite() {
            return Err(FieldError::NonFiniteInput("mass"));
        }
        if self.mass == 0.0 {
            return Err(FieldError::ZeroMass);
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(FieldError::InvalidTimeStep(self.time_step));
        }
        if self.max_steps == 0 {
            return Err(FieldError::ZeroSteps);
        }
        Ok(())
    }
}

/// Advances a body by one semi-implicit Euler step.
///
/// Returns the new position and velocity together with the signed distance
/// at the *starting* position, taken from the same single field pass as the
/// force. `mass` must be non-zero.
pub fn step(
    field: &FieldAggregator,
    position: Vec2,
    velocity: Vec2,
    mass: f32,
    exclude: Option<SourceId>,
    time_step: f32,
) -> (Vec2, Vec2, f32) {
    let (force, signed_distance) = field.total_force_and_signed_distance(position, exclude);
    let next_velocity = velocity + force * time_step / mass;
    let next_position = position + next_velocity * time_step;
    (next_position, next_velocity, signed_distance)
}

/// Predicts the path of a body through `field`.
///
/// # Errors
///
/// Fails with [`FieldError::ZeroMass`], [`FieldError::NonFiniteInput`],
/// [`FieldError::InvalidTimeStep`] or [`FieldError::ZeroSteps`] when `params`
/// violate their preconditions.
pub fn predict(
    field: &FieldAggregator,
    params: &TrajectoryParams,
) -> Result<Vec<TrajectorySample>, FieldError> {
    let mut samples = Vec::new();
    predict_into(field, params, &mut samples)?;
    Ok(samples)
}

/// Like [`predict`], but writes into a caller-owned buffer so it can be
/// reused across frames. The buffer is cleared first. Returns the number of
/// samples written.
///
/// With `stop_on_collision`, the path ends on the first step that starts at
/// or inside a surface; that sample is snapped onto the surface.
pub fn predict_into(
    field: &FieldAggregator,
    params: &TrajectoryParams,
    out: &mut Vec<TrajectorySample>,
) -> Result<usize, FieldError> {
    out.clear();
    if let Err(err) = params.validate() {
        tracing::warn!(%err, "rejected trajectory prediction");
        return Err(err);
    }
    out.reserve(params.max_steps.min(MAX_RESERVED_SAMPLES));

    let mut position = params.initial_position;
    let mut velocity = params.initial_velocity;
    let mut signed_distance = field.min_signed_distance(position, params.exclude);

    for i in 0..params.max_steps {
        out.push(TrajectorySample {
            position,
            velocity,
            signed_distance,
        });

        (position, velocity, signed_distance) = step(
            field,
            position,
            velocity,
            params.mass,
            params.exclude,
            params.time_step,
        );

        if params.stop_on_collision && signed_distance <= 0.0 {
            let last = &mut out[i];
            last.position = field.closest_surface_point(last.position, params.exclude);
            tracing::trace!(step = i, position = ?last.position, "trajectory hit a surface");
            return Ok(out.len());
        }
    }

    // The path ends at the true final state rather than one step short.
    if let Some(last) = out.last_mut() {
        *last = TrajectorySample {
            position,
            velocity,
            signed_distance,
        };
    }
    Ok(out.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GravitySource;

    const G: f32 = 667.4;

    fn params(position: Vec2, velocity: Vec2) -> TrajectoryParams {
        TrajectoryParams {
            initial_position: position,
            initial_velocity: velocity,
            mass: 1.0,
            exclude: None,
            time_step: 0.01,
            max_steps: 200,
            stop_on_collision: true,
        }
    }

    fn two_body_field() -> FieldAggregator {
        let mut field = FieldAggregator::new(G, 1e5);
        field.register(GravitySource::point(SourceId(1), Vec2::ZERO, 2.0, 10.0));
        field.register(GravitySource::point(SourceId(2), Vec2::new(30.0, 12.0), 1.0, 3.0));
        field
    }

    #[test]
    fn test_rejects_invalid_params() {
        let field = two_body_field();
        let base = params(Vec2::new(10.0, 0.0), Vec2::ZERO);

        let zero_mass = TrajectoryParams { mass: 0.0, ..base };
        assert!(matches!(predict(&field, &zero_mass), Err(FieldError::ZeroMass)));

        let nan_mass = TrajectoryParams { mass: f32::NAN, ..base };
        assert!(matches!(
            predict(&field, &nan_mass),
            Err(FieldError::NonFiniteInput("mass"))
        ));

        let bad_dt = TrajectoryParams { time_step: 0.0, ..base };
        assert!(matches!(
            predict(&field, &bad_dt),
            Err(FieldError::InvalidTimeStep(_))
        ));

        let no_steps = TrajectoryParams { max_steps: 0, ..base };
        assert!(matches!(predict(&field, &no_steps), Err(FieldError::ZeroSteps)));

        let inf_pos = TrajectoryParams {
            initial_position: Vec2::new(f32::INFINITY, 0.0),
            ..base
        };
        assert!(matches!(
            predict(&field, &inf_pos),
            Err(FieldError::NonFiniteInput("initial_position"))
        ));
    }

    #[test]
    fn test_first_sample_is_initial_state() {
        let field = two_body_field();
        let p = params(Vec2::new(10.0, 0.0), Vec2::new(0.0, 3.0));
        let samples = predict(&field, &p).unwrap();
        assert_eq!(samples[0].position, p.initial_position);
        assert_eq!(samples[0].velocity, p.initial_velocity);
        assert_eq!(
            samples[0].signed_distance,
            field.min_signed_distance(p.initial_position, None)
        );
    }

    #[test]
    fn test_empty_field_moves_in_straight_line() {
        let field = FieldAggregator::default();
        let p = TrajectoryParams {
            max_steps: 5,
            time_step: 0.5,
            ..params(Vec2::ZERO, Vec2::new(2.0, 0.0))
        };
        let samples = predict(&field, &p).unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[1].position, Vec2::new(1.0, 0.0));
        // The last slot holds the state after the final step.
        assert_eq!(samples[4].position, Vec2::new(5.0, 0.0));
        assert_eq!(samples[4].velocity, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let field = two_body_field();
        let p = TrajectoryParams {
            stop_on_collision: false,
            max_steps: 300,
            ..params(Vec2::new(8.0, -3.0), Vec2::new(1.5, 7.0))
        };
        let first = predict(&field, &p).unwrap();
        let second = predict(&two_body_field(), &p).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
            assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
            assert_eq!(a.velocity.x.to_bits(), b.velocity.x.to_bits());
            assert_eq!(a.velocity.y.to_bits(), b.velocity.y.to_bits());
            assert_eq!(a.signed_distance.to_bits(), b.signed_distance.to_bits());
        }
    }

    #[test]
    fn test_falling_body_stops_at_surface() {
        let radius = 5.0;
        let mut field = FieldAggregator::new(G, 1e5);
        field.register(GravitySource::point(SourceId(1), Vec2::ZERO, radius, 10.0));

        let p = TrajectoryParams {
            max_steps: 10_000,
            ..params(Vec2::new(0.0, 40.0), Vec2::ZERO)
        };
        let samples = predict(&field, &p).unwrap();
        assert!(samples.len() < p.max_steps, "never collided");

        // Snapped from the first position inside, which lies within one
        // step (about 0.5 units at impact speed) of the surface.
        let last = samples.last().unwrap();
        assert!(
            (last.position.length() - radius).abs() < 1.0,
            "stopped at {:?}",
            last.position
        );
        for sample in &samples[..samples.len() - 1] {
            assert!(sample.signed_distance > 0.0);
        }
    }

    #[test]
    fn test_step_reports_starting_distance() {
        let mut field = FieldAggregator::new(G, 1e5);
        field.register(GravitySource::point(SourceId(1), Vec2::ZERO, 5.0, 10.0));
        let start = Vec2::new(0.0, 40.0);

        let (next, _, signed_distance) = step(&field, start, Vec2::ZERO, 1.0, None, 0.01);
        assert!(next.y < start.y);
        assert_eq!(signed_distance, field.min_signed_distance(start, None));

        let samples = predict(&field, &params(start, Vec2::ZERO)).unwrap();
        assert_eq!(samples[1].signed_distance, 35.0);
    }

    #[test]
    fn test_start_inside_surface_stops_immediately() {
        let mut field = FieldAggregator::new(G, 1e5);
        field.register(GravitySource::point(SourceId(1), Vec2::ZERO, 5.0, 10.0));
        let p = TrajectoryParams {
            max_steps: usize::MAX,
            ..params(Vec2::new(4.0, 0.0), Vec2::new(50.0, 0.0))
        };

        let samples = predict(&field, &p).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(
            samples[0].position,
            field.closest_surface_point(p.initial_position, None)
        );
        assert_eq!(samples[0].velocity, p.initial_velocity);
        assert_eq!(samples[0].signed_distance, -1.0);
    }

    #[test]
    fn test_collision_ends_on_first_sample_inside() {
        let mut field = FieldAggregator::new(G, 1e5);
        field.register(GravitySource::point(SourceId(1), Vec2::ZERO, 5.0, 10.0));
        let stopping = TrajectoryParams {
            max_steps: 2000,
            ..params(Vec2::new(0.0, 40.0), Vec2::ZERO)
        };
        let free = TrajectoryParams {
            stop_on_collision: false,
            ..stopping
        };

        let stopped = predict(&field, &stopping).unwrap();
        let unstopped = predict(&field, &free).unwrap();
        let first_inside = unstopped
            .iter()
            .position(|s| field.min_signed_distance(s.position, None) <= 0.0)
            .unwrap();
        assert!(first_inside < free.max_steps - 1);

        assert_eq!(stopped.len(), first_inside + 1);
        assert_eq!(stopped[..first_inside], unstopped[..first_inside]);
        assert!(stopped.last().unwrap().signed_distance > 0.0);
    }

    #[test]
    fn test_no_stop_runs_all_steps() {
        let mut field = FieldAggregator::new(G, 1e5);
        field.register(GravitySource::point(SourceId(1), Vec2::ZERO, 5.0, 10.0));
        let p = TrajectoryParams {
            max_steps: 400,
            stop_on_collision: false,
            ..params(Vec2::new(0.0, 40.0), Vec2::ZERO)
        };
        assert_eq!(predict(&field, &p).unwrap().len(), 400);
    }

    #[test]
    fn test_self_exclusion_ignores_own_pull() {
        let mut field = FieldAggregator::new(G, 1e5);
        field.register(GravitySource::point(SourceId(9), Vec2::ZERO, 1.0, 1000.0));
        let p = TrajectoryParams {
            max_steps: 3,
            time_step: 1.0,
            ..params(Vec2::new(4.0, 0.0), Vec2::ZERO)
        }
        .excluding(SourceId(9));
        let samples = predict(&field, &p).unwrap();
        assert!(samples.iter().all(|s| s.position == Vec2::new(4.0, 0.0)));
        assert!(samples.iter().all(|s| s.signed_distance == crate::NO_SURFACE_DISTANCE));
    }

    #[test]
    fn test_negative_mass_falls_away() {
        let mut field = FieldAggregator::new(G, 1e5);
        field.register(GravitySource::point(SourceId(1), Vec2::ZERO, 1.0, 10.0));
        let p = TrajectoryParams {
            mass: -1.0,
            max_steps: 20,
            ..params(Vec2::new(10.0, 0.0), Vec2::ZERO)
        };
        let samples = predict(&field, &p).unwrap();
        assert!(samples.last().unwrap().position.x > 10.0);
    }

    #[test]
    fn test_predict_into_reuses_buffer() {
        let field = two_body_field();
        let mut buffer = vec![TrajectorySample::default(); 500];
        let p = TrajectoryParams {
            max_steps: 12,
            stop_on_collision: false,
            ..params(Vec2::new(10.0, 10.0), Vec2::ZERO)
        };
        let count = predict_into(&field, &p, &mut buffer).unwrap();
        assert_eq!(count, 12);
        assert_eq!(buffer.len(), 12);
        assert_eq!(buffer, predict(&field, &p).unwrap());

        let bad = TrajectoryParams { mass: 0.0, ..p };
        assert!(predict_into(&field, &bad, &mut buffer).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = PredictorConfig {
            time_step: 0.2,
            max_steps: 7,
            mass: 3.0,
            stop_on_collision: false,
        };
        let p = TrajectoryParams::from_config(&config, Vec2::ONE, Vec2::X);
        assert_eq!(p.time_step, 0.2);
        assert_eq!(p.max_steps, 7);
        assert_eq!(p.mass, 3.0);
        assert!(!p.stop_on_collision);
        assert_eq!(p.exclude, None);
        assert_eq!(p.initial_position, Vec2::ONE);
    }
}
