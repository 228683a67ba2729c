//! Orienting gameplay directions relative to local gravity.

use glam::Vec2;
use gravitas_math::safe_normalize;

/// Rotates `direction` by the rotation that takes straight down `(0, -1)`
/// onto `gravity_direction`.
///
/// Lets input such as "left" or "jump" follow the local gravity frame. A
/// zero gravity direction leaves `direction` unchanged.
pub fn direction_to_gravity_space(gravity_direction: Vec2, direction: Vec2) -> Vec2 {
    let down = safe_normalize(gravity_direction);
    if down == Vec2::ZERO {
        return direction;
    }
    // Unit rotor taking NEG_Y to `down`.
    Vec2::new(-down.y, down.x).rotate(direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_standard_gravity_is_identity() {
        let v = Vec2::new(0.3, -2.0);
        assert!(approx(direction_to_gravity_space(Vec2::NEG_Y, v), v));
        assert!(approx(direction_to_gravity_space(Vec2::new(0.0, -9.81), v), v));
    }

    #[test]
    fn test_down_maps_to_gravity() {
        for gravity in [Vec2::X, Vec2::Y, Vec2::new(-3.0, 4.0), Vec2::new(1.0, -1.0)] {
            let mapped = direction_to_gravity_space(gravity, Vec2::NEG_Y);
            assert!(approx(mapped, gravity.normalize()), "gravity={gravity:?} mapped={mapped:?}");
        }
    }

    #[test]
    fn test_inverted_gravity_flips() {
        let mapped = direction_to_gravity_space(Vec2::Y, Vec2::new(1.0, 0.0));
        assert!(approx(mapped, Vec2::new(-1.0, 0.0)));
    }

    #[test]
    fn test_preserves_length() {
        let v = Vec2::new(3.0, 4.0);
        let mapped = direction_to_gravity_space(Vec2::new(2.0, 7.0), v);
        assert!((mapped.length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_gravity_is_noop() {
        let v = Vec2::new(-1.0, 2.0);
        assert_eq!(direction_to_gravity_space(Vec2::ZERO, v), v);
    }
}
