//! Uniform-scale rigid placement of a body in the 2D world.

use glam::{Mat4, Quat, Vec2, Vec3};

/// Smallest scale a placement accepts. Keeps `world_to_local` finite.
pub const MIN_SCALE: f32 = 1e-6;

/// Translation, rotation and uniform scale of a body.
///
/// Local space is scaled uniformly, then rotated counter-clockwise by
/// `rotation` radians, then translated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    translation: Vec2,
    rotation: f32,
    scale: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Placement {
    /// No translation, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    /// Creates a placement. Non-positive or non-finite scales are raised to [`MIN_SCALE`].
    pub fn new(translation: Vec2, rotation: f32, scale: f32) -> Self {
        Self {
            translation,
            rotation,
            scale: sanitize_scale(scale),
        }
    }

    /// Placement at `translation` with no rotation and unit scale.
    pub fn from_translation(translation: Vec2) -> Self {
        Self::new(translation, 0.0, 1.0)
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = sanitize_scale(scale);
    }

    /// Maps a point from local space into world space.
    pub fn local_to_world_point(&self, local: Vec2) -> Vec2 {
        self.translation + Vec2::from_angle(self.rotation).rotate(local * self.scale)
    }

    /// Maps a point from world space into local space.
    pub fn world_to_local_point(&self, world: Vec2) -> Vec2 {
        Vec2::from_angle(-self.rotation).rotate(world - self.translation) / self.scale
    }

    /// Rotates a local direction into world space. Scale is not applied.
    pub fn rotate_to_world(&self, direction: Vec2) -> Vec2 {
        Vec2::from_angle(self.rotation).rotate(direction)
    }

    /// Local-to-world matrix in the 4x4 layout GPU shaders expect (z untouched).
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(self.scale, self.scale, 1.0),
            Quat::from_rotation_z(self.rotation),
            self.translation.extend(0.0),
        )
    }

    /// World-to-local counterpart of [`Placement::to_mat4`].
    pub fn inverse_mat4(&self) -> Mat4 {
        self.to_mat4().inverse()
    }
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > MIN_SCALE {
        scale
    } else {
        MIN_SCALE
    }
}
