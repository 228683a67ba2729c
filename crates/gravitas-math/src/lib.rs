//! 2D geometry primitives, placement transforms, and sampling helpers for the Gravitas field engine.

mod geometry;
mod interpolate;
mod placement;

pub use geometry::{
    NORMALIZE_EPSILON, clamp_length, closest_point_on_segment, safe_normalize,
    signed_distance_to_segment,
};
pub use interpolate::{bilinear, inverse_lerp, lerp};
pub use placement::{MIN_SCALE, Placement};
