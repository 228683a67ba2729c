use glam::Vec2;

/// Vectors at or below this length are treated as having no direction.
pub const NORMALIZE_EPSILON: f32 = 1e-5;

/// Returns the point on segment `a`–`b` closest to `p`.
///
/// The projection parameter is clamped to `[0, 1]`. A degenerate segment
/// (`a == b`) returns `a`.
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ba = b - a;
    let len_sq = ba.dot(ba);
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ba) / len_sq).clamp(0.0, 1.0);
    a + ba * t
}

/// Signed distance from `p` to the capsule formed by thickening segment
/// `a`–`b` by `half_width`. Negative inside the capsule.
pub fn signed_distance_to_segment(a: Vec2, b: Vec2, half_width: f32, p: Vec2) -> f32 {
    (p - closest_point_on_segment(a, b, p)).length() - half_width
}

/// Normalizes `v`, mapping vectors of length ≤ [`NORMALIZE_EPSILON`] to zero
/// instead of NaN.
pub fn safe_normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len <= NORMALIZE_EPSILON {
        Vec2::ZERO
    } else {
        v / len
    }
}

/// Scales `v` down so its length does not exceed `max`.
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > max * max {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}
