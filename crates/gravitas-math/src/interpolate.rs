use glam::Vec3;

/// Linear interpolation between `a` and `b`. `t` is not clamped.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b`.
///
/// Returns `0.0` when `a == b`.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b { 0.0 } else { (value - a) / (b - a) }
}

/// Bilinear interpolation across one grid cell.
///
/// Corner layout:
/// - `a` at `(x, y)`
/// - `b` at `(x + 1, y)`
/// - `c` at `(x, y + 1)`
/// - `d` at `(x + 1, y + 1)`
///
/// `fx`/`fy` are the fractional offsets inside the cell. At `(0, 0)` the
/// result is exactly `a`, at `(1, 1)` exactly `d`.
pub fn bilinear(fx: f32, fy: f32, a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Vec3 {
    let bottom = a + (b - a) * fx;
    let top = c + (d - c) * fx;
    bottom + (top - bottom) * fy
}
