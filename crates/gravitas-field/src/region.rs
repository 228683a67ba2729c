//! Rasterized ("complex") regions: bilinear sampling of a baked map plus an
//! analytic far field outside the baked square.
//!
//! The baked square spans `[-0.5, 0.5]²` in the region's local space. Inside
//! it, force and signed distance come from the map. Outside it, the region
//! behaves like a point mass at its baked centre of gravity, and the signed
//! distance is extrapolated from the boundary so it stays continuous across
//! the edge of the baked square.

use std::sync::Arc;

use glam::Vec2;
use gravitas_math::{Placement, bilinear, inverse_lerp, lerp, safe_normalize};

use crate::map::GravityMap;
use crate::source::FORCE_EPSILON_BIAS;

/// Half extent of the baked square in local units.
pub const BAKED_HALF_EXTENT: f32 = 0.5;

/// Half extent of the inset square used when estimating the boundary gradient.
/// The 0.02 inset guarantees all four probe samples land inside the map.
pub const GRADIENT_HALF_EXTENT: f32 = 0.48;

/// Diagonal probe offset (local units) for boundary gradient estimation.
pub const GRADIENT_PROBE: f32 = 0.01;

/// A region shape backed by a shared baked map.
#[derive(Debug, Clone)]
pub struct RegionShape {
    map: Arc<GravityMap>,
}

/// Result of sampling a region at the closest point inside its baked square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSample {
    /// Interpolated force rotated into world space (unit intensity, mass not applied).
    pub force: Vec2,
    /// Interpolated signed distance in world units.
    pub signed_distance: f32,
    /// Whether the query point itself was inside the baked square.
    pub in_bounds: bool,
}

impl RegionShape {
    pub fn new(map: Arc<GravityMap>) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &Arc<GravityMap> {
        &self.map
    }

    /// World-space centre of gravity.
    pub fn centre_of_gravity(&self, placement: &Placement) -> Vec2 {
        let cog = self.map.centre_of_gravity();
        let local = Vec2::new(
            lerp(-BAKED_HALF_EXTENT, BAKED_HALF_EXTENT, cog.x),
            lerp(-BAKED_HALF_EXTENT, BAKED_HALF_EXTENT, cog.y),
        );
        placement.local_to_world_point(local)
    }

    /// Samples the map at the point of the baked square closest to `point`.
    pub fn sample_clamped(&self, placement: &Placement, point: Vec2) -> RegionSample {
        let local = placement.world_to_local_point(point);
        self.sample_local(placement, local)
    }

    fn sample_local(&self, placement: &Placement, local: Vec2) -> RegionSample {
        let normalized = Vec2::new(
            inverse_lerp(
                -BAKED_HALF_EXTENT,
                BAKED_HALF_EXTENT,
                local.x.clamp(-BAKED_HALF_EXTENT, BAKED_HALF_EXTENT),
            ),
            inverse_lerp(
                -BAKED_HALF_EXTENT,
                BAKED_HALF_EXTENT,
                local.y.clamp(-BAKED_HALF_EXTENT, BAKED_HALF_EXTENT),
            ),
        );

        let cells = self.map.cells();
        let scaled = normalized * cells.as_vec2();
        let cx = (scaled.x.floor() as u32).min(cells.x - 1);
        let cy = (scaled.y.floor() as u32).min(cells.y - 1);
        // The far edge lands in the last cell with a fraction of 1.
        let fx = (scaled.x - cx as f32).clamp(0.0, 1.0);
        let fy = (scaled.y - cy as f32).clamp(0.0, 1.0);

        let interpolated = bilinear(
            fx,
            fy,
            self.map.sample(cx, cy).to_vec3(),
            self.map.sample(cx + 1, cy).to_vec3(),
            self.map.sample(cx, cy + 1).to_vec3(),
            self.map.sample(cx + 1, cy + 1).to_vec3(),
        );

        RegionSample {
            force: placement.rotate_to_world(interpolated.truncate()),
            signed_distance: interpolated.z * placement.scale(),
            in_bounds: is_inside(local, BAKED_HALF_EXTENT),
        }
    }

    /// Vector from `point` toward the closest surface of the baked body.
    ///
    /// Inside the baked square this is derived from the map directly. Outside
    /// it, the displacement to the baked boundary is combined with the
    /// surface gradient estimated just inside the boundary; its length is a
    /// signed-distance-like scalar that matches the map at the boundary.
    pub fn boundary_vector(&self, placement: &Placement, point: Vec2) -> Vec2 {
        let local = placement.world_to_local_point(point);

        let on_bounds = placement.local_to_world_point(clamp_square(local, BAKED_HALF_EXTENT));
        let vector_to_bounds = on_bounds - point;

        let probe_centre = clamp_square(local, GRADIENT_HALF_EXTENT);
        let e = GRADIENT_PROBE;
        let offsets = [
            Vec2::new(e, -e),
            Vec2::new(-e, -e),
            Vec2::new(-e, e),
            Vec2::new(e, e),
        ];
        let weighted = offsets.iter().fold(Vec2::ZERO, |acc, &offset| {
            let sd = self
                .sample_local(placement, probe_centre + offset)
                .signed_distance;
            acc + offset * sd
        });
        let gradient = placement.rotate_to_world(-safe_normalize(weighted));

        let signed_distance = self.sample_local(placement, local).signed_distance;
        vector_to_bounds + gradient * signed_distance
    }

    /// Combined force and signed distance for a region of the given mass.
    pub(crate) fn force_and_signed_distance(
        &self,
        placement: &Placement,
        mass: f32,
        gravitational_constant: f32,
        point: Vec2,
    ) -> (Vec2, f32) {
        let sample = self.sample_clamped(placement, point);
        if sample.in_bounds {
            return (sample.force * (mass / placement.scale()), sample.signed_distance);
        }

        let force = self.far_field_force(placement, mass, gravitational_constant, point);
        let signed_distance = self.boundary_vector(placement, point).length();
        (force, signed_distance)
    }

    pub(crate) fn signed_distance(&self, placement: &Placement, point: Vec2) -> f32 {
        let sample = self.sample_clamped(placement, point);
        if sample.in_bounds {
            sample.signed_distance
        } else {
            self.boundary_vector(placement, point).length()
        }
    }

    /// Inverse-square pull toward the baked centre of gravity.
    fn far_field_force(
        &self,
        placement: &Placement,
        mass: f32,
        gravitational_constant: f32,
        point: Vec2,
    ) -> Vec2 {
        let difference = self.centre_of_gravity(placement) - point + FORCE_EPSILON_BIAS;
        let dist_sq = difference.length_squared();
        let direction = safe_normalize(difference);
        if direction == Vec2::ZERO {
            return Vec2::ZERO;
        }
        direction * (gravitational_constant * mass / dist_sq)
    }
}

fn clamp_square(v: Vec2, half_extent: f32) -> Vec2 {
    v.clamp(Vec2::splat(-half_extent), Vec2::splat(half_extent))
}

fn is_inside(v: Vec2, half_extent: f32) -> bool {
    v.x >= -half_extent && v.x <= half_extent && v.y >= -half_extent && v.y <= half_extent
}
