//! Gravity sources: point masses, thick line segments, and baked regions.
//!
//! Every source exposes a force and a signed distance at any world point.
//! Sources are plain values; the [`FieldAggregator`](crate::FieldAggregator)
//! owns the registered copies and tracks their identity by [`SourceId`].

use std::sync::Arc;

use glam::Vec2;
use gravitas_math::{
    Placement, closest_point_on_segment, lerp, safe_normalize, signed_distance_to_segment,
};

use crate::map::GravityMap;
use crate::region::RegionShape;

/// Bias added to displacement vectors before normalizing so that a query
/// exactly at a source's centre still yields a finite direction.
pub const FORCE_EPSILON_BIAS: Vec2 = Vec2::splat(1e-5);

/// Stable identity of a gravity source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

/// Discriminant of a [`SourceShape`], matching the GPU type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SourceKind {
    Point = 0,
    Segment = 1,
    Region = 2,
}

/// A circle of mass. Inside `radius` the force falls off linearly to zero
/// at the centre; outside it follows the inverse-square law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointShape {
    /// World-space radius (not affected by placement scale).
    pub radius: f32,
}

/// Mass spread uniformly along a segment, thickened into a capsule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentShape {
    /// First endpoint in local space.
    pub a: Vec2,
    /// Second endpoint in local space.
    pub b: Vec2,
    /// Capsule half width in world units.
    pub half_width: f32,
}

/// Shape of a gravity source.
#[derive(Clone, Debug)]
pub enum SourceShape {
    Point(PointShape),
    Segment(SegmentShape),
    Region(RegionShape),
}

impl SourceShape {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceShape::Point(_) => SourceKind::Point,
            SourceShape::Segment(_) => SourceKind::Segment,
            SourceShape::Region(_) => SourceKind::Region,
        }
    }
}

/// A gravity source placed in the world.
#[derive(Clone, Debug)]
pub struct GravitySource {
    id: SourceId,
    shape: SourceShape,
    placement: Placement,
    mass: f32,
    bounciness: f32,
    colour: [f32; 4],
    enabled: bool,
    dirty: bool,
}

impl GravitySource {
    fn with_shape(id: SourceId, shape: SourceShape, placement: Placement, mass: f32) -> Self {
        Self {
            id,
            shape,
            placement,
            mass,
            bounciness: 0.0,
            colour: [1.0, 1.0, 1.0, 1.0],
            enabled: true,
            dirty: true,
        }
    }

    /// A point source centred at `centre`.
    pub fn point(id: SourceId, centre: Vec2, radius: f32, mass: f32) -> Self {
        Self::with_shape(
            id,
            SourceShape::Point(PointShape {
                radius: radius.max(0.0),
            }),
            Placement::from_translation(centre),
            mass,
        )
    }

    /// A segment source with world-space endpoints `a` and `b`.
    pub fn segment(id: SourceId, a: Vec2, b: Vec2, half_width: f32, mass: f32) -> Self {
        Self::with_shape(
            id,
            SourceShape::Segment(SegmentShape {
                a,
                b,
                half_width: half_width.max(0.0),
            }),
            Placement::IDENTITY,
            mass,
        )
    }

    /// A baked region covering the unit square of `placement`'s local space.
    pub fn region(id: SourceId, map: Arc<GravityMap>, placement: Placement, mass: f32) -> Self {
        Self::with_shape(
            id,
            SourceShape::Region(RegionShape::new(map)),
            placement,
            mass,
        )
    }

    /// Builder-style placement override.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Builder-style bounciness override (clamped to `[0, 1]`).
    pub fn with_bounciness(mut self, bounciness: f32) -> Self {
        self.bounciness = bounciness.clamp(0.0, 1.0);
        self
    }

    /// Builder-style colour override.
    pub fn with_colour(mut self, colour: [f32; 4]) -> Self {
        self.colour = colour;
        self
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn shape(&self) -> &SourceShape {
        &self.shape
    }

    pub fn kind(&self) -> SourceKind {
        self.shape.kind()
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn bounciness(&self) -> f32 {
        self.bounciness
    }

    pub fn colour(&self) -> [f32; 4] {
        self.colour
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the source changed since the aggregator last exported it.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.dirty = true;
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
        self.dirty = true;
    }

    pub fn set_bounciness(&mut self, bounciness: f32) {
        self.bounciness = bounciness.clamp(0.0, 1.0);
        self.dirty = true;
    }

    pub fn set_colour(&mut self, colour: [f32; 4]) {
        self.colour = colour;
        self.dirty = true;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.dirty = true;
    }

    /// Moves a segment's endpoints (local space). No-op for other shapes.
    pub fn set_endpoints(&mut self, a: Vec2, b: Vec2) {
        if let SourceShape::Segment(segment) = &mut self.shape {
            segment.a = a;
            segment.b = b;
            self.dirty = true;
        }
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Surface gravity of a point source: `G·m/r²`, or infinity for `r == 0`.
    /// `None` for other shapes.
    pub fn surface_gravity(&self, gravitational_constant: f32) -> Option<f32> {
        match &self.shape {
            SourceShape::Point(point) => Some(point_surface_gravity(
                point.radius,
                self.mass,
                gravitational_constant,
            )),
            _ => None,
        }
    }

    /// World-space endpoints of a segment source.
    pub fn world_endpoints(&self) -> Option<(Vec2, Vec2)> {
        match &self.shape {
            SourceShape::Segment(segment) => Some((
                self.placement.local_to_world_point(segment.a),
                self.placement.local_to_world_point(segment.b),
            )),
            _ => None,
        }
    }

    /// World-space centre of gravity.
    pub fn centre_of_gravity(&self) -> Vec2 {
        match &self.shape {
            SourceShape::Point(_) => self.placement.translation(),
            SourceShape::Segment(segment) => {
                let a = self.placement.local_to_world_point(segment.a);
                let b = self.placement.local_to_world_point(segment.b);
                (a + b) * 0.5
            }
            SourceShape::Region(region) => region.centre_of_gravity(&self.placement),
        }
    }

    /// Gravitational force this source exerts at `point`.
    pub fn force(&self, point: Vec2, gravitational_constant: f32) -> Vec2 {
        self.force_and_signed_distance(point, gravitational_constant).0
    }

    /// Signed distance from `point` to this source's surface.
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        match &self.shape {
            SourceShape::Point(shape) => {
                (point - self.placement.translation()).length() - shape.radius
            }
            SourceShape::Segment(shape) => {
                let a = self.placement.local_to_world_point(shape.a);
                let b = self.placement.local_to_world_point(shape.b);
                signed_distance_to_segment(a, b, shape.half_width, point)
            }
            SourceShape::Region(region) => region.signed_distance(&self.placement, point),
        }
    }

    /// Force and signed distance in one evaluation. Regions share a single
    /// map lookup between the two.
    pub fn force_and_signed_distance(&self, point: Vec2, gravitational_constant: f32) -> (Vec2, f32) {
        match &self.shape {
            SourceShape::Point(shape) => (
                point_force(
                    self.placement.translation(),
                    shape.radius,
                    self.mass,
                    gravitational_constant,
                    point,
                ),
                self.signed_distance(point),
            ),
            SourceShape::Segment(shape) => {
                let a = self.placement.local_to_world_point(shape.a);
                let b = self.placement.local_to_world_point(shape.b);
                (
                    segment_force(a, b, shape.half_width, self.mass, gravitational_constant, point),
                    signed_distance_to_segment(a, b, shape.half_width, point),
                )
            }
            SourceShape::Region(region) => {
                region.force_and_signed_distance(&self.placement, self.mass, gravitational_constant, point)
            }
        }
    }
}

fn point_surface_gravity(radius: f32, mass: f32, gravitational_constant: f32) -> f32 {
    if radius == 0.0 {
        f32::INFINITY
    } else {
        gravitational_constant * mass / (radius * radius)
    }
}

fn point_force(centre: Vec2, radius: f32, mass: f32, gravitational_constant: f32, point: Vec2) -> Vec2 {
    let difference = centre - point + FORCE_EPSILON_BIAS;
    let direction = safe_normalize(difference);
    if direction == Vec2::ZERO {
        return Vec2::ZERO;
    }

    let dist_sq = difference.length_squared();
    let magnitude = if radius > 0.0 && dist_sq < radius * radius {
        let surface = point_surface_gravity(radius, mass, gravitational_constant);
        lerp(0.0, surface, dist_sq.sqrt() / radius)
    } else {
        gravitational_constant * mass / dist_sq
    };

    direction * magnitude
}

fn segment_force(
    a: Vec2,
    b: Vec2,
    half_width: f32,
    mass: f32,
    gravitational_constant: f32,
    point: Vec2,
) -> Vec2 {
    let difference = closest_point_on_segment(a, b, point) - point + FORCE_EPSILON_BIAS;
    let to_surface = safe_normalize(difference) * (difference.length() - half_width);
    let direction = safe_normalize(to_surface);
    if direction == Vec2::ZERO {
        return Vec2::ZERO;
    }

    direction * (gravitational_constant * mass / to_surface.length_squared())
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f32 = 667.4;

    #[test]
    fn test_example_point_at_origin() {
        let source = GravitySource::point(SourceId(1), Vec2::ZERO, 0.0, 100.0);
        let force = source.force(Vec2::new(10.0, 0.0), G);
        assert!((force.x - (-667.4)).abs() < 0.01, "force={force:?}");
        assert!(force.y.abs() < 0.01, "force={force:?}");
    }

    #[test]
    fn test_inverse_square_falloff() {
        let source = GravitySource::point(SourceId(1), Vec2::new(2.0, -1.0), 0.0, 50.0);
        let dir = Vec2::new(0.6, 0.8);
        for (d1, d2) in [(1.0, 2.0), (3.0, 7.5), (10.0, 40.0)] {
            let f1 = source.force(Vec2::new(2.0, -1.0) + dir * d1, G).length();
            let f2 = source.force(Vec2::new(2.0, -1.0) + dir * d2, G).length();
            let expected = (d2 / d1) * (d2 / d1);
            assert!(
                ((f1 / f2) - expected).abs() / expected < 1e-3,
                "ratio {} expected {expected}",
                f1 / f2
            );
        }
    }

    #[test]
    fn test_interior_linear_attenuation() {
        let radius = 4.0;
        let mass = 30.0;
        let source = GravitySource::point(SourceId(1), Vec2::ZERO, radius, mass);
        let surface = G * mass / (radius * radius);

        // Only the epsilon bias separates the query from the centre.
        assert!(source.force(Vec2::ZERO, G).length() < surface * 1e-5);
        let at_surface = source.force(Vec2::new(radius, 0.0), G).length();
        assert!((at_surface - surface).abs() / surface < 1e-3);

        let mut previous = 0.0;
        for i in 1..=20 {
            let d = radius * i as f32 / 20.0;
            let magnitude = source.force(Vec2::new(0.0, d), G).length();
            assert!(magnitude >= previous, "not monotonic at d={d}");
            previous = magnitude;
        }
        let half = source.force(Vec2::new(0.0, radius * 0.5), G).length();
        assert!((half - surface * 0.5).abs() / surface < 1e-3);
    }

    #[test]
    fn test_negative_mass_repels() {
        let source = GravitySource::point(SourceId(1), Vec2::ZERO, 0.0, -10.0);
        let force = source.force(Vec2::new(5.0, 0.0), G);
        assert!(force.x > 0.0);
    }

    #[test]
    fn test_zero_mass_has_surface_but_no_force() {
        let source = GravitySource::point(SourceId(1), Vec2::ZERO, 2.0, 0.0);
        assert_eq!(source.force(Vec2::new(5.0, 0.0), G), Vec2::ZERO);
        assert!((source.signed_distance(Vec2::new(5.0, 0.0)) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_query_at_centre_is_finite() {
        let point = GravitySource::point(SourceId(1), Vec2::ZERO, 0.0, 10.0);
        assert!(point.force(Vec2::ZERO, G).is_finite());

        let segment = GravitySource::segment(SourceId(2), Vec2::ONE, Vec2::ONE, 0.0, 10.0);
        assert!(segment.force(Vec2::ONE, G).is_finite());
        assert!(segment.signed_distance(Vec2::ONE).is_finite());
    }

    #[test]
    fn test_segment_symmetry() {
        let a = Vec2::new(-3.0, 2.0);
        let b = Vec2::new(5.0, 2.0);
        let source = GravitySource::segment(SourceId(1), a, b, 0.5, 20.0);
        let midpoint = (a + b) * 0.5;
        for height in [1.0, 4.0, 25.0] {
            let p = midpoint + Vec2::new(0.0, height);
            let dir = safe_normalize(source.force(p, G));
            assert!((dir - Vec2::NEG_Y).length() < 1e-4, "dir={dir:?}");
        }
    }

    #[test]
    fn test_segment_force_uses_capsule_surface() {
        let source = GravitySource::segment(SourceId(1), Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), 1.0, 10.0);
        // 3 units above the line is 2 units above the capsule surface.
        let magnitude = source.force(Vec2::new(0.0, 3.0), G).length();
        let expected = G * 10.0 / 4.0;
        assert!((magnitude - expected).abs() / expected < 1e-3);
        assert!((source.signed_distance(Vec2::new(0.0, 3.0)) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_placement_moves_endpoints() {
        let source = GravitySource::segment(SourceId(1), Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), 0.0, 1.0)
            .with_placement(Placement::new(Vec2::new(0.0, 5.0), std::f32::consts::FRAC_PI_2, 2.0));
        let (a, b) = source.world_endpoints().unwrap();
        assert!((a - Vec2::new(0.0, 3.0)).length() < 1e-5);
        assert!((b - Vec2::new(0.0, 7.0)).length() < 1e-5);
        assert!((source.centre_of_gravity() - Vec2::new(0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_surface_gravity() {
        let solid = GravitySource::point(SourceId(1), Vec2::ZERO, 2.0, 8.0);
        assert_eq!(solid.surface_gravity(1.0), Some(2.0));
        let singular = GravitySource::point(SourceId(2), Vec2::ZERO, 0.0, 8.0);
        assert_eq!(singular.surface_gravity(1.0), Some(f32::INFINITY));
        let segment = GravitySource::segment(SourceId(3), Vec2::ZERO, Vec2::X, 0.0, 1.0);
        assert_eq!(segment.surface_gravity(1.0), None);
    }

    #[test]
    fn test_mutations_mark_dirty() {
        let mut source = GravitySource::point(SourceId(1), Vec2::ZERO, 1.0, 1.0);
        assert!(source.is_dirty());
        source.clear_dirty();
        source.set_mass(5.0);
        assert!(source.is_dirty());
        assert_eq!(source.mass(), 5.0);

        source.clear_dirty();
        source.set_bounciness(3.0);
        assert!(source.is_dirty());
        assert_eq!(source.bounciness(), 1.0);

        source.clear_dirty();
        source.set_endpoints(Vec2::ZERO, Vec2::ONE);
        assert!(!source.is_dirty(), "point sources have no endpoints");
    }

    #[test]
    fn test_combined_matches_separate() {
        let source = GravitySource::segment(SourceId(1), Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0), 0.25, 3.0);
        let p = Vec2::new(-1.5, 4.0);
        let (force, sd) = source.force_and_signed_distance(p, G);
        assert_eq!(force, source.force(p, G));
        assert_eq!(sd, source.signed_distance(p));
    }
}
