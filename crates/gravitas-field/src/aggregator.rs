//! The field aggregator: registry of live gravity sources and the combined
//! force / signed-distance queries built on top of them.
//!
//! Sources are iterated in registration order on every query so that
//! floating-point summation is reproducible for a given sequence of
//! register/deregister calls. Queries take `&self` and never mutate, so a
//! burst of queries (for example a trajectory prediction) can run on any
//! thread that holds a shared borrow.

use glam::Vec2;
use gravitas_config::FieldConfig;
use gravitas_math::{clamp_length, safe_normalize};

use crate::source::{GravitySource, SourceId, SourceKind};

/// Signed distance reported when no source contributes a surface.
pub const NO_SURFACE_DISTANCE: f32 = 1_000_000.0;

/// Default gravitational constant, tuned for gameplay scale.
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f32 = 667.4;

/// Default ceiling on the magnitude of the summed force.
pub const DEFAULT_MAX_FORCE: f32 = 100_000.0;

/// Default step for the finite-difference surface gradient.
pub const DEFAULT_SURFACE_PROBE_EPSILON: f32 = 0.1;

fn sanitize_gravitational_constant(gravitational_constant: f32) -> f32 {
    if gravitational_constant.is_finite() && gravitational_constant > 0.0 {
        return gravitational_constant;
    }
    tracing::warn!(
        gravitational_constant,
        fallback = DEFAULT_GRAVITATIONAL_CONSTANT,
        "gravitational constant must be positive and finite"
    );
    DEFAULT_GRAVITATIONAL_CONSTANT
}

/// Registry of gravity sources and the entry point for all field queries.
#[derive(Debug, Clone)]
pub struct FieldAggregator {
    pub(crate) sources: Vec<GravitySource>,
    gravitational_constant: f32,
    max_force: f32,
    surface_probe_epsilon: f32,
    pub(crate) descriptors_dirty: bool,
    pub(crate) samples_dirty: bool,
}

impl Default for FieldAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_MAX_FORCE)
    }
}

impl FieldAggregator {
    /// Creates an empty field.
    ///
    /// `max_force` is clamped to be non-negative. A gravitational constant
    /// that is not strictly positive and finite falls back to
    /// [`DEFAULT_GRAVITATIONAL_CONSTANT`].
    pub fn new(gravitational_constant: f32, max_force: f32) -> Self {
        Self {
            sources: Vec::new(),
            gravitational_constant: sanitize_gravitational_constant(gravitational_constant),
            max_force: max_force.max(0.0),
            surface_probe_epsilon: DEFAULT_SURFACE_PROBE_EPSILON,
            descriptors_dirty: true,
            samples_dirty: true,
        }
    }

    /// Creates an empty field from the `field` section of the configuration.
    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(config.gravitational_constant, config.max_force)
            .with_surface_probe_epsilon(config.surface_probe_epsilon)
    }

    /// Overrides the finite-difference step used by [`Self::direction_to_surface`].
    ///
    /// Coarse baked maps may need a step larger than one grid cell.
    /// Non-positive values fall back to the default.
    pub fn with_surface_probe_epsilon(mut self, epsilon: f32) -> Self {
        self.surface_probe_epsilon = if epsilon > 0.0 {
            epsilon
        } else {
            DEFAULT_SURFACE_PROBE_EPSILON
        };
        self
    }

    pub fn gravitational_constant(&self) -> f32 {
        self.gravitational_constant
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    pub fn surface_probe_epsilon(&self) -> f32 {
        self.surface_probe_epsilon
    }

    /// Changes the gravitational constant. GPU descriptors embed derived
    /// values (surface gravity), so this marks them dirty. Invalid values
    /// fall back to the default as in [`Self::new`].
    pub fn set_gravitational_constant(&mut self, gravitational_constant: f32) {
        self.gravitational_constant = sanitize_gravitational_constant(gravitational_constant);
        self.descriptors_dirty = true;
    }

    pub fn set_max_force(&mut self, max_force: f32) {
        self.max_force = max_force.max(0.0);
    }

    // -- Registry -----------------------------------------------------------

    /// Registers a source. Returns `false` (and changes nothing) if a source
    /// with the same id is already registered.
    pub fn register(&mut self, source: GravitySource) -> bool {
        if self.contains(source.id()) {
            tracing::warn!(id = ?source.id(), "gravity source already registered");
            return false;
        }

        tracing::debug!(id = ?source.id(), kind = ?source.kind(), "registered gravity source");
        self.samples_dirty |= source.kind() == SourceKind::Region;
        self.descriptors_dirty = true;
        self.sources.push(source);
        true
    }

    /// Removes a source, preserving the order of the remaining ones.
    /// Returns `None` if no source with that id is registered.
    pub fn deregister(&mut self, id: SourceId) -> Option<GravitySource> {
        let index = self.sources.iter().position(|s| s.id() == id)?;
        let source = self.sources.remove(index);

        tracing::debug!(id = ?id, kind = ?source.kind(), "deregistered gravity source");
        self.samples_dirty |= source.kind() == SourceKind::Region;
        self.descriptors_dirty = true;
        Some(source)
    }

    pub fn contains(&self, id: SourceId) -> bool {
        self.sources.iter().any(|s| s.id() == id)
    }

    pub fn source(&self, id: SourceId) -> Option<&GravitySource> {
        self.sources.iter().find(|s| s.id() == id)
    }

    /// Mutable access to a registered source. Setters on the source mark it
    /// dirty, which [`Self::is_dirty`] picks up.
    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut GravitySource> {
        self.sources.iter_mut().find(|s| s.id() == id)
    }

    /// Registered sources in iteration order.
    pub fn sources(&self) -> &[GravitySource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    // -- Queries ------------------------------------------------------------

    fn active(&self, exclude: Option<SourceId>) -> impl Iterator<Item = &GravitySource> {
        self.sources
            .iter()
            .filter(move |s| s.is_enabled() && Some(s.id()) != exclude)
    }

    /// Sum of all enabled sources' forces at `point`, clamped to the maximum
    /// force. `exclude` skips one source (a body should not feel its own pull).
    pub fn total_force(&self, point: Vec2, exclude: Option<SourceId>) -> Vec2 {
        let sum = self
            .active(exclude)
            .fold(Vec2::ZERO, |acc, s| acc + s.force(point, self.gravitational_constant));
        clamp_length(sum, self.max_force)
    }

    /// Minimum signed distance over all enabled sources, or
    /// [`NO_SURFACE_DISTANCE`] when none contribute.
    pub fn min_signed_distance(&self, point: Vec2, exclude: Option<SourceId>) -> f32 {
        self.active(exclude)
            .fold(NO_SURFACE_DISTANCE, |min, s| min.min(s.signed_distance(point)))
    }

    /// [`Self::total_force`] and [`Self::min_signed_distance`] in a single pass.
    pub fn total_force_and_signed_distance(
        &self,
        point: Vec2,
        exclude: Option<SourceId>,
    ) -> (Vec2, f32) {
        let (sum, min) = self.active(exclude).fold(
            (Vec2::ZERO, NO_SURFACE_DISTANCE),
            |(sum, min), s| {
                let (force, sd) = s.force_and_signed_distance(point, self.gravitational_constant);
                (sum + force, min.min(sd))
            },
        );
        (clamp_length(sum, self.max_force), min)
    }

    /// Unit vector pointing toward the nearest surface, from a central
    /// finite difference of the signed-distance field. Zero when the field
    /// is empty or flat.
    pub fn direction_to_surface(&self, point: Vec2, exclude: Option<SourceId>) -> Vec2 {
        let e = self.surface_probe_epsilon;
        let dx = Vec2::new(e, 0.0);
        let dy = Vec2::new(0.0, e);
        let gradient = Vec2::new(
            self.min_signed_distance(point + dx, exclude)
                - self.min_signed_distance(point - dx, exclude),
            self.min_signed_distance(point + dy, exclude)
                - self.min_signed_distance(point - dy, exclude),
        );
        safe_normalize(-gradient)
    }

    /// Estimated closest point on the nearest surface.
    pub fn closest_surface_point(&self, point: Vec2, exclude: Option<SourceId>) -> Vec2 {
        let signed_distance = self.min_signed_distance(point, exclude);
        point + self.direction_to_surface(point, exclude) * signed_distance.abs()
    }

    /// Alignment between the total force and the direction to the nearest
    /// surface: `1` when gravity pulls straight toward the surface, `-1` when
    /// it pushes straight away, `0` when either is undefined.
    pub fn gravity_polarity(&self, point: Vec2, exclude: Option<SourceId>) -> f32 {
        let force = safe_normalize(self.total_force(point, exclude));
        let to_surface = self.direction_to_surface(point, exclude);
        force.dot(to_surface).clamp(-1.0, 1.0)
    }

    /// Gravity a registered source currently feels at its own centre of
    /// gravity from every other source. `None` if `id` is not registered.
    pub fn current_gravity(&self, id: SourceId) -> Option<Vec2> {
        let centre = self.source(id)?.centre_of_gravity();
        Some(self.total_force(centre, Some(id)))
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
