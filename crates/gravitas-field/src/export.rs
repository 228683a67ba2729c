//! Flat, GPU-ready export of the registered sources.
//!
//! Export is pull-based: a host polls [`FieldAggregator::is_dirty`], calls
//! [`FieldAggregator::export_descriptors`] when something changed, uploads
//! the result, then calls [`FieldAggregator::clear_dirty`].

use bytemuck::{Pod, Zeroable};

use crate::aggregator::FieldAggregator;
use crate::source::{GravitySource, SourceShape};

/// Per-source record, laid out for a storage buffer.
///
/// Variant payloads:
///   - point: `data_1 = (radius, surface_gravity, radius², 0)`
///   - segment: `data_1 = (a.x, a.y, half_width, 0)`, `data_2 = (b.x, b.y, 0, 0)`
///     with local endpoints
///   - region: `data_1 = (sample_start, width, height, scale)`,
///     `data_2 = (world_cog.x, world_cog.y, 0, 0)`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SourceDescriptor {
    /// Local-to-world matrix, column-major.
    pub transform: [[f32; 4]; 4],
    /// World-to-local matrix, column-major.
    pub inverse_transform: [[f32; 4]; 4],
    /// Shape tag: 0 point, 1 segment, 2 region.
    pub kind: u32,
    pub data_1: [f32; 4],
    pub data_2: [f32; 4],
    pub mass: f32,
    /// Linear RGBA.
    pub colour: [f32; 4],
    pub bounciness: f32,
    /// Reserved, aligns the struct to 16 bytes.
    pub _pad: [u32; 1],
}

static_assertions::assert_eq_size!(SourceDescriptor, [u8; 192]);

/// Everything a GPU consumer needs to evaluate the field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldExport {
    /// One descriptor per enabled source, in registry order.
    pub descriptors: Vec<SourceDescriptor>,
    /// Samples of every registered region, concatenated in registry order.
    pub samples: Vec<[f32; 3]>,
}

impl SourceDescriptor {
    fn from_source(source: &GravitySource, gravitational_constant: f32, sample_start: u32) -> Self {
        let placement = source.placement();
        let mut data_1 = [0.0; 4];
        let mut data_2 = [0.0; 4];

        match source.shape() {
            SourceShape::Point(point) => {
                let surface_gravity = source.surface_gravity(gravitational_constant).unwrap_or(0.0);
                data_1 = [point.radius, surface_gravity, point.radius * point.radius, 0.0];
            }
            SourceShape::Segment(segment) => {
                data_1 = [segment.a.x, segment.a.y, segment.half_width, 0.0];
                data_2 = [segment.b.x, segment.b.y, 0.0, 0.0];
            }
            SourceShape::Region(region) => {
                let map = region.map();
                let cog = source.centre_of_gravity();
                data_1 = [
                    sample_start as f32,
                    map.width() as f32,
                    map.height() as f32,
                    placement.scale(),
                ];
                data_2 = [cog.x, cog.y, 0.0, 0.0];
            }
        }

        Self {
            transform: placement.to_mat4().to_cols_array_2d(),
            inverse_transform: placement.inverse_mat4().to_cols_array_2d(),
            kind: source.kind() as u32,
            data_1,
            data_2,
            mass: source.mass(),
            colour: source.colour(),
            bounciness: source.bounciness(),
            _pad: [0],
        }
    }
}

impl FieldAggregator {
    /// Whether anything visible to the GPU changed since the last
    /// [`Self::clear_dirty`].
    pub fn is_dirty(&self) -> bool {
        self.descriptors_dirty || self.samples_dirty || self.sources.iter().any(|s| s.is_dirty())
    }

    /// Whether the concatenated region samples changed, so a host can skip
    /// re-uploading the (large) sample buffer when only descriptors moved.
    pub fn is_sample_data_dirty(&self) -> bool {
        self.samples_dirty
    }

    /// Builds descriptors for every enabled source plus the concatenated
    /// region sample buffer.
    ///
    /// Region sample offsets are assigned over all registered regions,
    /// enabled or not, so toggling a region never reshuffles the buffer.
    pub fn export_descriptors(&self) -> FieldExport {
        let mut export = FieldExport::default();

        for source in &self.sources {
            let sample_start = export.samples.len() as u32;
            if let SourceShape::Region(region) = source.shape() {
                export
                    .samples
                    .extend(region.map().samples().iter().map(|s| s.to_triple()));
            }
            if source.is_enabled() {
                export.descriptors.push(SourceDescriptor::from_source(
                    source,
                    self.gravitational_constant(),
                    sample_start,
                ));
            }
        }

        tracing::debug!(
            descriptors = export.descriptors.len(),
            samples = export.samples.len(),
            "exported gravity field"
        );
        export
    }

    /// Clears the aggregator's and every source's dirty flags.
    pub fn clear_dirty(&mut self) {
        self.descriptors_dirty = false;
        self.samples_dirty = false;
        for source in &mut self.sources {
            source.clear_dirty();
        }
    }
}
