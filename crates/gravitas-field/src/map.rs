//! Baked gravity maps: discrete grids of force and signed-distance samples.
//!
//! A map covers the unit square of a region's local space. It is produced by
//! an offline rasterizer and consumed here as an opaque buffer; the only
//! validation is that the dimensions are consistent.
//!
//! Maps are stored on disk as RON ([`BakedMapArtifact`]):
//!
//! ```ron
//! (
//!     width: 2,
//!     height: 2,
//!     padding: 0,
//!     centre_of_gravity: (0.5, 0.5),
//!     samples: [(0.0, 0.0, 1.0), (0.0, 0.0, 1.0), (0.0, 0.0, 1.0), (0.0, 0.0, 1.0)],
//! )
//! ```

use std::path::Path;

use glam::{UVec2, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// One grid sample: unit-intensity force and signed distance, both in the
/// region's local space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample {
    /// Force direction and relative strength.
    pub force: Vec2,
    /// Signed distance to the baked surface.
    pub signed_distance: f32,
}

impl Sample {
    pub fn new(force: Vec2, signed_distance: f32) -> Self {
        Self {
            force,
            signed_distance,
        }
    }

    /// Builds a sample from a `(force_x, force_y, signed_distance)` triple.
    pub fn from_triple([x, y, sd]: [f32; 3]) -> Self {
        Self::new(Vec2::new(x, y), sd)
    }

    /// The `(force_x, force_y, signed_distance)` triple.
    pub fn to_triple(self) -> [f32; 3] {
        [self.force.x, self.force.y, self.signed_distance]
    }

    pub(crate) fn to_vec3(self) -> Vec3 {
        self.force.extend(self.signed_distance)
    }
}

/// Serialized form of a baked map as written by the offline baking tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedMapArtifact {
    /// Samples per row, including padding.
    pub width: u32,
    /// Number of rows, including padding.
    pub height: u32,
    /// Padding (in samples) added around the source texture on each side.
    #[serde(default)]
    pub padding: u32,
    /// Normalized centre of gravity in `[0, 1]²`.
    pub centre_of_gravity: (f32, f32),
    /// Row-major `(force_x, force_y, signed_distance)` triples.
    pub samples: Vec<(f32, f32, f32)>,
}

/// A validated baked gravity map.
#[derive(Debug, Clone, PartialEq)]
pub struct GravityMap {
    width: u32,
    height: u32,
    padding: u32,
    samples: Vec<Sample>,
    centre_of_gravity: Vec2,
}

impl GravityMap {
    /// Creates a map from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidMapDimensions`] if either side is below 2,
    /// or [`FieldError::SampleCountMismatch`] if `samples.len() != width * height`.
    pub fn new(
        width: u32,
        height: u32,
        padding: u32,
        samples: Vec<Sample>,
        centre_of_gravity: Vec2,
    ) -> Result<Self, FieldError> {
        if width < 2 || height < 2 {
            return Err(FieldError::InvalidMapDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(FieldError::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            padding,
            samples,
            centre_of_gravity,
        })
    }

    /// Creates a map from `(force_x, force_y, signed_distance)` triples.
    pub fn from_triples(
        width: u32,
        height: u32,
        padding: u32,
        triples: &[[f32; 3]],
        centre_of_gravity: Vec2,
    ) -> Result<Self, FieldError> {
        let samples = triples.iter().copied().map(Sample::from_triple).collect();
        Self::new(width, height, padding, samples, centre_of_gravity)
    }

    /// Validates and converts a deserialized artifact.
    pub fn from_artifact(artifact: BakedMapArtifact) -> Result<Self, FieldError> {
        let samples = artifact
            .samples
            .into_iter()
            .map(|(x, y, sd)| Sample::from_triple([x, y, sd]))
            .collect();
        let (cx, cy) = artifact.centre_of_gravity;
        Self::new(
            artifact.width,
            artifact.height,
            artifact.padding,
            samples,
            Vec2::new(cx, cy),
        )
    }

    /// Converts back to the serializable artifact form.
    pub fn to_artifact(&self) -> BakedMapArtifact {
        BakedMapArtifact {
            width: self.width,
            height: self.height,
            padding: self.padding,
            centre_of_gravity: (self.centre_of_gravity.x, self.centre_of_gravity.y),
            samples: self
                .samples
                .iter()
                .map(|s| (s.force.x, s.force.y, s.signed_distance))
                .collect(),
        }
    }

    /// Parses a RON artifact.
    pub fn from_ron_str(contents: &str) -> Result<Self, FieldError> {
        let artifact: BakedMapArtifact = ron::from_str(contents).map_err(FieldError::MapParse)?;
        Self::from_artifact(artifact)
    }

    /// Loads a RON artifact from disk.
    pub fn load_ron(path: &Path) -> Result<Self, FieldError> {
        let contents = std::fs::read_to_string(path).map_err(FieldError::MapRead)?;
        let map = Self::from_ron_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            width = map.width,
            height = map.height,
            "loaded gravity map"
        );
        Ok(map)
    }

    /// Writes the map to disk as a RON artifact.
    pub fn save_ron(&self, path: &Path) -> Result<(), FieldError> {
        let serialized = ron::ser::to_string_pretty(&self.to_artifact(), ron::ser::PrettyConfig::new())
            .map_err(FieldError::MapSerialize)?;
        std::fs::write(path, serialized).map_err(FieldError::MapWrite)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Total grid size in samples.
    pub fn total_size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Size of the source texture before padding was added.
    pub fn texture_size(&self) -> UVec2 {
        UVec2::new(
            self.width.saturating_sub(self.padding * 2),
            self.height.saturating_sub(self.padding * 2),
        )
    }

    /// Interior cell count per axis: `(width - 1, height - 1)`.
    pub fn cells(&self) -> UVec2 {
        UVec2::new(self.width - 1, self.height - 1)
    }

    /// Normalized centre of gravity in `[0, 1]²`.
    pub fn centre_of_gravity(&self) -> Vec2 {
        self.centre_of_gravity
    }

    /// All samples, row-major.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample at grid coordinate `(x, y)`. Coordinates are clamped into the grid.
    pub fn sample(&self, x: u32, y: u32) -> Sample {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.samples[x + y * self.width as usize]
    }
}
