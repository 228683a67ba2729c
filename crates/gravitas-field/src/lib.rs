//! Variable-gravity field: point, segment, and baked-region sources, their
//! aggregation, trajectory prediction, and GPU export.
//!
//! Everything is driven through an explicit [`FieldAggregator`]: register
//! sources, then query forces and signed distances at world points.

mod aggregator;
mod error;
mod export;
mod map;
mod orientation;
mod predictor;
mod region;
mod source;

pub use aggregator::{
    DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_MAX_FORCE, DEFAULT_SURFACE_PROBE_EPSILON,
    FieldAggregator, NO_SURFACE_DISTANCE,
};
pub use error::FieldError;
pub use export::{FieldExport, SourceDescriptor};
pub use map::{BakedMapArtifact, GravityMap, Sample};
pub use orientation::direction_to_gravity_space;
pub use predictor::{TrajectoryParams, TrajectorySample, predict, predict_into, step};
pub use region::{
    BAKED_HALF_EXTENT, GRADIENT_HALF_EXTENT, GRADIENT_PROBE, RegionSample, RegionShape,
};
pub use source::{
    FORCE_EPSILON_BIAS, GravitySource, PointShape, SegmentShape, SourceId, SourceKind,
    SourceShape,
};
