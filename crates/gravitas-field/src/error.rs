//! Field error types.

/// Errors raised when constructing field inputs or when a caller violates a
/// documented precondition.
///
/// Field queries never return errors; only construction and prediction do.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// A baked map must be at least 2x2 samples.
    #[error("invalid gravity map dimensions {width}x{height} (minimum 2x2)")]
    InvalidMapDimensions {
        /// Samples per row.
        width: u32,
        /// Number of rows.
        height: u32,
    },

    /// The sample buffer does not hold `width * height` entries.
    #[error("gravity map sample count mismatch: expected {expected}, got {actual}")]
    SampleCountMismatch {
        /// `width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// Prediction divides by mass.
    #[error("trajectory mass must be non-zero")]
    ZeroMass,

    /// Prediction requires a positive, finite time step.
    #[error("invalid time step: {0}")]
    InvalidTimeStep(f32),

    /// Prediction requires at least one step.
    #[error("trajectory must run at least one step")]
    ZeroSteps,

    /// An input value was NaN or infinite.
    #[error("non-finite input: {0}")]
    NonFiniteInput(&'static str),

    /// Failed to read a baked map artifact from disk.
    #[error("failed to read gravity map: {0}")]
    MapRead(#[source] std::io::Error),

    /// Failed to write a baked map artifact to disk.
    #[error("failed to write gravity map: {0}")]
    MapWrite(#[source] std::io::Error),

    /// Failed to parse a baked map artifact.
    #[error("failed to parse gravity map: {0}")]
    MapParse(#[source] ron::error::SpannedError),

    /// Failed to serialize a baked map artifact.
    #[error("failed to serialize gravity map: {0}")]
    MapSerialize(#[source] ron::Error),
}
