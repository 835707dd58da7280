use thiserror::Error;

/// Error type returned by faceshape operations.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("failed to decode image: {0}")]
    InvalidImage(String),

    #[error("face detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("no face detected")]
    NoFaceFound,

    #[error("no detected face meets the minimum dimension")]
    NoFaceLargeEnough,

    #[error("degenerate crop region ({width}x{height})")]
    DegenerateCropRegion { width: u32, height: u32 },

    #[error("failed to encode image: {0}")]
    EncodeError(String),

    #[error("classification unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ShapeError {
    /// Whether a retry of the same run could plausibly succeed.
    ///
    /// Only transport-level classification failures qualify; everything else
    /// is deterministic for a given input.
    pub fn is_transient(&self) -> bool {
        matches!(self, ShapeError::ClassificationUnavailable(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShapeError>;
