//! One-shot calibration math: aspect-ratio estimation from a
//! perspective-distorted quadrilateral, rectified-size solving, and the
//! exact four-point projective transform.

pub mod aspect;
pub mod dimensions;
pub mod transform;

pub use aspect::{estimate_aspect_ratio, AspectRatio};
pub use dimensions::{solve_dimensions, RectifiedDimensions};
pub use transform::{build_transform, TransformMatrix};

pub type Result<T> = std::result::Result<T, CalibError>;

/// Degenerate corner-pin geometry, surfaced instead of NaN.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibError {
    #[error("three or more corners are collinear")]
    CollinearCorners,

    #[error("a vanishing point sits at infinity; focal length is undetermined")]
    ParallelEdges,

    #[error("squared focal length term is not positive ({0})")]
    NonPositiveFocal(f64),

    #[error("corner pin contains a zero-length edge")]
    ZeroLengthEdge,

    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f64),

    #[error("rectified dimensions collapsed to zero")]
    EmptyDimensions,

    #[error("corner correspondence is singular; no unique transform")]
    SingularTransform,
}
