pub mod warp;

pub use warp::{warp_perspective, warp_perspective_ex};

/// Pixel sampling strategy for geometric transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Nearest,
    Linear,
}

/// How samples outside the source image are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// Fill with a constant gray level.
    Constant(u8),
    /// Clamp to the nearest edge pixel.
    Replicate,
}
