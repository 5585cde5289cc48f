pub mod corner_pin;
pub mod frame;

pub use corner_pin::{CornerPin, EdgeLengths};
pub use frame::{Frame, Resolution};

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("corner pin needs exactly 4 points, got {0}")]
    InvalidCornerPin(usize),

    #[error("corner coordinates must be finite")]
    NonFiniteCorner,

    #[error("invalid resolution {0}x{1}")]
    InvalidResolution(u32, u32),
}
