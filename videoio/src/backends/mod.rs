//! Camera capture backends

#[cfg(all(target_os = "linux", feature = "v4l2"))]
pub mod v4l2;

#[cfg(all(target_os = "linux", feature = "v4l2"))]
pub use v4l2::V4L2Capture;
