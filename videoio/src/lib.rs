//! Camera capture and device enumeration.
//!
//! Exposes a backend-neutral [`CameraCapture`] trait; the V4L2 backend
//! covers Linux camera devices.

use image::RgbImage;
use scorecast_core::Resolution;
use std::path::PathBuf;

pub mod backends;
pub mod convert;

pub type Result<T> = std::result::Result<T, VideoError>;

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("invalid resolution {0}x{1}")]
    InvalidResolution(u32, u32),

    #[error("capture read failed: {0}")]
    ReadFailed(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// A camera device delivering RGB frames on demand.
///
/// `read` blocks until the device produces the next frame. The active
/// resolution may differ from the requested one when the driver rounds it.
pub trait CameraCapture: Send {
    fn is_opened(&self) -> bool;
    fn resolution(&self) -> Resolution;
    fn set_resolution(&mut self, width: u32, height: u32) -> Result<Resolution>;
    fn read(&mut self) -> Result<RgbImage>;
}

/// An enumerated capture device, for the collaborator UI's device picker.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub path: PathBuf,
}

/// Lists the capture devices currently present.
#[cfg(all(target_os = "linux", feature = "v4l2"))]
pub fn enumerate_devices() -> Vec<DeviceInfo> {
    backends::v4l2::list_devices()
}

/// Opens a camera by device index at the requested resolution.
///
/// Fails with [`VideoError::DeviceUnavailable`] when the device cannot be
/// opened; construction does not retry.
#[cfg(all(target_os = "linux", feature = "v4l2"))]
pub fn open_camera(index: usize, width: u32, height: u32) -> Result<Box<dyn CameraCapture>> {
    let mut cap = backends::V4L2Capture::new(index)?;
    cap.start_stream(width, height)?;
    Ok(Box::new(cap))
}
