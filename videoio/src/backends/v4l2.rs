//! Video4Linux2 capture backend

use crate::convert::yuyv_to_rgb;
use crate::{CameraCapture, DeviceInfo, Result, VideoError};
use image::RgbImage;
use scorecast_core::Resolution;
use v4l::buffer::Type;
use v4l::format::FourCC;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

/// Queue exactly one driver buffer so a read always surfaces the newest
/// frame instead of a stale queued one.
const DRIVER_BUFFERS: u32 = 1;

pub struct V4L2Capture {
    device: Device,
    stream: Option<MmapStream<'static>>,
    resolution: Resolution,
}

impl std::fmt::Debug for V4L2Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4L2Capture")
            .field("device", &"v4l::Device")
            .field("resolution", &self.resolution)
            .field("stream_active", &self.stream.is_some())
            .finish()
    }
}

impl V4L2Capture {
    pub fn new(index: usize) -> Result<Self> {
        let device = Device::new(index).map_err(|e| {
            VideoError::DeviceUnavailable(format!("/dev/video{}: {}", index, e))
        })?;

        Ok(Self {
            device,
            stream: None,
            resolution: Resolution { width: 0, height: 0 },
        })
    }

    /// Negotiates YUYV at the requested size and (re)creates the stream.
    ///
    /// The driver may round the size; the rounded values become the active
    /// resolution.
    pub fn start_stream(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(VideoError::InvalidResolution(width, height));
        }

        // The mmap stream pins the negotiated format; drop it before
        // renegotiating.
        self.stream = None;

        let mut fmt = self
            .device
            .format()
            .map_err(|e| VideoError::Backend(format!("failed to get format: {}", e)))?;
        fmt.width = width;
        fmt.height = height;
        fmt.fourcc = FourCC::new(b"YUYV");

        let actual = self
            .device
            .set_format(&fmt)
            .map_err(|e| VideoError::Backend(format!("failed to set format: {}", e)))?;
        if actual.fourcc != FourCC::new(b"YUYV") {
            return Err(VideoError::Backend(format!(
                "device does not deliver YUYV (got {})",
                actual.fourcc
            )));
        }
        if actual.width != width || actual.height != height {
            tracing::debug!(
                requested_width = width,
                requested_height = height,
                actual_width = actual.width,
                actual_height = actual.height,
                "driver rounded capture resolution"
            );
        }

        let stream = MmapStream::with_buffers(&self.device, Type::VideoCapture, DRIVER_BUFFERS)
            .map_err(|e| VideoError::Backend(format!("failed to create stream: {}", e)))?;

        self.resolution = Resolution {
            width: actual.width,
            height: actual.height,
        };
        self.stream = Some(stream);
        Ok(())
    }
}

impl CameraCapture for V4L2Capture {
    fn is_opened(&self) -> bool {
        self.stream.is_some()
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn set_resolution(&mut self, width: u32, height: u32) -> Result<Resolution> {
        self.start_stream(width, height)?;
        Ok(self.resolution)
    }

    fn read(&mut self) -> Result<RgbImage> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| VideoError::ReadFailed("stream not started".to_string()))?;

        let (data, _metadata) = stream
            .next()
            .map_err(|e| VideoError::ReadFailed(format!("failed to grab frame: {}", e)))?;

        yuyv_to_rgb(data, self.resolution.width, self.resolution.height)
    }
}

/// Enumerates V4L2 capture nodes with their display names.
pub fn list_devices() -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = v4l::context::enum_devices()
        .into_iter()
        .map(|node| DeviceInfo {
            index: node.index(),
            name: node
                .name()
                .unwrap_or_else(|| format!("video{}", node.index())),
            path: node.path().to_path_buf(),
        })
        .collect();
    devices.sort_by_key(|d| d.index);
    devices
}
