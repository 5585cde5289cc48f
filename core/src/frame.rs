use image::RgbImage;
use std::time::Instant;

/// Active capture size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(crate::CoreError::InvalidResolution(width, height));
        }
        Ok(Self { width, height })
    }

    /// Image center, the default principal point for aspect estimation.
    pub fn center(&self) -> nalgebra::Point2<f64> {
        nalgebra::Point2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single captured or rectified frame.
///
/// Frames are published by swapping an `Arc` handle and are never mutated
/// after construction. The sequence number is monotonic per producer, so
/// consumers can tell whether the latest slot actually changed.
#[derive(Clone)]
pub struct Frame {
    pixels: RgbImage,
    sequence: u64,
    captured_at: Instant,
}

impl Frame {
    pub fn new(pixels: RgbImage, sequence: u64) -> Self {
        Self {
            pixels,
            sequence,
            captured_at: Instant::now(),
        }
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("sequence", &self.sequence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_rejects_zero_axis() {
        assert!(Resolution::new(0, 720).is_err());
        assert!(Resolution::new(1280, 0).is_err());
        assert!(Resolution::new(1280, 720).is_ok());
    }

    #[test]
    fn resolution_center_is_half_size() {
        let r = Resolution::new(1280, 720).unwrap();
        assert_eq!(r.center(), nalgebra::Point2::new(640.0, 360.0));
    }

    #[test]
    fn frame_reports_buffer_size() {
        let frame = Frame::new(RgbImage::new(64, 48), 7);
        assert_eq!(frame.resolution(), Resolution::new(64, 48).unwrap());
        assert_eq!(frame.sequence(), 7);
    }
}
