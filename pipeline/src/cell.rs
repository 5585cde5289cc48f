use parking_lot::RwLock;
use scorecast_core::Frame;
use std::sync::Arc;

/// Single-slot latest-value frame buffer.
///
/// The producer publishes by swapping the `Arc` handle under the lock;
/// frame contents are never mutated in place, so a reader can never observe
/// a torn frame. Overwrite-on-write, no queueing: consumers that fall
/// behind simply skip intermediate frames.
#[derive(Debug, Default)]
pub struct FrameCell {
    slot: RwLock<Option<Arc<Frame>>>,
}

impl FrameCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the slot contents. Readers holding the previous handle keep
    /// a complete frame.
    pub fn publish(&self, frame: Frame) {
        *self.slot.write() = Some(Arc::new(frame));
    }

    /// Non-blocking snapshot of the most recent frame, `None` before the
    /// first publish.
    pub fn snapshot(&self) -> Option<Arc<Frame>> {
        self.slot.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn empty_until_first_publish() {
        let cell = FrameCell::new();
        assert!(cell.snapshot().is_none());
    }

    #[test]
    fn publish_overwrites_previous_frame() {
        let cell = FrameCell::new();
        cell.publish(Frame::new(RgbImage::new(4, 4), 1));
        let first = cell.snapshot().unwrap();

        cell.publish(Frame::new(RgbImage::new(4, 4), 2));
        let second = cell.snapshot().unwrap();

        assert_eq!(first.sequence(), 1);
        assert_eq!(second.sequence(), 2);
    }

    #[test]
    fn old_handles_stay_valid_after_overwrite() {
        let cell = FrameCell::new();
        cell.publish(Frame::new(RgbImage::new(8, 8), 1));
        let held = cell.snapshot().unwrap();
        cell.publish(Frame::new(RgbImage::new(8, 8), 2));
        assert_eq!(held.sequence(), 1);
        assert_eq!(held.resolution().width, 8);
    }
}
