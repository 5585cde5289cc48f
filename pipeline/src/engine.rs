use crate::calibration::Calibration;
use crate::cell::FrameCell;
use crate::{PipelineError, Result};
use nalgebra::Matrix3;
use scorecast_calib::{CalibError, RectifiedDimensions};
use scorecast_core::Frame;
use scorecast_imgproc::warp_perspective;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Idle wait while the raw cell has nothing new to rectify.
const POLL_DELAY: Duration = Duration::from_millis(1);

/// Continuous perspective correction of the latest raw frame.
///
/// Runs its own thread, uncoordinated with the acquisition loop: it always
/// rectifies whatever frame is currently published, skipping any raw frames
/// that were overwritten in between. Output frames are exactly the
/// calibrated rectified size.
pub struct RectificationEngine {
    cell: Arc<FrameCell>,
    dimensions: RectifiedDimensions,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RectificationEngine {
    /// Starts the rectification loop against the source's raw frame cell.
    ///
    /// The warp maps destination coordinates back into the source, so the
    /// forward corner-pin homography is inverted once here; a
    /// non-invertible transform is rejected before any thread starts.
    pub(crate) fn spawn(raw: Arc<FrameCell>, calibration: &Calibration) -> Result<Self> {
        let inverse = calibration
            .transform()
            .try_inverse()
            .ok_or(PipelineError::Calibration(CalibError::SingularTransform))?;
        let matrix: Matrix3<f32> = inverse.matrix().cast();
        let dimensions = calibration.dimensions();

        let cell = Arc::new(FrameCell::new());
        let stop = Arc::new(AtomicBool::new(false));

        let handle = std::thread::Builder::new()
            .name("rectifier".to_string())
            .spawn({
                let raw = Arc::clone(&raw);
                let cell = Arc::clone(&cell);
                let stop = Arc::clone(&stop);
                move || {
                    rectification_loop(
                        raw,
                        cell,
                        matrix,
                        dimensions.width(),
                        dimensions.height(),
                        stop,
                    )
                }
            })
            .map_err(|source| PipelineError::ThreadSpawn {
                name: "rectifier",
                source,
            })?;

        Ok(Self {
            cell,
            dimensions,
            stop,
            handle: Some(handle),
        })
    }

    /// Most recent rectified frame, `None` until the first raw frame has
    /// been processed. Never blocks.
    pub fn latest_frame(&self) -> Option<Arc<Frame>> {
        self.cell.snapshot()
    }

    pub fn dimensions(&self) -> RectifiedDimensions {
        self.dimensions
    }

    /// Signals the rectification loop to exit and joins it.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RectificationEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

fn rectification_loop(
    raw: Arc<FrameCell>,
    out: Arc<FrameCell>,
    matrix: Matrix3<f32>,
    width: u32,
    height: u32,
    stop: Arc<AtomicBool>,
) {
    let mut last_sequence = 0u64;
    while !stop.load(Ordering::Relaxed) {
        let Some(frame) = raw.snapshot() else {
            std::thread::sleep(POLL_DELAY);
            continue;
        };
        // Rectifying the same frame again would produce identical output;
        // wait for the slot to change instead.
        if frame.sequence() == last_sequence {
            std::thread::sleep(POLL_DELAY);
            continue;
        }
        last_sequence = frame.sequence();

        let warped = warp_perspective(frame.pixels(), &matrix, width, height);
        out.publish(Frame::new(warped, frame.sequence()));
    }
}
