use crate::cell::FrameCell;
use crate::{PipelineError, Result};
use parking_lot::{Mutex, RwLock};
use scorecast_core::{Frame, Resolution};
use scorecast_videoio::CameraCapture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Backoff after a failed device read, so a wedged device does not spin a
/// core.
const READ_RETRY_DELAY: Duration = Duration::from_millis(5);

/// Continuous frame acquisition from a camera device.
///
/// Owns the capture handle on a dedicated thread that reads as fast as the
/// device delivers and publishes each frame to a latest-value cell. A failed
/// read is skipped (the previous frame stays published); it never terminates
/// the loop.
pub struct FrameSource {
    cell: Arc<FrameCell>,
    resolution: Arc<RwLock<Resolution>>,
    pending_resize: Arc<Mutex<Option<(u32, u32)>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FrameSource {
    /// Starts the acquisition loop over an already-open capture device.
    ///
    /// Opening the device (and failing with `DeviceUnavailable`) happens
    /// before construction; see `scorecast_videoio::open_camera`.
    pub fn spawn(capture: Box<dyn CameraCapture>) -> Result<Self> {
        let cell = Arc::new(FrameCell::new());
        let resolution = Arc::new(RwLock::new(capture.resolution()));
        let pending_resize = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));

        let handle = std::thread::Builder::new()
            .name("frame-source".to_string())
            .spawn({
                let cell = Arc::clone(&cell);
                let resolution = Arc::clone(&resolution);
                let pending_resize = Arc::clone(&pending_resize);
                let stop = Arc::clone(&stop);
                move || acquisition_loop(capture, cell, resolution, pending_resize, stop)
            })
            .map_err(|source| PipelineError::ThreadSpawn {
                name: "frame-source",
                source,
            })?;

        Ok(Self {
            cell,
            resolution,
            pending_resize,
            stop,
            handle: Some(handle),
        })
    }

    /// Most recently captured frame, `None` until the first successful read.
    /// Never blocks the caller on the acquisition loop.
    pub fn latest_frame(&self) -> Option<Arc<Frame>> {
        self.cell.snapshot()
    }

    /// The active capture resolution, updated after device renegotiation.
    pub fn resolution(&self) -> Resolution {
        *self.resolution.read()
    }

    /// Requests a device renegotiation; the acquisition loop applies it on
    /// its next cycle, so subsequent frames use the new size. A second
    /// request before that cycle supersedes the first.
    pub fn set_resolution(&self, width: u32, height: u32) {
        *self.pending_resize.lock() = Some((width, height));
    }

    pub(crate) fn cell(&self) -> Arc<FrameCell> {
        Arc::clone(&self.cell)
    }

    /// Signals the acquisition loop to exit and joins it.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        self.stop();
    }
}

fn acquisition_loop(
    mut capture: Box<dyn CameraCapture>,
    cell: Arc<FrameCell>,
    resolution: Arc<RwLock<Resolution>>,
    pending_resize: Arc<Mutex<Option<(u32, u32)>>>,
    stop: Arc<AtomicBool>,
) {
    let mut sequence: u64 = 0;
    while !stop.load(Ordering::Relaxed) {
        if let Some((width, height)) = pending_resize.lock().take() {
            match capture.set_resolution(width, height) {
                Ok(actual) => {
                    *resolution.write() = actual;
                    tracing::info!(%actual, "capture resolution renegotiated");
                }
                Err(e) => {
                    tracing::warn!(width, height, error = %e, "resolution change rejected");
                }
            }
        }

        match capture.read() {
            Ok(pixels) => {
                sequence += 1;
                cell.publish(Frame::new(pixels, sequence));
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping failed capture read");
                std::thread::sleep(READ_RETRY_DELAY);
            }
        }
    }
}
