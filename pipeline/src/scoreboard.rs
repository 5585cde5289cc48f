use crate::calibration::Calibration;
use crate::engine::RectificationEngine;
use crate::source::FrameSource;
use crate::{PipelineError, Result};
use nalgebra::Point2;
use scorecast_calib::RectifiedDimensions;
use scorecast_core::{CornerPin, Frame};
use std::sync::Arc;

/// Calibration lifecycle of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No corner pin accepted yet; no rectified output available.
    Uncalibrated,
    /// A corner pin is being turned into a transform (synchronous, within
    /// `accept_corner_pin`).
    Calibrating,
    /// The rectification engine is running. Terminal: recalibration
    /// requires rebuilding the pipeline.
    Streaming,
}

/// Front object of the capture-and-rectification pipeline.
///
/// Owns the frame source and, once a corner pin has been accepted, the
/// rectification engine. Calibration-derived state is written exactly once,
/// before the engine thread starts, and read-only afterwards.
pub struct ScoreboardPipeline {
    source: FrameSource,
    principal_point: Option<Point2<f64>>,
    state: PipelineState,
    calibration: Option<Calibration>,
    engine: Option<RectificationEngine>,
}

impl ScoreboardPipeline {
    pub fn new(source: FrameSource) -> Self {
        Self {
            source,
            principal_point: None,
            state: PipelineState::Uncalibrated,
            calibration: None,
            engine: None,
        }
    }

    /// Opens the configured camera and starts acquisition.
    #[cfg(all(target_os = "linux", feature = "v4l2"))]
    pub fn open(config: &crate::PipelineConfig) -> Result<Self> {
        let capture = scorecast_videoio::open_camera(
            config.device_index,
            config.capture_width,
            config.capture_height,
        )?;
        let mut pipeline = Self::new(FrameSource::spawn(capture)?);
        pipeline.principal_point = config.principal_point.map(|(u0, v0)| Point2::new(u0, v0));
        Ok(pipeline)
    }

    /// Overrides the principal point used by aspect estimation. Without an
    /// override it defaults to half the active capture resolution.
    pub fn with_principal_point(mut self, principal_point: Point2<f64>) -> Self {
        self.principal_point = Some(principal_point);
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn source(&self) -> &FrameSource {
        &self.source
    }

    /// Forwards a resolution change to the acquisition loop; takes effect
    /// on the next capture cycle.
    pub fn set_resolution(&self, width: u32, height: u32) {
        self.source.set_resolution(width, height);
    }

    /// Accepts the four corner points (clockwise from visual top-left),
    /// runs the calibration chain, and on success starts the rectification
    /// engine.
    ///
    /// On a degenerate pin the pipeline returns to `Uncalibrated` and the
    /// error tells the caller to collect a new pin. Once streaming, further
    /// pins are rejected with `AlreadyStreaming`.
    pub fn accept_corner_pin(&mut self, points: &[Point2<f64>]) -> Result<&Calibration> {
        if self.state == PipelineState::Streaming {
            return Err(PipelineError::AlreadyStreaming);
        }

        let pin = CornerPin::from_slice(points)?;
        self.state = PipelineState::Calibrating;

        let principal_point = self
            .principal_point
            .unwrap_or_else(|| self.source.resolution().center());

        let calibration = match Calibration::solve(pin, principal_point) {
            Ok(calibration) => calibration,
            Err(e) => {
                self.state = PipelineState::Uncalibrated;
                return Err(e.into());
            }
        };

        let engine = match RectificationEngine::spawn(self.source.cell(), &calibration) {
            Ok(engine) => engine,
            Err(e) => {
                self.state = PipelineState::Uncalibrated;
                return Err(e);
            }
        };

        self.engine = Some(engine);
        self.state = PipelineState::Streaming;
        Ok(self.calibration.insert(calibration))
    }

    /// Latest rectified frame; `None` until streaming has produced one.
    /// Non-blocking in every state.
    pub fn rectified_frame(&self) -> Option<Arc<Frame>> {
        self.engine.as_ref()?.latest_frame()
    }

    /// Rectified output size; `None` before calibration completes.
    pub fn rectified_dimensions(&self) -> Option<RectifiedDimensions> {
        self.calibration.as_ref().map(|c| c.dimensions())
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Stops the rectification engine, then the frame source, joining both
    /// loops.
    pub fn shutdown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.stop();
        }
        self.source.stop();
    }
}

impl Drop for ScoreboardPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
