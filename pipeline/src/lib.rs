//! The capture-and-rectification runtime: a frame acquisition loop, a
//! rectification loop, and the one-shot calibration state machine wiring
//! them together.

pub mod calibration;
pub mod cell;
pub mod config;
pub mod engine;
pub mod scoreboard;
pub mod source;

pub use calibration::Calibration;
pub use cell::FrameCell;
pub use config::PipelineConfig;
pub use engine::RectificationEngine;
pub use scoreboard::{PipelineState, ScoreboardPipeline};
pub use source::FrameSource;

use scorecast_calib::CalibError;
use scorecast_core::CoreError;
use scorecast_videoio::VideoError;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    CornerPin(#[from] CoreError),

    #[error(transparent)]
    Calibration(#[from] CalibError),

    #[error(transparent)]
    Video(#[from] VideoError),

    #[error("pipeline is already streaming; rebuild it to recalibrate")]
    AlreadyStreaming,

    #[error("failed to spawn {name} thread: {source}")]
    ThreadSpawn {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
