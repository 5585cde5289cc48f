pub use scorecast_calib as calib;
pub use scorecast_core as core;
pub use scorecast_imgproc as imgproc;
pub use scorecast_pipeline as pipeline;
pub use scorecast_videoio as videoio;

pub use scorecast_pipeline::{PipelineConfig, PipelineState, ScoreboardPipeline};
