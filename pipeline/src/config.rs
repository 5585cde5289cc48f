use crate::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime configuration for the capture pipeline, loadable from JSON.
///
/// Passed explicitly into the pipeline rather than held in process-wide
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Index of the capture device to open (`/dev/videoN`).
    pub device_index: usize,
    /// Requested capture width in pixels; the driver may round it.
    pub capture_width: u32,
    /// Requested capture height in pixels.
    pub capture_height: u32,
    /// Optional principal-point override for aspect estimation; defaults
    /// to half the active capture resolution.
    pub principal_point: Option<(f64, f64)>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            capture_width: 1280,
            capture_height: 720,
            principal_point: None,
        }
    }
}

impl PipelineConfig {
    /// Loads a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| PipelineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
