//! Error type for the fallible edges of the crate (config files, model state, export).
//!
//! Pointer and keyboard handling never fail; they either act or do nothing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LassoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("SVG parse error: {0}")]
    Svg(#[from] usvg::Error),

    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error("cannot rasterise an empty surface ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    #[error("invalid color '{0}'")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, LassoError>;
