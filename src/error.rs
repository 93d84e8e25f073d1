use crate::types::{RunMode, Viewpoint};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlobeError {
    #[error("Target mask file '{}' does not exist", path.display())]
    MissingMask { path: PathBuf },

    #[error("Glyph image '{}' does not exist", path.display())]
    MissingGlyph { path: PathBuf },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Dimension mismatch: mask is {expected:?}, frame is {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Render error at {viewpoint}: {message}")]
    Render { viewpoint: Viewpoint, message: String },

    #[error("Generation {generation} ({mode}): evaluation failed")]
    Evaluation {
        generation: usize,
        mode: RunMode,
        #[source]
        source: Box<GlobeError>,
    },

    #[error("Invalid gene: {0}")]
    InvalidGene(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GlobeError>;
