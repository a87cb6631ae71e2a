//! Shared error types for the scoring pipeline

use crate::core::{AspectId, MetricId};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for framescore operations
#[derive(Debug, Error)]
pub enum Error {
    /// A metric capability failed while failure propagation was enabled
    #[error("metric '{metric}' in aspect '{aspect}' failed: {message}")]
    MetricComputation {
        aspect: AspectId,
        metric: MetricId,
        message: String,
    },

    /// Configuration errors (unknown aspect/metric ids, bad ranges)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The pipeline was invoked with an empty image sequence
    #[error("no input images were supplied")]
    EmptyInput,

    /// An image file could not be read or decoded
    #[error("failed to read image {path}: {message}")]
    ImageRead { path: PathBuf, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Glob pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a metric computation error from a collaborator failure
    pub fn metric_computation(
        aspect: AspectId,
        metric: MetricId,
        message: impl Into<String>,
    ) -> Self {
        Self::MetricComputation {
            aspect,
            metric,
            message: message.into(),
        }
    }

    /// Create an image read error with path context
    pub fn image_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ImageRead {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
