// Export modules for library usage
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    AspectId, Frame, MetricFailure, MetricId, MetricResult, NormalizedMetricResult,
    NormalizedScores, OverallScore, RawScores, ScoreReport, ScoreValue,
};

pub use crate::core::errors::{Error, Result};

pub use crate::catalog::{default_catalog, AspectCatalog, AspectSpec};

pub use crate::config::ScoreConfig;

pub use crate::metrics::{
    default_registry, InputKind, MetricInput, MetricRegistry, MetricScorer,
};

pub use crate::pipeline::ScorePipeline;

pub use crate::scoring::{
    aggregate, aspect_average, aspect_averages, overall_score, NormalizationRange,
    ScoreNormalizer,
};

pub use crate::io::{create_writer, discover_images, DirectoryReport, OutputWriter};
