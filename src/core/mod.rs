pub mod errors;

use chrono::{DateTime, Utc};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::errors::{Error, Result};

/// Identifier of a semantic evaluation category (e.g. "visual_quality").
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectId(String);

impl AspectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AspectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AspectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a single metric implementation (e.g. "sharpness").
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricId(String);

impl MetricId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MetricId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Raw score produced by a metric capability.
///
/// Most metrics return a single scalar; metrics that score every frame (or
/// every consecutive pair) may return the full series instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Scalar(f64),
    Series(Vec<f64>),
}

impl ScoreValue {
    /// Collapse the value to a single scalar. A series collapses to its mean;
    /// an empty series is defined as 0.0 so downstream aggregation stays total.
    pub fn scalar(&self) -> f64 {
        match self {
            ScoreValue::Scalar(v) => *v,
            ScoreValue::Series(values) if values.is_empty() => 0.0,
            ScoreValue::Series(values) => values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}

impl From<f64> for ScoreValue {
    fn from(v: f64) -> Self {
        ScoreValue::Scalar(v)
    }
}

/// Result of one successful metric computation. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub score: ScoreValue,
    pub elapsed_seconds: f64,
}

/// A [`MetricResult`] extended with its normalized score.
///
/// Only the normalizer produces this type; the dispatcher cannot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetricResult {
    pub score: ScoreValue,
    pub score_normalized: f64,
    pub elapsed_seconds: f64,
}

/// Typed record of an isolated metric failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricFailure {
    pub aspect: AspectId,
    pub metric: MetricId,
    pub message: String,
    pub elapsed_seconds: f64,
}

/// Per-aspect mapping of successful metric results.
pub type AspectResults = BTreeMap<MetricId, MetricResult>;

/// Per-aspect mapping of normalized metric results.
pub type NormalizedAspectResults = BTreeMap<MetricId, NormalizedMetricResult>;

/// Raw (pre-normalization) output of one dispatch pass.
///
/// Aspects that ran are always present, even with zero successful metrics;
/// aspects in the skip set are absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScores {
    pub aspects: BTreeMap<AspectId, AspectResults>,
    pub failures: Vec<MetricFailure>,
}

impl RawScores {
    /// Total number of successful metric entries across all aspects.
    pub fn metric_count(&self) -> usize {
        self.aspects.values().map(|metrics| metrics.len()).sum()
    }
}

/// Normalized counterpart of [`RawScores`]; same keys, same failures.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScores {
    pub aspects: BTreeMap<AspectId, NormalizedAspectResults>,
    pub failures: Vec<MetricFailure>,
}

/// Overall score of a run, or the distinguished marker for a run in which no
/// aspect produced any successful result. Never conflated with a real 0.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallScore {
    Score(f64),
    Undefined,
}

impl OverallScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            OverallScore::Score(v) => Some(*v),
            OverallScore::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, OverallScore::Undefined)
    }
}

impl fmt::Display for OverallScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallScore::Score(v) => write!(f, "{v:.3}"),
            OverallScore::Undefined => f.write_str("undefined"),
        }
    }
}

/// Fully aggregated result of one scoring run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreReport {
    pub generated_at: DateTime<Utc>,
    pub aspects: BTreeMap<AspectId, NormalizedAspectResults>,
    /// Average normalized score per aspect, only for aspects with at least
    /// one successful metric.
    pub aspect_scores: BTreeMap<AspectId, f64>,
    pub overall_score: OverallScore,
    pub total_elapsed_seconds: f64,
    pub failures: Vec<MetricFailure>,
}

/// An image handle passed to metric capabilities.
///
/// Frames are decoded once by the caller and shared read-only by every metric
/// in the run.
#[derive(Clone, Debug)]
pub struct Frame {
    pub path: Option<PathBuf>,
    pub image: DynamicImage,
}

impl Frame {
    /// Decode an image file into a frame.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| Error::image_read(path, e.to_string()))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            image,
        })
    }

    /// Wrap an already-decoded image (used by library callers and tests).
    pub fn from_image(image: DynamicImage) -> Self {
        Self { path: None, image }
    }

    /// Human-readable label for logs.
    pub fn label(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "<memory>".to_string(),
        }
    }
}
