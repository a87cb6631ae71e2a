//! Maps raw metric scores onto the common [0, 1] scale.
//!
//! Each metric gets a clamped min-max range; lower-is-better metrics (error
//! distances, clipping fractions) set `invert` so that 1.0 always reads as
//! "good". The contract with the dispatcher: same (aspect, metric) keys out
//! as in, `elapsed_seconds` untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{MetricId, NormalizedMetricResult, NormalizedScores, RawScores};

/// Min-max normalization window for one metric.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizationRange {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub invert: bool,
}

impl NormalizationRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            invert: false,
        }
    }

    /// Range for a lower-is-better metric.
    pub fn inverted(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            invert: true,
        }
    }

    /// The identity range: raw scores already live in [0, 1]. Idempotent.
    pub fn identity() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn apply(&self, raw: f64) -> f64 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 0.0;
        }
        let scaled = ((raw - self.min) / span).clamp(0.0, 1.0);
        if self.invert {
            1.0 - scaled
        } else {
            scaled
        }
    }
}

/// Per-metric normalization table.
///
/// Metrics without an entry fall back to the identity range, so externally
/// registered scorers that already emit [0, 1] need no configuration.
#[derive(Clone, Debug)]
pub struct ScoreNormalizer {
    ranges: BTreeMap<MetricId, NormalizationRange>,
    fallback: NormalizationRange,
}

impl ScoreNormalizer {
    pub fn new() -> Self {
        Self {
            ranges: BTreeMap::new(),
            fallback: NormalizationRange::identity(),
        }
    }

    pub fn with_range(mut self, id: impl Into<MetricId>, range: NormalizationRange) -> Self {
        self.ranges.insert(id.into(), range);
        self
    }

    /// Empirical windows for the built-in roster.
    pub fn default_ranges() -> Self {
        Self::new()
            .with_range("sharpness", NormalizationRange::new(0.0, 0.02))
            .with_range("exposure", NormalizationRange::inverted(0.0, 0.5))
            .with_range("colorfulness", NormalizationRange::new(0.0, 0.3))
            .with_range("gram_matrix", NormalizationRange::inverted(0.0, 1.0))
            .with_range("frame_difference", NormalizationRange::inverted(0.0, 0.25))
    }

    /// Apply configured overrides on top of the current table.
    pub fn with_overrides(
        mut self,
        overrides: &BTreeMap<MetricId, NormalizationRange>,
    ) -> Self {
        for (id, range) in overrides {
            self.ranges.insert(id.clone(), *range);
        }
        self
    }

    pub fn range_for(&self, id: &MetricId) -> NormalizationRange {
        self.ranges.get(id).copied().unwrap_or(self.fallback)
    }

    /// Normalize a raw result mapping. Keys and failure records pass through
    /// unchanged; every metric entry gains `score_normalized`.
    pub fn normalize(&self, raw: RawScores) -> NormalizedScores {
        let aspects = raw
            .aspects
            .into_iter()
            .map(|(aspect, metrics)| {
                let normalized = metrics
                    .into_iter()
                    .map(|(metric, result)| {
                        let score_normalized = self.range_for(&metric).apply(result.score.scalar());
                        (
                            metric,
                            NormalizedMetricResult {
                                score: result.score,
                                score_normalized,
                                elapsed_seconds: result.elapsed_seconds,
                            },
                        )
                    })
                    .collect();
                (aspect, normalized)
            })
            .collect();

        NormalizedScores {
            aspects,
            failures: raw.failures,
        }
    }
}

impl Default for ScoreNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
