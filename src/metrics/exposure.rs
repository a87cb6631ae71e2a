//! Exposure clipping: fraction of pixels crushed to black or blown to white.
//!
//! Raw scores are lower-is-better; the normalizer inverts them.

use anyhow::{bail, Result};

use super::{luma_plane, MetricInput, MetricScorer};
use crate::core::ScoreValue;

const CRUSH_THRESHOLD: f32 = 0.02;
const BLOWN_THRESHOLD: f32 = 0.98;

pub struct ExposureMetric;

impl ExposureMetric {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExposureMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricScorer for ExposureMetric {
    fn compute(&self, input: MetricInput<'_>) -> Result<ScoreValue> {
        let frames = match input {
            MetricInput::Sequence(frames) => frames,
            MetricInput::ReferenceVsSet { .. } => bail!("exposure expects a frame sequence"),
        };

        let per_frame = frames
            .iter()
            .map(|frame| {
                let (plane, _, _) = luma_plane(&frame.image);
                let clipped = plane
                    .iter()
                    .filter(|&&l| l < CRUSH_THRESHOLD || l > BLOWN_THRESHOLD)
                    .count();
                clipped as f64 / plane.len() as f64
            })
            .collect();
        Ok(ScoreValue::Series(per_frame))
    }
}
