//! Motion proxy: mean absolute luma delta between consecutive frames.
//!
//! Stands in for dense optical flow when no flow backend is registered.
//! Raw scores are lower-is-better; the normalizer inverts them.

use anyhow::{bail, Result};

use super::{luma_plane, MetricInput, MetricScorer};
use crate::core::ScoreValue;

pub struct FrameDifferenceMetric;

impl FrameDifferenceMetric {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FrameDifferenceMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricScorer for FrameDifferenceMetric {
    fn compute(&self, input: MetricInput<'_>) -> Result<ScoreValue> {
        let frames = match input {
            MetricInput::Sequence(frames) => frames,
            MetricInput::ReferenceVsSet { .. } => {
                bail!("frame_difference expects a frame sequence")
            }
        };
        if frames.len() < 2 {
            bail!("frame_difference needs at least two frames");
        }

        let planes: Vec<_> = frames
            .iter()
            .map(|frame| luma_plane(&frame.image))
            .collect();
        let (_, width, height) = planes[0];
        for (plane, w, h) in &planes {
            if (*w, *h) != (width, height) {
                bail!(
                    "frame dimensions differ: {}x{} vs {}x{}",
                    width,
                    height,
                    w,
                    h
                );
            }
            debug_assert_eq!(plane.len(), w * h);
        }

        let per_pair = planes
            .windows(2)
            .map(|pair| {
                let (a, _, _) = &pair[0];
                let (b, _, _) = &pair[1];
                let total: f64 = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x - y).abs() as f64)
                    .sum();
                total / a.len() as f64
            })
            .collect();
        Ok(ScoreValue::Series(per_pair))
    }
}
