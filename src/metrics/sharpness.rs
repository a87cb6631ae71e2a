//! Focus proxy: variance of the Laplacian response over each frame.
//!
//! Blurry frames flatten the response and the variance collapses toward
//! zero. Raw scores are higher-is-better.

use anyhow::{bail, Result};
use image::DynamicImage;

use super::{luma_plane, MetricInput, MetricScorer};
use crate::core::ScoreValue;

pub struct SharpnessMetric;

impl SharpnessMetric {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SharpnessMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricScorer for SharpnessMetric {
    fn compute(&self, input: MetricInput<'_>) -> Result<ScoreValue> {
        let frames = match input {
            MetricInput::Sequence(frames) => frames,
            MetricInput::ReferenceVsSet { .. } => bail!("sharpness expects a frame sequence"),
        };

        let per_frame = frames
            .iter()
            .map(|frame| laplacian_variance(&frame.image))
            .collect();
        Ok(ScoreValue::Series(per_frame))
    }
}

fn laplacian_variance(image: &DynamicImage) -> f64 {
    let (plane, width, height) = luma_plane(image);
    if width < 3 || height < 3 {
        // No interior pixels to convolve over.
        return 0.0;
    }

    let mut responses = Vec::with_capacity((width - 2) * (height - 2));
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = y * width + x;
            let response = plane[idx - 1] + plane[idx + 1] + plane[idx - width]
                + plane[idx + width]
                - 4.0 * plane[idx];
            responses.push(response as f64);
        }
    }

    let n = responses.len() as f64;
    let mean = responses.iter().sum::<f64>() / n;
    responses.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::{checker_frame, solid_frame};

    #[test]
    fn flat_frame_scores_zero() {
        let metric = SharpnessMetric::new();
        let frames = vec![solid_frame(8, 8, [120, 120, 120])];
        let score = metric.compute(MetricInput::Sequence(&frames)).unwrap();
        assert!(score.scalar() < 1e-9);
    }

    #[test]
    fn high_contrast_beats_flat() {
        let metric = SharpnessMetric::new();
        let flat = vec![solid_frame(8, 8, [120, 120, 120])];
        let busy = vec![checker_frame(8, 8)];
        let flat_score = metric.compute(MetricInput::Sequence(&flat)).unwrap();
        let busy_score = metric.compute(MetricInput::Sequence(&busy)).unwrap();
        assert!(busy_score.scalar() > flat_score.scalar());
    }

    #[test]
    fn tiny_frames_are_handled() {
        let metric = SharpnessMetric::new();
        let frames = vec![solid_frame(2, 2, [0, 0, 0])];
        let score = metric.compute(MetricInput::Sequence(&frames)).unwrap();
        assert_eq!(score.scalar(), 0.0);
    }

    #[test]
    fn reference_shape_is_rejected() {
        let metric = SharpnessMetric::new();
        let frames = vec![solid_frame(4, 4, [0, 0, 0]); 2];
        let result = metric.compute(MetricInput::ReferenceVsSet {
            reference: &frames[0],
            candidates: &frames[1..],
        });
        assert!(result.is_err());
    }
}
