//! Hasler–Süsstrunk colorfulness over the opponent axes rg and yb.

use anyhow::{bail, Result};
use image::DynamicImage;

use super::{rgb_pixels, MetricInput, MetricScorer};
use crate::core::ScoreValue;

pub struct ColorfulnessMetric;

impl ColorfulnessMetric {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ColorfulnessMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricScorer for ColorfulnessMetric {
    fn compute(&self, input: MetricInput<'_>) -> Result<ScoreValue> {
        let frames = match input {
            MetricInput::Sequence(frames) => frames,
            MetricInput::ReferenceVsSet { .. } => bail!("colorfulness expects a frame sequence"),
        };

        let per_frame = frames
            .iter()
            .map(|frame| colorfulness(&frame.image))
            .collect();
        Ok(ScoreValue::Series(per_frame))
    }
}

fn colorfulness(image: &DynamicImage) -> f64 {
    let pixels = rgb_pixels(image);
    let n = pixels.len() as f64;

    let mut sum_rg = 0.0;
    let mut sum_yb = 0.0;
    let mut sum_rg_sq = 0.0;
    let mut sum_yb_sq = 0.0;
    for [r, g, b] in &pixels {
        let rg = (*r - *g) as f64;
        let yb = (0.5 * (*r + *g) - *b) as f64;
        sum_rg += rg;
        sum_yb += yb;
        sum_rg_sq += rg * rg;
        sum_yb_sq += yb * yb;
    }

    let mean_rg = sum_rg / n;
    let mean_yb = sum_yb / n;
    let var_rg = (sum_rg_sq / n - mean_rg * mean_rg).max(0.0);
    let var_yb = (sum_yb_sq / n - mean_yb * mean_yb).max(0.0);

    (var_rg + var_yb).sqrt() + 0.3 * (mean_rg * mean_rg + mean_yb * mean_yb).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::solid_frame;

    #[test]
    fn grayscale_frame_scores_zero() {
        let metric = ColorfulnessMetric::new();
        let frames = vec![solid_frame(4, 4, [90, 90, 90])];
        let score = metric.compute(MetricInput::Sequence(&frames)).unwrap();
        assert!(score.scalar() < 1e-9);
    }

    #[test]
    fn saturated_frame_scores_higher_than_gray() {
        let metric = ColorfulnessMetric::new();
        let gray = vec![solid_frame(4, 4, [90, 90, 90])];
        let red = vec![solid_frame(4, 4, [255, 0, 0])];
        let gray_score = metric.compute(MetricInput::Sequence(&gray)).unwrap();
        let red_score = metric.compute(MetricInput::Sequence(&red)).unwrap();
        assert!(red_score.scalar() > gray_score.scalar());
    }
}
