//! Style drift: Frobenius distance between channel Gram matrices.
//!
//! The first frame of the run is the style target; every other frame is
//! scored by how far its channel-correlation Gram matrix sits from the
//! target's. Raw scores are lower-is-better distances.

use anyhow::{bail, Result};
use image::DynamicImage;

use super::{rgb_pixels, InputKind, MetricInput, MetricScorer};
use crate::core::ScoreValue;

pub struct GramMatrixMetric;

impl GramMatrixMetric {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GramMatrixMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricScorer for GramMatrixMetric {
    fn input_kind(&self) -> InputKind {
        InputKind::ReferenceVsSet
    }

    fn compute(&self, input: MetricInput<'_>) -> Result<ScoreValue> {
        let (reference, candidates) = match input {
            MetricInput::ReferenceVsSet {
                reference,
                candidates,
            } => (reference, candidates),
            MetricInput::Sequence(_) => bail!("gram_matrix requires a reference frame"),
        };
        if candidates.is_empty() {
            bail!("gram_matrix needs at least one frame besides the reference");
        }

        let target = gram(&reference.image);
        let per_candidate = candidates
            .iter()
            .map(|frame| frobenius_distance(&target, &gram(&frame.image)))
            .collect();
        Ok(ScoreValue::Series(per_candidate))
    }
}

type Gram = [[f64; 3]; 3];

fn gram(image: &DynamicImage) -> Gram {
    let pixels = rgb_pixels(image);
    let n = pixels.len() as f64;
    let mut matrix = [[0.0; 3]; 3];
    for pixel in &pixels {
        for i in 0..3 {
            for j in 0..3 {
                matrix[i][j] += pixel[i] as f64 * pixel[j] as f64;
            }
        }
    }
    for row in &mut matrix {
        for value in row {
            *value /= n;
        }
    }
    matrix
}

fn frobenius_distance(a: &Gram, b: &Gram) -> f64 {
    let mut sum = 0.0;
    for i in 0..3 {
        for j in 0..3 {
            let delta = a[i][j] - b[i][j];
            sum += delta * delta;
        }
    }
    sum.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::solid_frame;

    #[test]
    fn identical_frames_have_zero_distance() {
        let metric = GramMatrixMetric::new();
        let frames = vec![solid_frame(4, 4, [30, 60, 90]); 3];
        let score = metric
            .compute(MetricInput::ReferenceVsSet {
                reference: &frames[0],
                candidates: &frames[1..],
            })
            .unwrap();
        assert!(score.scalar() < 1e-9);
    }

    #[test]
    fn diverging_style_increases_distance() {
        let metric = GramMatrixMetric::new();
        let reference = solid_frame(4, 4, [0, 0, 0]);
        let near = vec![solid_frame(4, 4, [10, 10, 10])];
        let far = vec![solid_frame(4, 4, [255, 255, 255])];
        let near_score = metric
            .compute(MetricInput::ReferenceVsSet {
                reference: &reference,
                candidates: &near,
            })
            .unwrap();
        let far_score = metric
            .compute(MetricInput::ReferenceVsSet {
                reference: &reference,
                candidates: &far,
            })
            .unwrap();
        assert!(far_score.scalar() > near_score.scalar());
    }

    #[test]
    fn reference_alone_is_an_error() {
        let metric = GramMatrixMetric::new();
        let reference = solid_frame(4, 4, [0, 0, 0]);
        let result = metric.compute(MetricInput::ReferenceVsSet {
            reference: &reference,
            candidates: &[],
        });
        assert!(result.is_err());
    }

    #[test]
    fn declares_reference_input_kind() {
        assert_eq!(GramMatrixMetric::new().input_kind(), InputKind::ReferenceVsSet);
    }
}
