use anyhow::Result;
use image::DynamicImage;
use std::collections::HashMap;

use crate::core::{Frame, MetricId, ScoreValue};

pub mod colorfulness;
pub mod exposure;
pub mod frame_diff;
pub mod gram_matrix;
pub mod sharpness;

pub use colorfulness::ColorfulnessMetric;
pub use exposure::ExposureMetric;
pub use frame_diff::FrameDifferenceMetric;
pub use gram_matrix::GramMatrixMetric;
pub use sharpness::SharpnessMetric;

/// Declared argument shape of a metric capability.
///
/// The dispatcher shapes the call from this tag; metric ids are never
/// string-matched to decide the split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// The metric receives the full frame sequence unmodified.
    Sequence,
    /// The metric compares a single reference frame against the rest of the
    /// sequence (style-comparison family).
    ReferenceVsSet,
}

/// Call arguments for one metric invocation, shaped per [`InputKind`].
#[derive(Clone, Copy, Debug)]
pub enum MetricInput<'a> {
    Sequence(&'a [Frame]),
    ReferenceVsSet {
        reference: &'a Frame,
        candidates: &'a [Frame],
    },
}

/// A single scoring capability over an image set.
///
/// Implementations must either return a score or signal failure through the
/// `Result`; a silent partial score is a contract violation.
pub trait MetricScorer: Send + Sync {
    fn input_kind(&self) -> InputKind {
        InputKind::Sequence
    }

    fn compute(&self, input: MetricInput<'_>) -> Result<ScoreValue>;
}

/// Table of metric capabilities the dispatcher consults by id.
#[derive(Default)]
pub struct MetricRegistry {
    scorers: HashMap<MetricId, Box<dyn MetricScorer>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability, replacing any earlier scorer under the same id.
    pub fn register(&mut self, id: impl Into<MetricId>, scorer: Box<dyn MetricScorer>) {
        self.scorers.insert(id.into(), scorer);
    }

    pub fn with_scorer(mut self, id: impl Into<MetricId>, scorer: Box<dyn MetricScorer>) -> Self {
        self.register(id, scorer);
        self
    }

    pub fn get(&self, id: &MetricId) -> Option<&dyn MetricScorer> {
        self.scorers.get(id).map(|scorer| scorer.as_ref())
    }

    pub fn contains(&self, id: &MetricId) -> bool {
        self.scorers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }
}

/// Registry of the built-in scorers, matching [`default_catalog`].
///
/// [`default_catalog`]: crate::catalog::default_catalog
pub fn default_registry() -> MetricRegistry {
    MetricRegistry::new()
        .with_scorer("sharpness", Box::new(SharpnessMetric::new()))
        .with_scorer("exposure", Box::new(ExposureMetric::new()))
        .with_scorer("colorfulness", Box::new(ColorfulnessMetric::new()))
        .with_scorer("gram_matrix", Box::new(GramMatrixMetric::new()))
        .with_scorer("frame_difference", Box::new(FrameDifferenceMetric::new()))
}

/// Luma plane of an image as row-major f32 in [0, 1].
pub(crate) fn luma_plane(image: &DynamicImage) -> (Vec<f32>, usize, usize) {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let plane = rgb
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
        })
        .collect();
    (plane, width as usize, height as usize)
}

/// RGB pixels of an image as f32 triples in [0, 1].
pub(crate) fn rgb_pixels(image: &DynamicImage) -> Vec<[f32; 3]> {
    image
        .to_rgb8()
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
        })
        .collect()
}
