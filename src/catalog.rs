//! Aspect catalog: which metrics belong to which evaluation aspect.
//!
//! The catalog is read-only for the duration of a run. Entries keep their
//! insertion order because dispatch order is an observable part of the
//! pipeline contract (timing breakdowns and logs must be reproducible).

use serde::{Deserialize, Serialize};

use crate::core::{AspectId, MetricId};

/// Metric roster and metadata for one aspect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AspectSpec {
    pub metrics: Vec<MetricId>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub description: String,
}

fn default_weight() -> f64 {
    1.0
}

impl AspectSpec {
    pub fn new(metrics: impl IntoIterator<Item = MetricId>) -> Self {
        Self {
            metrics: metrics.into_iter().collect(),
            weight: default_weight(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Insertion-ordered mapping from aspect id to its metric roster.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AspectCatalog {
    aspects: Vec<(AspectId, AspectSpec)>,
}

impl AspectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an aspect. A duplicate id replaces the earlier roster in place,
    /// keeping the original position.
    pub fn with_aspect(mut self, id: impl Into<AspectId>, spec: AspectSpec) -> Self {
        let id = id.into();
        match self.aspects.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing_spec)) => *existing_spec = spec,
            None => self.aspects.push((id, spec)),
        }
        self
    }

    pub fn aspect(&self, id: &AspectId) -> Option<&AspectSpec> {
        self.aspects
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, spec)| spec)
    }

    pub fn contains_aspect(&self, id: &AspectId) -> bool {
        self.aspect(id).is_some()
    }

    /// Whether any aspect lists this metric.
    pub fn contains_metric(&self, id: &MetricId) -> bool {
        self.aspects
            .iter()
            .any(|(_, spec)| spec.metrics.contains(id))
    }

    /// Iterate aspects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&AspectId, &AspectSpec)> {
        self.aspects.iter().map(|(id, spec)| (id, spec))
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }
}

/// The built-in aspect roster.
///
/// Model-backed metrics (CLIP-family scorers, flow networks, pose estimators)
/// are external capabilities; register them on top of [`default_registry`]
/// and add their aspects here via [`AspectCatalog::with_aspect`].
///
/// [`default_registry`]: crate::metrics::default_registry
pub fn default_catalog() -> AspectCatalog {
    AspectCatalog::new()
        .with_aspect(
            "visual_quality",
            AspectSpec::new([MetricId::new("sharpness"), MetricId::new("exposure")])
                .with_description("per-frame fidelity: focus and exposure"),
        )
        .with_aspect(
            "color_quality",
            AspectSpec::new([MetricId::new("colorfulness")])
                .with_description("chromatic richness of the set"),
        )
        .with_aspect(
            "style_consistency",
            AspectSpec::new([MetricId::new("gram_matrix")])
                .with_description("style drift against the reference frame"),
        )
        .with_aspect(
            "temporal_consistency",
            AspectSpec::new([MetricId::new("frame_difference")])
                .with_description("frame-to-frame stability"),
        )
}
