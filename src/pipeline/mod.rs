//! Scorer dispatcher: drives the aspect/metric grid for one run.
//!
//! One pipeline instance owns one configuration; aspects and metrics are
//! visited strictly in catalog order, one at a time, so timing breakdowns
//! and logs reproduce across runs. A failing metric never prevents the rest
//! of the grid from running unless failure propagation is enabled.

use std::collections::HashSet;
use std::time::Instant;

use crate::catalog::{default_catalog, AspectCatalog};
use crate::config::ScoreConfig;
use crate::core::errors::{Error, Result};
use crate::core::{
    AspectId, AspectResults, Frame, MetricFailure, MetricId, MetricResult, RawScores,
    ScoreReport, ScoreValue,
};
use crate::metrics::{default_registry, InputKind, MetricInput, MetricRegistry, MetricScorer};
use crate::scoring::aggregation;
use crate::scoring::normalizer::ScoreNormalizer;

pub struct ScorePipeline {
    catalog: AspectCatalog,
    registry: MetricRegistry,
    normalizer: ScoreNormalizer,
    skip_aspects: HashSet<AspectId>,
    skip_metrics: HashSet<MetricId>,
    fail_on_error: bool,
}

impl ScorePipeline {
    /// Build a pipeline, validating the configuration against the catalog.
    ///
    /// Skip entries and normalization overrides naming ids the catalog does
    /// not know fail here, before any compute work starts.
    pub fn new(
        catalog: AspectCatalog,
        registry: MetricRegistry,
        normalizer: ScoreNormalizer,
        config: &ScoreConfig,
    ) -> Result<Self> {
        for aspect in &config.skip_aspects {
            if !catalog.contains_aspect(aspect) {
                return Err(Error::configuration(format!(
                    "unknown aspect '{aspect}' in skip configuration"
                )));
            }
        }
        for metric in &config.skip_metrics {
            if !catalog.contains_metric(metric) {
                return Err(Error::configuration(format!(
                    "unknown metric '{metric}' in skip configuration"
                )));
            }
        }
        for metric in config.normalization.keys() {
            if !catalog.contains_metric(metric) {
                return Err(Error::configuration(format!(
                    "unknown metric '{metric}' in normalization overrides"
                )));
            }
        }

        // A partial registry is allowed (the unscored metrics surface as
        // failure records), but it is worth a warning up front.
        for (aspect, spec) in catalog.iter() {
            for metric in &spec.metrics {
                if !registry.contains(metric) {
                    log::warn!("no scorer registered for metric '{metric}' (aspect '{aspect}')");
                }
            }
        }

        Ok(Self {
            catalog,
            registry,
            normalizer: normalizer.with_overrides(&config.normalization),
            skip_aspects: config.skip_aspects.iter().cloned().collect(),
            skip_metrics: config.skip_metrics.iter().cloned().collect(),
            fail_on_error: config.fail_on_error,
        })
    }

    /// Pipeline over the built-in catalog, registry, and normalization table.
    pub fn with_defaults(config: &ScoreConfig) -> Result<Self> {
        Self::new(
            default_catalog(),
            default_registry(),
            ScoreNormalizer::default_ranges(),
            config,
        )
    }

    /// Run the full pipeline: dispatch, normalize, aggregate.
    ///
    /// `total_elapsed_seconds` spans this call, including normalization and
    /// aggregation but not image discovery or decoding.
    pub fn run(&self, frames: &[Frame]) -> Result<ScoreReport> {
        let start = Instant::now();
        let raw = self.dispatch(frames)?;
        log::info!(
            "computed {} metric scores across {} aspects ({} failures)",
            raw.metric_count(),
            raw.aspects.len(),
            raw.failures.len()
        );
        let normalized = self.normalizer.normalize(raw);
        Ok(aggregation::aggregate(normalized, start.elapsed()))
    }

    /// Dispatch every enabled (aspect, metric) pair and collect raw results.
    ///
    /// Aspects in the skip set are absent from the output; aspects that ran
    /// are present even when no metric of theirs succeeded.
    pub fn dispatch(&self, frames: &[Frame]) -> Result<RawScores> {
        if frames.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut raw = RawScores::default();
        for (aspect, spec) in self.catalog.iter() {
            if self.skip_aspects.contains(aspect) {
                log::debug!("skipping aspect '{aspect}'");
                continue;
            }

            let mut results = AspectResults::new();
            for metric in &spec.metrics {
                if self.skip_metrics.contains(metric) {
                    log::debug!("skipping metric '{metric}' in aspect '{aspect}'");
                    continue;
                }

                let Some(scorer) = self.registry.get(metric) else {
                    self.record_failure(
                        &mut raw.failures,
                        aspect,
                        metric,
                        "not registered in the metric registry".to_string(),
                        0.0,
                    )?;
                    continue;
                };

                log::debug!("running metric '{metric}' for aspect '{aspect}'");
                let start = Instant::now();
                let outcome = invoke(scorer, frames);
                let elapsed = start.elapsed().as_secs_f64();
                match outcome {
                    Ok(score) => {
                        results.insert(
                            metric.clone(),
                            MetricResult {
                                score,
                                elapsed_seconds: elapsed,
                            },
                        );
                    }
                    Err(e) => {
                        self.record_failure(
                            &mut raw.failures,
                            aspect,
                            metric,
                            format!("{e:#}"),
                            elapsed,
                        )?;
                    }
                }
            }
            raw.aspects.insert(aspect.clone(), results);
        }
        Ok(raw)
    }

    /// Isolate a failure as a typed record, or abort in propagation mode.
    fn record_failure(
        &self,
        failures: &mut Vec<MetricFailure>,
        aspect: &AspectId,
        metric: &MetricId,
        message: String,
        elapsed_seconds: f64,
    ) -> Result<()> {
        if self.fail_on_error {
            return Err(Error::metric_computation(
                aspect.clone(),
                metric.clone(),
                message,
            ));
        }
        log::warn!("metric '{metric}' in aspect '{aspect}' failed: {message}");
        failures.push(MetricFailure {
            aspect: aspect.clone(),
            metric: metric.clone(),
            message,
            elapsed_seconds,
        });
        Ok(())
    }
}

fn invoke(scorer: &dyn MetricScorer, frames: &[Frame]) -> anyhow::Result<ScoreValue> {
    let input = match scorer.input_kind() {
        InputKind::Sequence => MetricInput::Sequence(frames),
        InputKind::ReferenceVsSet => MetricInput::ReferenceVsSet {
            reference: &frames[0],
            candidates: &frames[1..],
        },
    };
    scorer.compute(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AspectSpec;
    use anyhow::bail;
    use image::{DynamicImage, RgbImage};

    struct FixedScorer(f64);

    impl MetricScorer for FixedScorer {
        fn compute(&self, _input: MetricInput<'_>) -> anyhow::Result<ScoreValue> {
            Ok(ScoreValue::Scalar(self.0))
        }
    }

    struct FailingScorer;

    impl MetricScorer for FailingScorer {
        fn compute(&self, _input: MetricInput<'_>) -> anyhow::Result<ScoreValue> {
            bail!("model backend unavailable")
        }
    }

    fn frames(count: usize) -> Vec<Frame> {
        (0..count)
            .map(|_| Frame::from_image(DynamicImage::ImageRgb8(RgbImage::new(2, 2))))
            .collect()
    }

    fn one_aspect_catalog() -> AspectCatalog {
        AspectCatalog::new().with_aspect(
            "quality",
            AspectSpec::new([MetricId::new("m1"), MetricId::new("m2")]),
        )
    }

    #[test]
    fn unknown_skip_aspect_fails_construction() {
        let config = ScoreConfig {
            skip_aspects: vec![AspectId::new("nope")],
            ..ScoreConfig::default()
        };
        let result = ScorePipeline::new(
            one_aspect_catalog(),
            MetricRegistry::new(),
            ScoreNormalizer::new(),
            &config,
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn unknown_normalization_override_fails_construction() {
        let mut config = ScoreConfig::default();
        config.normalization.insert(
            MetricId::new("nope"),
            crate::scoring::normalizer::NormalizationRange::identity(),
        );
        let result = ScorePipeline::new(
            one_aspect_catalog(),
            MetricRegistry::new(),
            ScoreNormalizer::new(),
            &config,
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn empty_input_is_rejected_before_dispatch() {
        let pipeline = ScorePipeline::new(
            one_aspect_catalog(),
            MetricRegistry::new().with_scorer("m1", Box::new(FixedScorer(0.5))),
            ScoreNormalizer::new(),
            &ScoreConfig::default(),
        )
        .unwrap();
        assert!(matches!(pipeline.run(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn skipped_aspect_is_absent_but_all_metrics_skipped_is_empty() {
        let catalog = AspectCatalog::new()
            .with_aspect("skipped", AspectSpec::new([MetricId::new("m1")]))
            .with_aspect("emptied", AspectSpec::new([MetricId::new("m2")]));
        let config = ScoreConfig {
            skip_aspects: vec![AspectId::new("skipped")],
            skip_metrics: vec![MetricId::new("m2")],
            ..ScoreConfig::default()
        };
        let registry = MetricRegistry::new()
            .with_scorer("m1", Box::new(FixedScorer(0.5)))
            .with_scorer("m2", Box::new(FixedScorer(0.5)));
        let pipeline =
            ScorePipeline::new(catalog, registry, ScoreNormalizer::new(), &config).unwrap();

        let raw = pipeline.dispatch(&frames(2)).unwrap();
        assert!(!raw.aspects.contains_key(&AspectId::new("skipped")));
        assert!(raw.aspects[&AspectId::new("emptied")].is_empty());
        assert!(raw.failures.is_empty());
    }

    #[test]
    fn unregistered_metric_becomes_failure_record() {
        let pipeline = ScorePipeline::new(
            one_aspect_catalog(),
            MetricRegistry::new().with_scorer("m1", Box::new(FixedScorer(0.5))),
            ScoreNormalizer::new(),
            &ScoreConfig::default(),
        )
        .unwrap();

        let raw = pipeline.dispatch(&frames(2)).unwrap();
        assert_eq!(raw.metric_count(), 1);
        assert_eq!(raw.failures.len(), 1);
        assert_eq!(raw.failures[0].metric, MetricId::new("m2"));
        assert!(raw.failures[0].message.contains("not registered"));
    }

    #[test]
    fn failure_isolation_lets_later_metrics_run() {
        let registry = MetricRegistry::new()
            .with_scorer("m1", Box::new(FailingScorer))
            .with_scorer("m2", Box::new(FixedScorer(0.7)));
        let pipeline = ScorePipeline::new(
            one_aspect_catalog(),
            registry,
            ScoreNormalizer::new(),
            &ScoreConfig::default(),
        )
        .unwrap();

        let raw = pipeline.dispatch(&frames(2)).unwrap();
        let quality = &raw.aspects[&AspectId::new("quality")];
        assert!(quality.contains_key(&MetricId::new("m2")));
        assert_eq!(raw.failures.len(), 1);
        assert_eq!(raw.failures[0].metric, MetricId::new("m1"));
        assert!(raw.failures[0].message.contains("model backend unavailable"));
    }

    #[test]
    fn propagation_mode_aborts_on_first_failure() {
        let registry = MetricRegistry::new()
            .with_scorer("m1", Box::new(FailingScorer))
            .with_scorer("m2", Box::new(FixedScorer(0.7)));
        let config = ScoreConfig {
            fail_on_error: true,
            ..ScoreConfig::default()
        };
        let pipeline =
            ScorePipeline::new(one_aspect_catalog(), registry, ScoreNormalizer::new(), &config)
                .unwrap();

        match pipeline.run(&frames(2)) {
            Err(Error::MetricComputation { aspect, metric, message }) => {
                assert_eq!(aspect, AspectId::new("quality"));
                assert_eq!(metric, MetricId::new("m1"));
                assert!(message.contains("model backend unavailable"));
            }
            other => panic!("expected MetricComputation error, got {other:?}"),
        }
    }
}
