//! Pure aggregation functions reducing normalized scores to the report.
//!
//! Aspects without a single successful metric are excluded from both the
//! numerator and the denominator of the overall mean; they never count as
//! zero. Zero contributing aspects yields [`OverallScore::Undefined`].

use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::core::{
    AspectId, NormalizedAspectResults, NormalizedScores, OverallScore, ScoreReport,
};

/// Unweighted mean of `score_normalized` across present entries, or `None`
/// for an empty aspect.
pub fn aspect_average(results: &NormalizedAspectResults) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let total: f64 = results.values().map(|r| r.score_normalized).sum();
    Some(total / results.len() as f64)
}

/// Per-aspect averages, skipping aspects with no results.
pub fn aspect_averages(scores: &NormalizedScores) -> BTreeMap<AspectId, f64> {
    scores
        .aspects
        .iter()
        .filter_map(|(aspect, results)| {
            aspect_average(results).map(|avg| (aspect.clone(), avg))
        })
        .collect()
}

/// Unweighted mean of the per-aspect averages.
pub fn overall_score(averages: &BTreeMap<AspectId, f64>) -> OverallScore {
    if averages.is_empty() {
        return OverallScore::Undefined;
    }
    let total: f64 = averages.values().sum();
    OverallScore::Score(total / averages.len() as f64)
}

/// Reduce normalized scores to the final report, attaching wall-clock time.
pub fn aggregate(scores: NormalizedScores, total_elapsed: Duration) -> ScoreReport {
    let averages = aspect_averages(&scores);
    let overall = overall_score(&averages);

    ScoreReport {
        generated_at: Utc::now(),
        aspects: scores.aspects,
        aspect_scores: averages,
        overall_score: overall,
        total_elapsed_seconds: total_elapsed.as_secs_f64(),
        failures: scores.failures,
    }
}
