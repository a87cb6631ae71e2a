pub mod aggregation;
pub mod normalizer;

pub use aggregation::{aggregate, aspect_average, aspect_averages, overall_score};
pub use normalizer::{NormalizationRange, ScoreNormalizer};
