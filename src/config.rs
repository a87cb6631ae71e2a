//! Run configuration: skip sets, failure propagation, normalization overrides.
//!
//! Configuration is explicit and per-pipeline; there is no ambient state, so
//! runs with different configurations can coexist in one process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::core::errors::{Error, Result};
use crate::core::{AspectId, MetricId};
use crate::scoring::normalizer::NormalizationRange;

pub const CONFIG_FILE_NAME: &str = ".framescore.toml";

/// Root configuration for one scoring pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Aspects excluded from the run entirely.
    #[serde(default)]
    pub skip_aspects: Vec<AspectId>,

    /// Metrics excluded wherever they appear.
    #[serde(default)]
    pub skip_metrics: Vec<MetricId>,

    /// Abort the whole run on the first metric failure instead of isolating
    /// it (debugging aid).
    #[serde(default)]
    pub fail_on_error: bool,

    /// Normalization window overrides keyed by metric id.
    #[serde(default)]
    pub normalization: BTreeMap<MetricId, NormalizationRange>,
}

impl ScoreConfig {
    /// Fold command-line flags into a loaded configuration. Skip lists are
    /// unioned; the failure flag is sticky.
    pub fn merge_cli(
        &mut self,
        skip_aspects: impl IntoIterator<Item = AspectId>,
        skip_metrics: impl IntoIterator<Item = MetricId>,
        fail_on_error: bool,
    ) {
        for aspect in skip_aspects {
            if !self.skip_aspects.contains(&aspect) {
                self.skip_aspects.push(aspect);
            }
        }
        for metric in skip_metrics {
            if !self.skip_metrics.contains(&metric) {
                self.skip_metrics.push(metric);
            }
        }
        self.fail_on_error |= fail_on_error;
    }
}

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse config from a TOML string
pub fn parse_config(contents: &str) -> std::result::Result<ScoreConfig, String> {
    toml::from_str::<ScoreConfig>(contents)
        .map_err(|e| format!("failed to parse {CONFIG_FILE_NAME}: {e}"))
}

/// Load a configuration the user asked for by path. Unlike the implicit
/// search this fails loudly; a typoed --config must not silently become the
/// default configuration.
pub fn load_explicit(path: &Path) -> Result<ScoreConfig> {
    let contents = read_config_file(path).map_err(|e| {
        Error::configuration(format!("cannot read config {}: {e}", path.display()))
    })?;
    parse_config(&contents).map_err(Error::Configuration)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<ScoreConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{e}; using defaults");
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found".
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Load `.framescore.toml` from the current directory, falling back to the
/// default configuration.
pub fn load_config() -> ScoreConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("failed to get current directory: {e}; using default config");
            return ScoreConfig::default();
        }
    };

    try_load_config_from_path(&current.join(CONFIG_FILE_NAME)).unwrap_or_default()
}
