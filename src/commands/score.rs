use anyhow::Result;
use std::path::PathBuf;

use crate::config;
use crate::core::{AspectId, Frame, MetricId};
use crate::io::discovery::discover_images;
use crate::io::output::{create_writer, DirectoryReport, OutputFormat};
use crate::pipeline::ScorePipeline;

pub struct ScoreOptions {
    pub dirs: Vec<PathBuf>,
    pub pattern: String,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub skip_aspects: Vec<String>,
    pub skip_metrics: Vec<String>,
    pub fail_on_error: bool,
    pub config: Option<PathBuf>,
}

/// Score every directory with one shared pipeline and print the reports.
pub fn run(options: ScoreOptions) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => config::load_explicit(path)?,
        None => config::load_config(),
    };
    config.merge_cli(
        options.skip_aspects.iter().map(AspectId::new),
        options.skip_metrics.iter().map(MetricId::new),
        options.fail_on_error,
    );

    let pipeline = ScorePipeline::with_defaults(&config)?;

    let mut reports = Vec::with_capacity(options.dirs.len());
    for dir in &options.dirs {
        let images = discover_images(dir, &options.pattern)?;
        log::info!(
            "scoring {} images from {} (pattern '{}')",
            images.len(),
            dir.display(),
            options.pattern
        );
        let frames = images
            .iter()
            .map(Frame::load)
            .collect::<crate::core::errors::Result<Vec<_>>>()?;
        let report = pipeline.run(&frames)?;
        reports.push(DirectoryReport {
            directory: dir.clone(),
            report,
        });
    }

    let mut writer = create_writer(options.format, options.output.as_deref())?;
    writer.write_reports(&reports)
}
