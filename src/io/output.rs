use colored::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::{ScoreReport, ScoreValue};

#[derive(Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

/// One scored directory, as printed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectoryReport {
    pub directory: PathBuf,
    #[serde(flatten)]
    pub report: ScoreReport,
}

pub trait OutputWriter {
    fn write_reports(&mut self, reports: &[DirectoryReport]) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_reports(&mut self, reports: &[DirectoryReport]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(reports)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_report(&mut self, entry: &DirectoryReport) -> anyhow::Result<()> {
        writeln!(self.writer, "=========")?;
        writeln!(self.writer, "{}", entry.directory.display().to_string().bold())?;

        for (aspect, metrics) in &entry.report.aspects {
            match entry.report.aspect_scores.get(aspect) {
                Some(average) => writeln!(
                    self.writer,
                    "{}  {:.3}",
                    aspect.as_str().cyan().bold(),
                    average
                )?,
                None => writeln!(
                    self.writer,
                    "{}  {}",
                    aspect.as_str().cyan().bold(),
                    "no results".dimmed()
                )?,
            }
            for (metric, result) in metrics {
                writeln!(
                    self.writer,
                    "  {:<20} raw {:<12} norm {:.3}  {:.3}s",
                    metric.as_str(),
                    format_raw(&result.score),
                    result.score_normalized,
                    result.elapsed_seconds
                )?;
            }
        }

        if !entry.report.failures.is_empty() {
            writeln!(self.writer, "{}", "failures:".red().bold())?;
            for failure in &entry.report.failures {
                writeln!(
                    self.writer,
                    "  {}/{}: {}",
                    failure.aspect,
                    failure.metric.as_str().red(),
                    failure.message
                )?;
            }
        }

        let overall = entry.report.overall_score.to_string();
        let overall = if entry.report.overall_score.is_undefined() {
            overall.yellow().bold()
        } else {
            overall.green().bold()
        };
        writeln!(
            self.writer,
            "overall score: {}  (total {:.3}s)",
            overall, entry.report.total_elapsed_seconds
        )?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_reports(&mut self, reports: &[DirectoryReport]) -> anyhow::Result<()> {
        for entry in reports {
            self.write_report(entry)?;
        }
        Ok(())
    }
}

fn format_raw(score: &ScoreValue) -> String {
    match score {
        ScoreValue::Scalar(v) => format!("{v:.4}"),
        ScoreValue::Series(values) => format!("{:.4} (n={})", score.scalar(), values.len()),
    }
}

/// Writer for the requested format, to a file or stdout.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    })
}
