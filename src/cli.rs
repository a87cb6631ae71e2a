use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report with per-metric timings
    Terminal,
    /// Machine-readable JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "framescore")]
#[command(about = "Aggregate quality scoring for generated image sets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score the image set in each given directory
    Score {
        /// Directories, each containing one image set
        #[arg(required = true)]
        dirs: Vec<PathBuf>,

        /// Glob for image files directly inside each directory
        #[arg(long, default_value = "*.png")]
        pattern: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Aspects to skip entirely
        #[arg(long = "skip-aspect", value_delimiter = ',')]
        skip_aspects: Vec<String>,

        /// Metrics to skip wherever they appear
        #[arg(long = "skip-metric", value_delimiter = ',')]
        skip_metrics: Vec<String>,

        /// Abort on the first metric failure instead of isolating it
        #[arg(long = "fail-on-error")]
        fail_on_error: bool,

        /// Configuration file (defaults to ./.framescore.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the default aspect catalog and its metric roster
    Aspects,
}
