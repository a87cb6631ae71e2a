use anyhow::Result;
use clap::Parser;
use framescore::cli::{Cli, Commands, OutputFormat};
use framescore::commands;
use framescore::io::output;

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Score {
            dirs,
            pattern,
            format,
            output,
            skip_aspects,
            skip_metrics,
            fail_on_error,
            config,
        } => commands::score::run(commands::score::ScoreOptions {
            dirs,
            pattern,
            format: convert_output_format(format),
            output,
            skip_aspects,
            skip_metrics,
            fail_on_error,
            config,
        }),
        Commands::Aspects => commands::aspects::run(),
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

fn convert_output_format(format: OutputFormat) -> output::OutputFormat {
    match format {
        OutputFormat::Terminal => output::OutputFormat::Terminal,
        OutputFormat::Json => output::OutputFormat::Json,
    }
}
