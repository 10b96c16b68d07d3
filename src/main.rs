//! @ai:module:intent CLI entry point for publishing report annotations
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on pipeline, config, output

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use report_annotate::{
    config::DEFAULT_CONFIG_FILE, create_sink, publish_lint_report, publish_test_report,
    AnnotateConfig, AnnotationSink, OutputFormat, ReportWalker,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "report-annotate")]
#[command(author, version, about = "Publish pytest and pylint reports as CI annotations")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "github", global = true)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate failures from a pytest JUnit XML report
    Pytest {
        /// Path to the JUnit XML file
        #[arg(env = "INPUT_FILE")]
        file: PathBuf,
    },

    /// Annotate messages from a pylint JSON report
    Pylint {
        /// Path to the pylint JSON file
        #[arg(env = "INPUT_FILE")]
        file: PathBuf,
    },

    /// Write the default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Github,
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Github => OutputFormat::Github,
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut sink = create_sink(cli.format.into(), stdout.lock());

    match run(cli.command, cli.config.as_deref(), sink.as_mut()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("run failed: {:?}", e);
            if let Err(io_err) = sink.fail(&e.to_string()) {
                eprintln!("Error: {}", e);
                eprintln!("Error: failed to report failure: {}", io_err);
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries workflow commands.
fn init_tracing() {
    let level = match std::env::var("RUNNER_DEBUG").as_deref() {
        Ok("1") => "debug",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("report_annotate={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// @ai:intent Dispatch a subcommand
/// @ai:effects fs:read, fs:write, io
fn run(command: Commands, config: Option<&Path>, sink: &mut dyn AnnotationSink) -> Result<()> {
    match command {
        Commands::Pytest { file } => {
            let config = AnnotateConfig::load_or_default(config)?;
            let path = absolute(&file)?;
            let walker = ReportWalker::with_filesystem().with_config(&config.test_report);
            publish_test_report(&path, &walker, sink)?;
        }

        Commands::Pylint { file } => {
            let config = AnnotateConfig::load_or_default(config)?;
            let path = absolute(&file)?;
            publish_lint_report(&path, &config.lint_report, sink)?;
        }

        Commands::Init { output } => {
            AnnotateConfig::default().save(&output)?;
            sink.info(&format!("Wrote default configuration to {}", output.display()))?;
        }
    }

    Ok(())
}

/// @ai:intent Resolve a report path against the working directory
/// @ai:effects fs:read
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
