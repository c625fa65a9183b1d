//! `dbsan` binary: parses arguments, loads configuration, and drives the
//! dispatcher over stdin/stdout (or a file given via `--output`).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dbsan::Dispatcher;
use dbsan_config::{AddonRegistry, Configuration};
use dbsan_core::{Error, SanitizerBinding};

/// Streaming sanitizer for MySQL and Postgres textual dumps.
#[derive(Parser, Debug)]
#[command(name = "dbsan", version, about)]
struct Cli {
    /// Source URL whose scheme selects the MySQL or Postgres pipeline.
    url: String,

    /// Path to a YAML sanitizer configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output file path; defaults to stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

const EXIT_OK: u8 = 0;
const EXIT_USAGE: u8 = 2;
const EXIT_FATAL: u8 = 1;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(err @ Error::UnsupportedScheme(_)) | Err(err @ Error::Config(_)) => {
            tracing::error!(error = %err, "usage error");
            ExitCode::from(EXIT_USAGE)
        }
        Err(err) => {
            tracing::error!(error = %err, "sanitization failed");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> dbsan_core::Result<()> {
    let binding = match &cli.config {
        Some(path) => {
            let config = Configuration::from_file(path, &AddonRegistry::new())?;
            tracing::info!(path = %path.display(), "loaded configuration");
            config.binding
        }
        None => SanitizerBinding::new(),
    };

    tracing::info!(
        url = %cli.url,
        config_loaded = cli.config.is_some(),
        "starting sanitization run"
    );

    let dispatcher = Dispatcher::new(binding);
    let stdin = io::stdin();
    let input = BufReader::new(stdin.lock());

    let report = match &cli.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let report = dispatcher.run(&cli.url, input, &mut writer)?;
            writer.flush()?;
            report
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let report = dispatcher.run(&cli.url, input, &mut writer)?;
            writer.flush()?;
            report
        }
    };

    tracing::info!(
        lines_read = report.lines_read,
        lines_written = report.lines_written,
        "sanitization run complete"
    );

    Ok(())
}
