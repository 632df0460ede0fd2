//! Settlement CLI
//!
//! Usage:
//! ```bash
//! settle ledger.json
//! settle ledger.json --config settle.toml --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use settlement::{Config, LedgerInput, ReportFormat, ReportRenderer, SettlementEngine};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Compute who pays whom to settle a shared ledger
#[derive(Parser)]
#[command(name = "settle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ledger input (JSON)
    input: PathBuf,

    /// Configuration file (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Report format, overrides the configuration
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env()?;
    if let Some(format) = cli.format {
        config.report.format = format.into();
    }

    // Initialize tracing
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter).context("Invalid log filter")?,
    };
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        input = %cli.input.display(),
        "Starting settlement"
    );

    let ledger = LedgerInput::from_file(&cli.input)
        .with_context(|| format!("Failed to read ledger {}", cli.input.display()))?
        .resolve()
        .context("Invalid ledger")?;

    let engine = SettlementEngine::new(&config);
    let report = engine.run(
        &ledger.registry,
        ledger.base_state.as_ref(),
        &ledger.expenses,
        &ledger.transactions,
    )?;

    let output = ReportRenderer::new(config.report.clone()).render(&ledger.registry, &report)?;
    println!("{}", output);

    Ok(())
}
