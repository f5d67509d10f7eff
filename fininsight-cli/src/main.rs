//! FinInsight CLI — process tickers and inspect configuration.
//!
//! Commands:
//! - `process` — run the insights pipeline (fetch → analyze → report) for tickers
//! - `config` — print the loaded configuration with the API key masked

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fininsight_core::logging::DEFAULT_LOG_FILE;
use fininsight_core::{
    setup_logger_with, ConfigurationStore, FinancialDataProcessor, LoggerHandle, LoggerOptions,
    ProcessOutcome, ReportKind,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "fininsight",
    about = "FinInsight CLI — financial data insights pipeline"
)]
struct Cli {
    /// Log level: error, warn, info, debug, or trace.
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,

    /// Append log lines to this file.
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log to stderr only.
    #[arg(long, global = true, default_value_t = false)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the insights pipeline for one or more tickers.
    Process {
        /// Tickers to process (e.g., AAPL MSFT).
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Report type: default, detailed, or summary.
        #[arg(long, default_value = "default")]
        report_type: String,

        /// Start date (YYYY-MM-DD). Defaults to 2023-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to 2023-12-31.
        #[arg(long)]
        end: Option<String>,
    },
    /// Print the loaded configuration (API key masked).
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logger = setup_logger_with(
        "fininsight",
        &LoggerOptions {
            level: cli.log_level,
            log_file: (!cli.no_log_file).then_some(cli.log_file),
        },
    )?;

    let config = load_config(&logger)?;

    match cli.command {
        Commands::Process {
            tickers,
            report_type,
            start,
            end,
        } => run_process(config, &logger, &tickers, &report_type, start, end),
        Commands::Config => run_config(&config),
    }
}

/// Load configuration, logging the failure before surfacing it. No retry.
fn load_config(logger: &LoggerHandle) -> Result<Arc<ConfigurationStore>> {
    match ConfigurationStore::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            logger.error(&e.to_string());
            Err(e.into())
        }
    }
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    Ok(value
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?)
}

fn run_process(
    config: Arc<ConfigurationStore>,
    logger: &LoggerHandle,
    tickers: &[String],
    report_type: &str,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let kind: ReportKind = report_type.parse()?;

    let processor = FinancialDataProcessor::new(config).with_report_kind(kind);
    let (default_start, default_end) = processor.date_range();
    let start_date = parse_date(start.as_deref())?.unwrap_or(default_start);
    let end_date = parse_date(end.as_deref())?.unwrap_or(default_end);
    if start_date > end_date {
        bail!("--start ({start_date}) must not be after --end ({end_date})");
    }
    let processor = processor.with_date_range(start_date, end_date);

    logger.info(&format!(
        "Processing {} ticker(s) from {start_date} to {end_date}",
        tickers.len()
    ));

    let results = processor.process_many(tickers);
    let mut failed = 0;
    for result in results {
        let outcome = ProcessOutcome::from(result);
        if !outcome.is_success() {
            failed += 1;
        }
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    if failed > 0 {
        bail!("{failed} of {} ticker(s) failed", tickers.len());
    }
    Ok(())
}

fn run_config(config: &ConfigurationStore) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&config.redacted())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn process_accepts_multiple_tickers() {
        let cli = Cli::try_parse_from([
            "fininsight",
            "--no-log-file",
            "process",
            "AAPL",
            "MSFT",
            "--report-type",
            "summary",
        ])
        .unwrap();

        assert!(cli.no_log_file);
        assert_eq!(cli.log_level, Level::INFO);
        match cli.command {
            Commands::Process {
                tickers,
                report_type,
                ..
            } => {
                assert_eq!(tickers, ["AAPL", "MSFT"]);
                assert_eq!(report_type, "summary");
            }
            Commands::Config => panic!("expected process"),
        }
    }

    #[test]
    fn process_requires_a_ticker() {
        assert!(Cli::try_parse_from(["fininsight", "process"]).is_err());
    }

    #[test]
    fn parse_date_handles_missing_and_invalid() {
        assert_eq!(parse_date(None).unwrap(), None);
        assert_eq!(
            parse_date(Some("2023-06-30")).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 30)
        );
        assert!(parse_date(Some("06/30/2023")).is_err());
    }
}
