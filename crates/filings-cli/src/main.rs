//! `filings` binary.
//!
//! Assembles a ticker's statements from its recent 10-Q and 10-K filings,
//! prints them as tables, then prints the ratios of the latest period.

use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use filings::{
    MergeOptions, PipelineConfig, RetryPolicy, RowAlignment, StatementKind, StatementPipeline,
    Symbol, compute_ratios,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Financial statements and ratios from SEC filings")]
struct Cli {
    /// Ticker symbol, e.g. AAPL.
    ticker: String,

    /// sec-api.io API key.
    #[arg(long, env = "SEC_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Maximum number of filings to fold in, newest first.
    #[arg(long, default_value_t = filings::DEFAULT_FILING_LIMIT)]
    limit: usize,

    /// Keep the union of tags when filings disagree instead of failing.
    #[arg(long)]
    union_rows: bool,

    /// Do not derive fourth-quarter columns.
    #[arg(long)]
    no_fourth_quarter: bool,

    /// Keep only single-quarter income and cash-flow columns.
    #[arg(long)]
    quarterly_only: bool,

    /// Attempts per request, including the first.
    #[arg(long, default_value_t = filings::retry::DEFAULT_MAX_ATTEMPTS)]
    retries: u32,

    /// Delay between attempts, in milliseconds.
    #[arg(long, default_value_t = 500)]
    retry_delay_ms: u64,
}

impl Cli {
    fn config(&self) -> PipelineConfig {
        let alignment = if self.union_rows {
            RowAlignment::Union
        } else {
            RowAlignment::Strict
        };

        PipelineConfig::default()
            .with_filing_limit(self.limit)
            .with_retry(RetryPolicy::new(
                self.retries,
                Duration::from_millis(self.retry_delay_ms),
            ))
            .with_merge(MergeOptions::default().with_alignment(alignment))
            .with_fourth_quarter(!self.no_fourth_quarter)
            .with_quarterly_only(self.quarterly_only)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let symbol = Symbol::new(&cli.ticker);
    let pipeline = StatementPipeline::with_sec_api(&cli.api_key).with_config(cli.config());
    tracing::info!(?pipeline, "filings v{}", env!("CARGO_PKG_VERSION"));

    let assembled = pipeline
        .assemble(&symbol)
        .await
        .with_context(|| format!("assembling statements for {symbol}"))?;
    let statements = pipeline
        .reconcile(assembled)
        .with_context(|| format!("reconciling statements for {symbol}"))?;

    for kind in StatementKind::ALL {
        let frame = statements
            .get(kind)
            .to_dataframe()
            .with_context(|| format!("rendering {kind} statement"))?;
        println!("{kind} statement for {symbol}:\n{frame}\n");
    }

    let ratios = compute_ratios(&statements.balance_sheet, &statements.income)
        .with_context(|| format!("computing ratios for {symbol}"))?;
    println!("{ratios}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["filings", "aapl", "--api-key", "k"]).unwrap();
        let config = cli.config();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "filings",
            "MSFT",
            "--api-key",
            "k",
            "--limit",
            "8",
            "--union-rows",
            "--no-fourth-quarter",
            "--quarterly-only",
            "--retries",
            "2",
            "--retry-delay-ms",
            "10",
        ])
        .unwrap();
        let config = cli.config();

        assert_eq!(config.filing_limit, 8);
        assert_eq!(config.merge.alignment, RowAlignment::Union);
        assert!(!config.fourth_quarter);
        assert!(config.quarterly_only);
        assert_eq!(config.retry, RetryPolicy::new(2, Duration::from_millis(10)));
    }
}
