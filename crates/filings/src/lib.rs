#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Multi-period financial statements from SEC filings.
//!
//! This crate ties the workspace together. It re-exports the core types, the
//! assembly stages and the provider implementations, and provides a
//! [`StatementPipeline`] that drives them for one ticker.
//!
//! # Features
//!
//! - `secapi` - sec-api.io filing search and XBRL-to-JSON provider
//!
//! # Example
//!
//! ```rust,ignore
//! use filings::{StatementPipeline, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> filings::Result<()> {
//!     let pipeline = StatementPipeline::with_sec_api("your_api_key");
//!
//!     let statements = pipeline.assemble(&Symbol::new("AAPL")).await?;
//!     println!("{}", statements.balance_sheet.to_dataframe()?);
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use filings_core::*;

// Assembly stages
pub use filings_assembly::{
    FilingStatements, FinancialRatios, MergeOptions, RowAlignment, add_fourth_quarter,
    compute_ratios, extract_filing, extract_statement, first_per_period, merge_statements,
    only_quarterly, prune_sparse_columns,
};

// Providers
#[cfg(feature = "secapi")]
pub use filings_secapi::SecApiClient;

mod pipeline;
pub use pipeline::{
    AssembledStatements, Analysis, DEFAULT_FILING_LIMIT, PipelineConfig, StatementPipeline,
};
