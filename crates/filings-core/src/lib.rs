#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for assembling financial statements from filings.
//!
//! This crate provides the foundational abstractions shared by the pipeline:
//!
//! - [`Fact`](types::Fact) and [`Period`](types::Period) - Tagged reported values
//! - [`StatementTable`](table::StatementTable) - `(tag, period)` keyed statement grid
//! - [`FilingSearch`](provider::FilingSearch) - Ordered filing lookup
//! - [`FactSource`](provider::FactSource) - Per-filing fact conversion
//! - [`RetryPolicy`](retry::RetryPolicy) - Fixed-delay retry around collaborators

/// Error types for filing operations.
pub mod error;
/// Provider traits for the external collaborators.
pub mod provider;
/// Fixed-delay retry policy.
pub mod retry;
/// Statement and form type definitions.
pub mod statement;
/// Statement tables keyed by tag and period.
pub mod table;
/// Core data types (Symbol, Period, Value, Fact, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{FilingsError, Result};
pub use provider::{FactSource, FilingProvider, FilingSearch};
pub use retry::RetryPolicy;
pub use statement::{FormType, StatementKind};
pub use table::StatementTable;
pub use types::{AccessionNumber, Fact, FilingFacts, Period, Segment, Symbol, TagFacts, Value};
