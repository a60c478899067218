#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Statement assembly and period reconciliation.
//!
//! The pipeline stages, in order:
//!
//! - [`extract_filing`] - One filing's facts into three statement tables
//! - [`merge_statements`] - Fold a filing's table into the multi-period statement
//! - [`add_fourth_quarter`] - Derive unreported fourth-quarter columns
//! - [`compute_ratios`] - Ratios from the latest period
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use filings_assembly::{add_fourth_quarter, reconcile::NET_INCOME};
//! use filings_core::{Period, StatementKind, StatementTable, Value};
//!
//! let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
//! let mut income = StatementTable::new(StatementKind::Income);
//! income.insert(NET_INCOME, Period::range(d("2019-01-01"), d("2019-12-31")), Value::Integer(100));
//! income.insert(NET_INCOME, Period::range(d("2019-01-01"), d("2019-09-30")), Value::Integer(70));
//!
//! let income = add_fourth_quarter(&income).unwrap();
//! let q4 = Period::range(d("2019-09-30"), d("2019-12-31"));
//! assert_eq!(income.get(NET_INCOME, &q4), Some(Value::Integer(30)));
//! ```

/// Fact extraction into statement tables.
pub mod extract;
/// Merging statements across filings.
pub mod merge;
/// Period deduplication.
pub mod normalize;
/// Financial ratios.
pub mod ratios;
/// Fourth-quarter derivation and quarterly filtering.
pub mod reconcile;

pub use extract::{FilingStatements, extract_filing, extract_statement};
pub use merge::{MergeOptions, RowAlignment, merge_statements, prune_sparse_columns};
pub use normalize::first_per_period;
pub use ratios::{FinancialRatios, compute_ratios};
pub use reconcile::{add_fourth_quarter, only_quarterly};
