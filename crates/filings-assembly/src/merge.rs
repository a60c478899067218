//! Merging statements from successive filings.
//!
//! Two conflict rules are in play across the pipeline and they are kept apart:
//! within one filing the first fact for a period wins (see
//! [`first_per_period`](crate::normalize::first_per_period)); across filings the
//! newer filing wins, which is what [`merge_statements`] implements.

use filings_core::{FilingsError, Period, Result, StatementTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Default number of missing cells a column may have before it is dropped.
pub const DEFAULT_SPARSE_THRESHOLD: usize = 5;

/// How to treat statements whose tag sets differ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAlignment {
    /// Fail with [`FilingsError::RowMismatch`] unless both tag sets are identical.
    #[default]
    Strict,
    /// Keep the union of both tag sets.
    Union,
}

/// Options for [`merge_statements`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Columns with more than this many missing cells are dropped.
    pub sparse_threshold: usize,
    /// Row alignment policy.
    pub alignment: RowAlignment,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            sparse_threshold: DEFAULT_SPARSE_THRESHOLD,
            alignment: RowAlignment::default(),
        }
    }
}

impl MergeOptions {
    /// Sets the sparse column threshold.
    #[must_use]
    pub const fn with_sparse_threshold(mut self, threshold: usize) -> Self {
        self.sparse_threshold = threshold;
        self
    }

    /// Sets the row alignment policy.
    #[must_use]
    pub const fn with_alignment(mut self, alignment: RowAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Drops every column with more than `threshold` missing cells.
///
/// Returns the dropped periods in ascending order.
pub fn prune_sparse_columns(table: &mut StatementTable, threshold: usize) -> Vec<Period> {
    let sparse: Vec<Period> = table
        .periods()
        .filter(|p| table.missing_in_column(p) > threshold)
        .collect();

    for period in &sparse {
        table.remove_column(period);
        debug!(statement = %table.kind(), %period, "Dropped sparse column");
    }

    sparse
}

/// Outer-joins two statements on period, with `newer`'s cells taking precedence.
///
/// An empty statement on either side is the identity. Otherwise, under
/// [`RowAlignment::Strict`] both statements must have identical tag sets.
/// Sparse columns are pruned from the result; columns stay in ascending order.
pub fn merge_statements(
    older: &StatementTable,
    newer: &StatementTable,
    options: &MergeOptions,
) -> Result<StatementTable> {
    if older.kind() != newer.kind() {
        return Err(FilingsError::InvalidParameter(format!(
            "Cannot merge {} statement into {} statement",
            newer.kind(),
            older.kind()
        )));
    }

    let mut merged = if older.is_empty() {
        newer.clone()
    } else if newer.is_empty() {
        older.clone()
    } else {
        if options.alignment == RowAlignment::Strict {
            check_rows(older, newer)?;
        }

        let mut merged = older.clone();
        for tag in newer.tags() {
            merged.add_row(tag);
            if let Some(cells) = newer.row(tag) {
                for (period, value) in cells {
                    merged.insert(tag, *period, *value);
                }
            }
        }
        merged
    };

    prune_sparse_columns(&mut merged, options.sparse_threshold);
    Ok(merged)
}

fn check_rows(older: &StatementTable, newer: &StatementTable) -> Result<()> {
    let older_tags: BTreeSet<&str> = older.tags().collect();
    let newer_tags: BTreeSet<&str> = newer.tags().collect();

    if older_tags == newer_tags {
        return Ok(());
    }

    Err(FilingsError::RowMismatch {
        only_older: older_tags
            .difference(&newer_tags)
            .map(|t| (*t).to_string())
            .collect(),
        only_newer: newer_tags
            .difference(&older_tags)
            .map(|t| (*t).to_string())
            .collect(),
    })
}
