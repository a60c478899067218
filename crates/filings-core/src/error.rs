//! Error types for filing retrieval and statement assembly.
//!
//! This module defines [`FilingsError`] which covers all error cases that can occur
//! when fetching filings, decoding their facts, or assembling statement tables.

use thiserror::Error;

use crate::statement::StatementKind;

/// Errors that can occur while fetching filings and assembling statements.
#[derive(Error, Debug)]
pub enum FilingsError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// A transient operation kept failing until the retry budget ran out.
    #[error("Gave up after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The error returned by the final attempt.
        last_error: Box<FilingsError>,
    },

    /// The filing search returned nothing for the symbol.
    #[error("No filings found for symbol: {0}")]
    SymbolNotFound(String),

    /// Error parsing data returned by a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Authentication failed for a provider.
    #[error("Authentication failed for provider {0}")]
    AuthenticationFailed(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two statements being merged do not share the same set of tags.
    #[error(
        "Statement rows are misaligned: {} tag(s) only in older filing {only_older:?}, {} tag(s) only in newer filing {only_newer:?}",
        only_older.len(),
        only_newer.len()
    )]
    RowMismatch {
        /// Tags present only in the older statement.
        only_older: Vec<String>,
        /// Tags present only in the newer statement.
        only_newer: Vec<String>,
    },

    /// An annual column has more than one candidate nine-month column.
    #[error("Annual period {annual} matches several nine-month periods: {candidates:?}")]
    AmbiguousNineMonthPeriods {
        /// Label of the annual column.
        annual: String,
        /// Labels of all matching nine-month columns.
        candidates: Vec<String>,
    },

    /// A row needed for a computation is absent for the selected period.
    #[error("Row {tag} has no value for period {period}")]
    MissingRow {
        /// The missing tag.
        tag: String,
        /// The period that was looked up.
        period: String,
    },

    /// A statement has no periods at all.
    #[error("{0} statement has no periods")]
    EmptyStatement(StatementKind),

    /// Error building a tabular view of a statement.
    #[error("Table error: {0}")]
    Table(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl FilingsError {
    /// Returns true if retrying the failed operation may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited { .. } | Self::Parse(_)
        )
    }
}

impl From<polars::prelude::PolarsError> for FilingsError {
    fn from(e: polars::prelude::PolarsError) -> Self {
        Self::Table(e.to_string())
    }
}

/// Result type alias using [`FilingsError`].
pub type Result<T> = std::result::Result<T, FilingsError>;
