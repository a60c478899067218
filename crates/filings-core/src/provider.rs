//! Provider traits for the pipeline's external collaborators.
//!
//! This module defines the core provider traits:
//!
//! - [`FilingProvider`] - Base trait for all providers
//! - [`FilingSearch`] - Ordered filing lookup for a ticker
//! - [`FactSource`] - Conversion of one filing into tagged facts

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    statement::FormType,
    types::{AccessionNumber, FilingFacts, Symbol},
};

/// Base trait for all filing providers.
pub trait FilingProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "sec-api.io").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider that finds the filings of a company.
#[async_trait]
pub trait FilingSearch: FilingProvider {
    /// Returns accession numbers of the symbol's filings of the given forms,
    /// newest filing first.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The stock symbol
    /// * `forms` - Form types to include (e.g. 10-Q and 10-K)
    /// * `limit` - Maximum number of filings to return
    async fn search_filings(
        &self,
        symbol: &Symbol,
        forms: &[FormType],
        limit: usize,
    ) -> Result<Vec<AccessionNumber>>;
}

/// Provider that converts a filing's XBRL into tagged facts.
#[async_trait]
pub trait FactSource: FilingProvider {
    /// Fetches the balance sheet, income and cash-flow facts of one filing.
    async fn fetch_facts(&self, accession: &AccessionNumber) -> Result<FilingFacts>;
}
