//! Sequential statement pipeline: search, fetch, extract, merge, reconcile.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use filings_assembly::{
    FinancialRatios, MergeOptions, add_fourth_quarter, compute_ratios, extract_filing,
    merge_statements, only_quarterly, prune_sparse_columns,
};
use filings_core::{
    FactSource, FilingSearch, FormType, Result, RetryPolicy, StatementKind, StatementTable, Symbol,
};

/// Default number of filings fetched per ticker.
pub const DEFAULT_FILING_LIMIT: usize = 20;

/// Pipeline settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of filings to fold in, newest first.
    pub filing_limit: usize,
    /// Form types to search for.
    pub forms: Vec<FormType>,
    /// Retry policy around each collaborator call.
    pub retry: RetryPolicy,
    /// Merge and column pruning options.
    pub merge: MergeOptions,
    /// Derive unreported fourth quarters for income and cash-flow statements.
    pub fourth_quarter: bool,
    /// Keep only single-quarter columns in income and cash-flow statements.
    pub quarterly_only: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filing_limit: DEFAULT_FILING_LIMIT,
            forms: FormType::ALL.to_vec(),
            retry: RetryPolicy::default(),
            merge: MergeOptions::default(),
            fourth_quarter: true,
            quarterly_only: false,
        }
    }
}

impl PipelineConfig {
    /// Sets the maximum number of filings.
    #[must_use]
    pub const fn with_filing_limit(mut self, limit: usize) -> Self {
        self.filing_limit = limit;
        self
    }

    /// Sets the form types to search for.
    #[must_use]
    pub fn with_forms(mut self, forms: impl Into<Vec<FormType>>) -> Self {
        self.forms = forms.into();
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the merge options.
    #[must_use]
    pub const fn with_merge(mut self, merge: MergeOptions) -> Self {
        self.merge = merge;
        self
    }

    /// Enables or disables fourth-quarter derivation.
    #[must_use]
    pub const fn with_fourth_quarter(mut self, enabled: bool) -> Self {
        self.fourth_quarter = enabled;
        self
    }

    /// Enables or disables the quarterly-only filter.
    #[must_use]
    pub const fn with_quarterly_only(mut self, enabled: bool) -> Self {
        self.quarterly_only = enabled;
        self
    }
}

/// The three statements assembled across all of a ticker's filings.
#[derive(Clone, Debug, PartialEq)]
pub struct AssembledStatements {
    /// Balance sheet.
    pub balance_sheet: StatementTable,
    /// Income statement.
    pub income: StatementTable,
    /// Cash-flow statement.
    pub cash_flow: StatementTable,
}

impl Default for AssembledStatements {
    fn default() -> Self {
        Self {
            balance_sheet: StatementTable::new(StatementKind::BalanceSheet),
            income: StatementTable::new(StatementKind::Income),
            cash_flow: StatementTable::new(StatementKind::CashFlow),
        }
    }
}

impl AssembledStatements {
    /// Returns the table of the given statement.
    #[must_use]
    pub const fn get(&self, kind: StatementKind) -> &StatementTable {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::Income => &self.income,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }

    fn get_mut(&mut self, kind: StatementKind) -> &mut StatementTable {
        match kind {
            StatementKind::BalanceSheet => &mut self.balance_sheet,
            StatementKind::Income => &mut self.income,
            StatementKind::CashFlow => &mut self.cash_flow,
        }
    }
}

/// Reconciled statements with ratios from their latest periods.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    /// Statements after reconciliation and filtering.
    pub statements: AssembledStatements,
    /// Ratios from the latest balance sheet and income columns.
    pub ratios: FinancialRatios,
}

/// Drives the collaborators and assembly stages for one ticker at a time.
///
/// Filings are processed strictly one after another in the order the search
/// returns them (newest first), so the accumulated statements always hold the
/// newer data when a filing is folded in.
///
/// # Example
///
/// ```rust,ignore
/// use filings::{PipelineConfig, StatementPipeline, Symbol};
///
/// let pipeline = StatementPipeline::with_sec_api("your_api_key")
///     .with_config(PipelineConfig::default().with_filing_limit(8));
/// let analysis = pipeline.analyze(&Symbol::new("AAPL")).await?;
/// println!("{}", analysis.ratios);
/// ```
#[derive(Clone)]
pub struct StatementPipeline {
    search: Arc<dyn FilingSearch>,
    facts: Arc<dyn FactSource>,
    config: PipelineConfig,
}

impl std::fmt::Debug for StatementPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementPipeline")
            .field("search", &self.search.name())
            .field("facts", &self.facts.name())
            .field("config", &self.config)
            .finish()
    }
}

impl StatementPipeline {
    /// Create a pipeline over the given collaborators with default settings.
    #[must_use]
    pub fn new(search: Arc<dyn FilingSearch>, facts: Arc<dyn FactSource>) -> Self {
        debug!(
            search = search.name(),
            facts = facts.name(),
            "Creating statement pipeline"
        );
        Self {
            search,
            facts,
            config: PipelineConfig::default(),
        }
    }

    /// Create a pipeline backed by sec-api.io for both search and facts.
    #[cfg(feature = "secapi")]
    #[must_use]
    pub fn with_sec_api(api_key: impl Into<String>) -> Self {
        let client = Arc::new(filings_secapi::SecApiClient::new(api_key));
        Self::new(client.clone(), client)
    }

    /// Replace the pipeline settings.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the pipeline settings.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Searches the symbol's filings and folds each one into the assembled
    /// statements, newest filing first.
    ///
    /// A collaborator failure that survives the retry policy aborts the
    /// whole run; no partial result is returned.
    pub async fn assemble(&self, symbol: &Symbol) -> Result<AssembledStatements> {
        let config = &self.config;
        info!(
            %symbol,
            provider = self.search.name(),
            limit = config.filing_limit,
            "Assembling statements"
        );

        let accessions = config
            .retry
            .run("filing search", || {
                self.search
                    .search_filings(symbol, &config.forms, config.filing_limit)
            })
            .await?;

        let mut assembled = AssembledStatements::default();
        for (index, accession) in accessions.iter().enumerate() {
            debug!(%symbol, %accession, index, "Fetching filing");
            let facts = config
                .retry
                .run("XBRL facts", || self.facts.fetch_facts(accession))
                .await?;

            let fresh = extract_filing(&facts);
            for kind in StatementKind::ALL {
                let mut table = fresh.get(kind).clone();
                prune_sparse_columns(&mut table, config.merge.sparse_threshold);

                // Everything already assembled came from newer filings.
                let slot = assembled.get_mut(kind);
                *slot = merge_statements(&table, slot, &config.merge)?;
            }
        }

        info!(
            %symbol,
            filings = accessions.len(),
            balance_sheet_periods = assembled.balance_sheet.width(),
            income_periods = assembled.income.width(),
            cash_flow_periods = assembled.cash_flow.width(),
            "Assembled statements"
        );
        Ok(assembled)
    }

    /// Applies fourth-quarter derivation and the quarterly filter, as
    /// configured, to the income and cash-flow statements.
    pub fn reconcile(&self, mut statements: AssembledStatements) -> Result<AssembledStatements> {
        for kind in [StatementKind::Income, StatementKind::CashFlow] {
            let table = statements.get_mut(kind);
            if self.config.fourth_quarter {
                *table = add_fourth_quarter(table)?;
            }
            if self.config.quarterly_only {
                *table = only_quarterly(table);
            }
        }
        Ok(statements)
    }

    /// Assembles, reconciles and computes ratios for the symbol.
    pub async fn analyze(&self, symbol: &Symbol) -> Result<Analysis> {
        let statements = self.reconcile(self.assemble(symbol).await?)?;
        let ratios = compute_ratios(&statements.balance_sheet, &statements.income)?;
        info!(%symbol, income_period = %ratios.income_period, "Computed ratios");
        Ok(Analysis { statements, ratios })
    }
}
