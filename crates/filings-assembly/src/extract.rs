//! Fact extraction: one filing's tagged facts into statement tables.

use filings_core::{FilingFacts, StatementKind, StatementTable, TagFacts};
use tracing::debug;

use crate::normalize::first_per_period;

/// Builds the table of one statement section.
///
/// Each tag with at least one consolidated fact becomes a row; its columns are
/// the distinct periods of those facts, first occurrence winning.
#[must_use]
pub fn extract_statement(kind: StatementKind, facts: &TagFacts) -> StatementTable {
    let mut table = StatementTable::new(kind);

    for (tag, tag_facts) in facts {
        for (period, value) in first_per_period(tag_facts) {
            table.insert(tag.as_str(), period, value);
        }
    }

    debug!(
        statement = %kind,
        rows = table.len(),
        periods = table.width(),
        "Extracted statement"
    );
    table
}

/// The three statements of one filing.
#[derive(Clone, Debug, PartialEq)]
pub struct FilingStatements {
    /// Balance sheet.
    pub balance_sheet: StatementTable,
    /// Income statement.
    pub income: StatementTable,
    /// Cash-flow statement.
    pub cash_flow: StatementTable,
}

impl FilingStatements {
    /// Returns the table of the given statement.
    #[must_use]
    pub const fn get(&self, kind: StatementKind) -> &StatementTable {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::Income => &self.income,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }
}

/// Extracts all three statements of a filing. A section the filing does not
/// report yields an empty table.
#[must_use]
pub fn extract_filing(facts: &FilingFacts) -> FilingStatements {
    let extract = |kind: StatementKind| {
        facts
            .section(kind)
            .map_or_else(|| StatementTable::new(kind), |f| extract_statement(kind, f))
    };

    FilingStatements {
        balance_sheet: extract(StatementKind::BalanceSheet),
        income: extract(StatementKind::Income),
        cash_flow: extract(StatementKind::CashFlow),
    }
}
