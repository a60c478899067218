//! Statement and form type definitions.
//!
//! This module defines [`StatementKind`] for the three financial statements carried
//! in a filing and [`FormType`] for the regulatory forms the pipeline consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FilingsError;

/// One of the financial statements reported in a 10-Q/10-K filing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Balance sheet (instant periods).
    BalanceSheet,
    /// Income statement (range periods).
    Income,
    /// Cash-flow statement (range periods, occasionally instants).
    CashFlow,
}

impl StatementKind {
    /// All statement kinds, in the order they are reported.
    pub const ALL: [Self; 3] = [Self::BalanceSheet, Self::Income, Self::CashFlow];

    /// Returns the top-level key of this statement in XBRL-JSON.
    #[must_use]
    pub const fn section_key(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "BalanceSheets",
            Self::Income => "StatementsOfIncome",
            Self::CashFlow => "StatementsOfCashFlows",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BalanceSheet => "Balance sheet",
            Self::Income => "Income",
            Self::CashFlow => "Cash flow",
        };
        f.write_str(name)
    }
}

/// Regulatory form type of a filing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Quarterly report.
    #[serde(rename = "10-Q")]
    TenQ,
    /// Annual report.
    #[serde(rename = "10-K")]
    TenK,
}

impl FormType {
    /// Periodic report forms, quarterly first.
    pub const ALL: [Self; 2] = [Self::TenQ, Self::TenK];

    /// Returns the form name as used by EDGAR ("10-Q" or "10-K").
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TenQ => "10-Q",
            Self::TenK => "10-K",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = FilingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "10-Q" => Ok(Self::TenQ),
            "10-K" => Ok(Self::TenK),
            other => Err(FilingsError::InvalidParameter(format!(
                "Unsupported form type: {other}"
            ))),
        }
    }
}
