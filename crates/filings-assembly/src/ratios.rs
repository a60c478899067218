//! Financial ratios from the most recent period of assembled statements.

use filings_core::{FilingsError, Period, Result, StatementTable};
use serde::Serialize;
use std::fmt;

/// Tags read by [`compute_ratios`].
pub mod tags {
    /// Total assets.
    pub const ASSETS: &str = "Assets";
    /// Total liabilities.
    pub const LIABILITIES: &str = "Liabilities";
    /// Stockholders' equity.
    pub const STOCKHOLDERS_EQUITY: &str = "StockholdersEquity";
    /// Current assets.
    pub const ASSETS_CURRENT: &str = "AssetsCurrent";
    /// Current liabilities.
    pub const LIABILITIES_CURRENT: &str = "LiabilitiesCurrent";
    /// Inventory, net.
    pub const INVENTORY_NET: &str = "InventoryNet";
    /// Net income.
    pub const NET_INCOME: &str = "NetIncomeLoss";
    /// Revenue.
    pub const REVENUE: &str = "RevenueFromContractWithCustomerExcludingAssessedTax";
}

/// Liquidity, profitability, solvency and efficiency ratios.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FinancialRatios {
    /// Balance sheet period the ratios were computed from.
    pub balance_sheet_period: Period,
    /// Income statement period the ratios were computed from.
    pub income_period: Period,
    /// Current assets / current liabilities.
    pub current_ratio: f64,
    /// (Current assets - inventory) / current liabilities.
    pub quick_ratio: f64,
    /// Net income / revenue.
    pub net_profit_margin: f64,
    /// Net income / stockholders' equity.
    pub return_on_equity: f64,
    /// Total liabilities / stockholders' equity.
    pub debt_to_equity: f64,
    /// Revenue / total assets.
    pub asset_turnover: f64,
}

impl fmt::Display for FinancialRatios {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Financial ratios (balance sheet {}, income statement {}):",
            self.balance_sheet_period, self.income_period
        )?;
        writeln!(f, "Current Ratio: {:.2}", self.current_ratio)?;
        writeln!(f, "Quick Ratio: {:.2}", self.quick_ratio)?;
        writeln!(f, "Net Profit Margin: {:.2}%", self.net_profit_margin * 100.0)?;
        writeln!(f, "Return on Equity: {:.2}%", self.return_on_equity * 100.0)?;
        writeln!(f, "Debt to Equity Ratio: {:.2}", self.debt_to_equity)?;
        write!(f, "Asset Turnover Ratio: {:.2}", self.asset_turnover)
    }
}

/// Computes ratios from the latest column of each statement.
///
/// Any required row missing from the selected column is an error.
pub fn compute_ratios(
    balance_sheet: &StatementTable,
    income: &StatementTable,
) -> Result<FinancialRatios> {
    let bs_period = balance_sheet
        .latest_period()
        .ok_or(FilingsError::EmptyStatement(balance_sheet.kind()))?;
    let is_period = income
        .latest_period()
        .ok_or(FilingsError::EmptyStatement(income.kind()))?;

    let bs = |tag| lookup(balance_sheet, tag, &bs_period);
    let is = |tag| lookup(income, tag, &is_period);

    let assets = bs(tags::ASSETS)?;
    let liabilities = bs(tags::LIABILITIES)?;
    let equity = bs(tags::STOCKHOLDERS_EQUITY)?;
    let current_assets = bs(tags::ASSETS_CURRENT)?;
    let current_liabilities = bs(tags::LIABILITIES_CURRENT)?;
    let inventory = bs(tags::INVENTORY_NET)?;
    let net_income = is(tags::NET_INCOME)?;
    let revenue = is(tags::REVENUE)?;

    Ok(FinancialRatios {
        balance_sheet_period: bs_period,
        income_period: is_period,
        current_ratio: current_assets / current_liabilities,
        quick_ratio: (current_assets - inventory) / current_liabilities,
        net_profit_margin: net_income / revenue,
        return_on_equity: net_income / equity,
        debt_to_equity: liabilities / equity,
        asset_turnover: revenue / assets,
    })
}

fn lookup(table: &StatementTable, tag: &str, period: &Period) -> Result<f64> {
    table
        .get(tag, period)
        .map(|v| v.as_f64())
        .ok_or_else(|| FilingsError::MissingRow {
            tag: tag.to_string(),
            period: period.to_string(),
        })
}
