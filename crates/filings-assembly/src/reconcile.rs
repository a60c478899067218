//! Fourth-quarter reconciliation.
//!
//! Companies do not file a 10-Q for their fourth fiscal quarter; its figures
//! only exist implicitly as the annual total minus the nine-month year-to-date
//! figures. [`add_fourth_quarter`] derives that column, and [`only_quarterly`]
//! reduces a statement to single-quarter columns.

use filings_core::{FilingsError, Period, Result, StatementTable, Value};
use tracing::debug;

/// Annual columns span more than this many days.
pub const ANNUAL_MIN_DAYS: i64 = 350;

/// Nine-month columns span more than this many days (and less than [`ANNUAL_MIN_DAYS`]).
pub const NINE_MONTH_MIN_DAYS: i64 = 200;

/// Quarterly columns span at most this many days.
pub const QUARTER_MAX_DAYS: i64 = 100;

/// Net income tag.
pub const NET_INCOME: &str = "NetIncomeLoss";
/// Basic weighted-average shares outstanding.
pub const SHARES_BASIC: &str = "WeightedAverageNumberOfSharesOutstandingBasic";
/// Diluted weighted-average shares outstanding.
pub const SHARES_DILUTED: &str = "WeightedAverageNumberOfDilutedSharesOutstanding";
/// Basic earnings per share.
pub const EPS_BASIC: &str = "EarningsPerShareBasic";
/// Diluted earnings per share.
pub const EPS_DILUTED: &str = "EarningsPerShareDiluted";

/// Returns true for range periods spanning a fiscal year.
#[must_use]
pub fn is_annual(period: &Period) -> bool {
    period.is_range() && period.span_days() > ANNUAL_MIN_DAYS
}

/// Returns true for range periods spanning three quarters.
#[must_use]
pub fn is_nine_month(period: &Period) -> bool {
    let days = period.span_days();
    period.is_range() && days > NINE_MONTH_MIN_DAYS && days < ANNUAL_MIN_DAYS
}

/// Derives the fourth-quarter column for every annual column that has a
/// nine-month column starting on the same date.
///
/// The new column runs from the nine-month end to the annual end. Each value
/// is annual minus nine-month, except share counts which are copied from the
/// annual column. Earnings per share are then recomputed from net income.
/// Annual columns without a nine-month counterpart are left alone; more than
/// one counterpart is an error. Columns are returned in ascending order.
pub fn add_fourth_quarter(statement: &StatementTable) -> Result<StatementTable> {
    let periods: Vec<Period> = statement.periods().collect();
    let mut out = statement.clone();

    for annual in periods.iter().filter(|p| is_annual(p)) {
        let candidates: Vec<&Period> = periods
            .iter()
            .filter(|p| p.start() == annual.start() && is_nine_month(p))
            .collect();

        let nine_month = match candidates.as_slice() {
            [] => {
                debug!(%annual, "No nine-month column for annual period");
                continue;
            }
            [one] => **one,
            _ => {
                return Err(FilingsError::AmbiguousNineMonthPeriods {
                    annual: annual.to_string(),
                    candidates: candidates.iter().map(ToString::to_string).collect(),
                });
            }
        };

        let quarter = Period::range(nine_month.end(), annual.end());
        if out.remove_column(&quarter) {
            debug!(%quarter, "Replacing reported column with derived fourth quarter");
        }

        for tag in statement.tags() {
            out.add_row(tag);
            let value = if tag == SHARES_BASIC || tag == SHARES_DILUTED {
                statement.get(tag, annual)
            } else {
                match (statement.get(tag, annual), statement.get(tag, &nine_month)) {
                    (Some(a), Some(n)) => Some(a.difference(n)),
                    _ => None,
                }
            };
            if let Some(value) = value {
                out.insert(tag, quarter, value);
            }
        }

        recompute_eps(&mut out, &quarter);
        debug!(%annual, %nine_month, %quarter, "Derived fourth quarter");
    }

    Ok(out)
}

/// Sets EPS for a derived column from net income and share counts.
///
/// A subtracted EPS is meaningless, so it is cleared when it cannot be recomputed.
fn recompute_eps(table: &mut StatementTable, period: &Period) {
    let net_income = table.get(NET_INCOME, period);

    for (eps_tag, shares_tag) in [(EPS_BASIC, SHARES_BASIC), (EPS_DILUTED, SHARES_DILUTED)] {
        let eps: Option<Value> = net_income
            .zip(table.get(shares_tag, period))
            .and_then(|(income, shares)| income.ratio(shares));
        match eps {
            Some(eps) => {
                table.insert(eps_tag, *period, eps);
            }
            None => {
                table.remove(eps_tag, period);
            }
        }
    }
}

/// Keeps only columns spanning at most [`QUARTER_MAX_DAYS`] days.
#[must_use]
pub fn only_quarterly(statement: &StatementTable) -> StatementTable {
    let mut out = statement.clone();
    out.retain_columns(|p| p.span_days() <= QUARTER_MAX_DAYS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use filings_core::StatementKind;

    fn range(start: &str, end: &str) -> Period {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        Period::range(d(start), d(end))
    }

    fn income() -> StatementTable {
        let annual = range("2019-01-01", "2019-12-31");
        let nine = range("2019-01-01", "2019-09-30");

        let mut t = StatementTable::new(StatementKind::Income);
        t.insert(NET_INCOME, annual, Value::Integer(100));
        t.insert(NET_INCOME, nine, Value::Integer(70));
        t.insert(SHARES_BASIC, annual, Value::Integer(10));
        t.insert(SHARES_BASIC, nine, Value::Integer(12));
        t.insert(SHARES_DILUTED, annual, Value::Integer(20));
        t.insert(SHARES_DILUTED, nine, Value::Integer(21));
        t.insert(EPS_BASIC, annual, Value::Decimal(10.0));
        t.insert(EPS_BASIC, nine, Value::Decimal(5.83));
        t.insert(EPS_DILUTED, annual, Value::Decimal(5.0));
        t.insert(EPS_DILUTED, nine, Value::Decimal(3.33));
        t.insert("InterestExpense", annual, Value::Decimal(4.5));
        t.insert("InterestExpense", nine, Value::Integer(3));
        t
    }

    #[test]
    fn test_fourth_quarter_values() {
        let out = add_fourth_quarter(&income()).unwrap();
        let q4 = range("2019-09-30", "2019-12-31");

        assert!(out.has_column(&q4));
        assert_eq!(out.get(NET_INCOME, &q4), Some(Value::Integer(30)));
        assert_eq!(out.get(SHARES_BASIC, &q4), Some(Value::Integer(10)));
        assert_eq!(out.get(SHARES_DILUTED, &q4), Some(Value::Integer(20)));
        assert_eq!(out.get("InterestExpense", &q4), Some(Value::Decimal(1.5)));
    }

    #[test]
    fn test_fourth_quarter_eps() {
        let out = add_fourth_quarter(&income()).unwrap();
        let q4 = range("2019-09-30", "2019-12-31");

        assert_eq!(out.get(EPS_BASIC, &q4), Some(Value::Decimal(3.0)));
        assert_eq!(out.get(EPS_DILUTED, &q4), Some(Value::Decimal(1.5)));
    }

    #[test]
    fn test_eps_derived_without_reported_eps() {
        let annual = range("2019-01-01", "2019-12-31");
        let nine = range("2019-01-01", "2019-09-30");
        let mut t = StatementTable::new(StatementKind::Income);
        t.insert(NET_INCOME, annual, Value::Integer(100));
        t.insert(NET_INCOME, nine, Value::Integer(70));
        t.insert(SHARES_BASIC, annual, Value::Integer(10));

        let out = add_fourth_quarter(&t).unwrap();
        let q4 = range("2019-09-30", "2019-12-31");

        assert_eq!(out.get(NET_INCOME, &q4), Some(Value::Integer(30)));
        assert_eq!(out.get(EPS_BASIC, &q4), Some(Value::Decimal(3.0)));
        // No diluted share count, so no diluted EPS row appears.
        assert!(!out.has_row(EPS_DILUTED));
    }

    #[test]
    fn test_columns_sorted_after_reconcile() {
        let out = add_fourth_quarter(&income()).unwrap();
        let labels: Vec<String> = out.periods().map(|p| p.to_string()).collect();
        assert_eq!(
            labels,
            vec![
                "2019-01-01-2019-09-30",
                "2019-01-01-2019-12-31",
                "2019-09-30-2019-12-31",
            ]
        );
    }

    #[test]
    fn test_no_nine_month_match_leaves_statement() {
        let mut t = StatementTable::new(StatementKind::Income);
        t.insert(NET_INCOME, range("2019-01-01", "2019-12-31"), Value::Integer(100));
        t.insert(NET_INCOME, range("2019-02-01", "2019-09-30"), Value::Integer(70));

        assert_eq!(add_fourth_quarter(&t).unwrap(), t);
    }

    #[test]
    fn test_ambiguous_nine_month_match() {
        let mut t = income();
        t.insert(NET_INCOME, range("2019-01-01", "2019-10-31"), Value::Integer(80));

        assert!(matches!(
            add_fourth_quarter(&t),
            Err(FilingsError::AmbiguousNineMonthPeriods { .. })
        ));
    }

    #[test]
    fn test_multiple_fiscal_years() {
        let mut t = income();
        t.insert(NET_INCOME, range("2020-01-01", "2020-12-31"), Value::Integer(200));
        t.insert(NET_INCOME, range("2020-01-01", "2020-09-30"), Value::Integer(150));

        let out = add_fourth_quarter(&t).unwrap();
        assert_eq!(
            out.get(NET_INCOME, &range("2020-09-30", "2020-12-31")),
            Some(Value::Integer(50))
        );
        assert_eq!(
            out.get(NET_INCOME, &range("2019-09-30", "2019-12-31")),
            Some(Value::Integer(30))
        );
        // No share counts for 2020, so its EPS cannot be derived.
        assert_eq!(out.get(EPS_BASIC, &range("2020-09-30", "2020-12-31")), None);
    }

    #[test]
    fn test_only_quarterly() {
        let mut t = StatementTable::new(StatementKind::Income);
        let year = range("2019-01-01", "2020-01-01");
        let quarter = range("2019-10-01", "2019-12-31");
        t.insert(NET_INCOME, year, Value::Integer(1));
        t.insert(NET_INCOME, quarter, Value::Integer(2));
        assert_eq!(year.span_days(), 365);
        assert_eq!(quarter.span_days(), 91);

        let out = only_quarterly(&t);
        assert!(!out.has_column(&year));
        assert!(out.has_column(&quarter));
    }
}
