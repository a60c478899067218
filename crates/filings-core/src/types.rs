//! Core data types for tagged financial facts.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`AccessionNumber`] - Identifier of one regulatory filing
//! - [`Period`] - Instant or date-range reporting period
//! - [`Value`] - Integer or decimal reported value
//! - [`Segment`] - Business segment dimension scoping a fact
//! - [`Fact`] - One reported value for a tag
//! - [`FilingFacts`] - All facts of one filing, grouped by statement and tag

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FilingsError;
use crate::statement::StatementKind;

/// Date format used in period labels.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Accession number uniquely identifying one filing (e.g. `0000320193-20-000096`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessionNumber(String);

impl AccessionNumber {
    /// Creates an accession number from its string form.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the accession number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reporting period of a fact, which doubles as a statement column label.
///
/// Instants render as `2020-06-27`, ranges as `2019-09-29-2020-06-27`.
/// Ordering matches the lexicographic order of those labels, which for
/// zero-padded ISO dates is chronological by start date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    /// A point in time (balance-sheet date).
    Instant(NaiveDate),
    /// A reporting window from `start` to `end`.
    Range {
        /// First day of the window.
        start: NaiveDate,
        /// Last day of the window.
        end: NaiveDate,
    },
}

impl Period {
    /// Creates a range period.
    #[must_use]
    pub const fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Range { start, end }
    }

    /// Returns the instant date, or the start date of a range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        match self {
            Self::Instant(date) => *date,
            Self::Range { start, .. } => *start,
        }
    }

    /// Returns the instant date, or the end date of a range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        match self {
            Self::Instant(date) => *date,
            Self::Range { end, .. } => *end,
        }
    }

    /// Returns true for range periods.
    #[must_use]
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Number of days between start and end (0 for instants).
    #[must_use]
    pub fn span_days(&self) -> i64 {
        self.end().signed_duration_since(self.start()).num_days()
    }

    fn sort_key(&self) -> (NaiveDate, Option<NaiveDate>) {
        match self {
            Self::Instant(date) => (*date, None),
            Self::Range { start, end } => (*start, Some(*end)),
        }
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::Range { start, end } => write!(
                f,
                "{}-{}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
        }
    }
}

impl FromStr for Period {
    type Err = FilingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |d: &str| {
            NaiveDate::parse_from_str(d, DATE_FORMAT)
                .map_err(|e| FilingsError::Parse(format!("Invalid period label {s:?}: {e}")))
        };

        match s.len() {
            10 => Ok(Self::Instant(parse(s)?)),
            21 if s.as_bytes()[10] == b'-' => Ok(Self::Range {
                start: parse(&s[..10])?,
                end: parse(&s[11..])?,
            }),
            _ => Err(FilingsError::Parse(format!("Invalid period label {s:?}"))),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = FilingsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// A reported numeric value.
///
/// Filers report values as text; integers are kept exact and anything with a
/// fractional part becomes a decimal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Whole number (monetary amounts, share counts).
    Integer(i64),
    /// Fractional number (per-share amounts, ratios).
    Decimal(f64),
}

impl Value {
    /// Returns the value as a float.
    #[must_use]
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::Integer(v) => *v as f64,
            Self::Decimal(v) => *v,
        }
    }

    /// Subtracts `other`, staying integral when both sides are integers.
    ///
    /// Decimal results are rounded to two places.
    #[must_use]
    pub fn difference(self, other: Self) -> Self {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => match a.checked_sub(b) {
                Some(v) => Self::Integer(v),
                None => Self::Decimal(round2(a as f64 - b as f64)),
            },
            (a, b) => Self::Decimal(round2(a.as_f64() - b.as_f64())),
        }
    }

    /// Divides by `divisor`, rounded to two places. `None` on a zero divisor.
    #[must_use]
    pub fn ratio(self, divisor: Self) -> Option<Self> {
        let d = divisor.as_f64();
        if d == 0.0 {
            return None;
        }
        Some(Self::Decimal(round2(self.as_f64() / d)))
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Integer(0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for Value {
    type Err = FilingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Self::Integer(v));
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Self::Decimal(v)),
            _ => Err(FilingsError::Parse(format!("Invalid numeric value {s:?}"))),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Decimal(v)
    }
}

/// Rounds to two decimal places.
#[must_use]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Business segment dimension attached to a fact.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Dimension axis (e.g. `srt:ProductOrServiceAxis`).
    pub dimension: String,
    /// Member of the axis (e.g. `us-gaap:ProductMember`).
    pub member: String,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(dimension: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            member: member.into(),
        }
    }
}

/// One reported value for a tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Reporting period.
    pub period: Period,
    /// Reported value; some filers omit it for nil facts.
    pub value: Option<Value>,
    /// Segment scoping this fact, if any.
    pub segment: Option<Segment>,
}

impl Fact {
    /// Creates a consolidated (non-segmented) fact.
    #[must_use]
    pub fn new(period: Period, value: impl Into<Value>) -> Self {
        Self {
            period,
            value: Some(value.into()),
            segment: None,
        }
    }

    /// Creates a fact without a value field.
    #[must_use]
    pub const fn nil(period: Period) -> Self {
        Self {
            period,
            value: None,
            segment: None,
        }
    }

    /// Scopes this fact to a segment.
    #[must_use]
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Returns true if this fact is scoped to a segment.
    #[must_use]
    pub const fn is_segmented(&self) -> bool {
        self.segment.is_some()
    }
}

/// Facts of one statement section: tag name to facts in source order.
pub type TagFacts = BTreeMap<String, Vec<Fact>>;

/// All facts of one filing, grouped by statement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilingFacts {
    /// Filing these facts were converted from.
    pub accession: Option<AccessionNumber>,
    sections: BTreeMap<StatementKind, TagFacts>,
}

impl FilingFacts {
    /// Creates an empty fact collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the accession number of the filing.
    #[must_use]
    pub fn with_accession(mut self, accession: AccessionNumber) -> Self {
        self.accession = Some(accession);
        self
    }

    /// Sets the facts of one statement section.
    #[must_use]
    pub fn with_section(mut self, kind: StatementKind, facts: TagFacts) -> Self {
        self.sections.insert(kind, facts);
        self
    }

    /// Appends a fact to a tag of a statement section.
    pub fn push(&mut self, kind: StatementKind, tag: impl Into<String>, fact: Fact) {
        self.sections
            .entry(kind)
            .or_default()
            .entry(tag.into())
            .or_default()
            .push(fact);
    }

    /// Returns the facts of a statement section, if the filing reported it.
    #[must_use]
    pub fn section(&self, kind: StatementKind) -> Option<&TagFacts> {
        self.sections.get(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_symbol_creation() {
        let symbol = Symbol::new("aapl");
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn test_period_labels() {
        let instant = Period::Instant(date("2020-06-27"));
        assert_eq!(instant.to_string(), "2020-06-27");

        let range = Period::range(date("2019-09-29"), date("2020-06-27"));
        assert_eq!(range.to_string(), "2019-09-29-2020-06-27");
        assert_eq!("2019-09-29-2020-06-27".parse::<Period>().unwrap(), range);
        assert_eq!("2020-06-27".parse::<Period>().unwrap(), instant);
        assert!("2020-06".parse::<Period>().is_err());
        assert!("2019-09-29_2020-06-27".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_order_matches_labels() {
        let mut periods = vec![
            Period::range(date("2020-01-01"), date("2020-03-31")),
            Period::Instant(date("2021-01-01")),
            Period::Instant(date("2020-01-01")),
            Period::range(date("2019-01-01"), date("2019-12-31")),
            Period::range(date("2020-01-01"), date("2020-01-31")),
        ];
        let mut labels: Vec<String> = periods.iter().map(ToString::to_string).collect();
        periods.sort();
        labels.sort();
        let sorted: Vec<String> = periods.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, labels);
    }

    #[test]
    fn test_period_span() {
        assert_eq!(
            Period::range(date("2019-01-01"), date("2019-12-31")).span_days(),
            364
        );
        assert_eq!(Period::Instant(date("2019-01-01")).span_days(), 0);
    }

    #[test]
    fn test_value_parsing() {
        assert_eq!("59685000000".parse::<Value>().unwrap(), Value::Integer(59_685_000_000));
        assert_eq!("2.58".parse::<Value>().unwrap(), Value::Decimal(2.58));
        assert!("n/a".parse::<Value>().is_err());
    }

    #[test]
    fn test_value_difference() {
        assert_eq!(Value::Integer(100).difference(Value::Integer(70)), Value::Integer(30));
        assert_eq!(
            Value::Decimal(3.456).difference(Value::Integer(1)),
            Value::Decimal(2.46)
        );
        assert_eq!(Value::Integer(30).ratio(Value::Integer(10)), Some(Value::Decimal(3.0)));
        assert_eq!(Value::Integer(30).ratio(Value::Integer(0)), None);
    }

    #[test]
    fn test_period_serde_as_label() {
        let range = Period::range(date("2019-09-29"), date("2020-06-27"));
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "\"2019-09-29-2020-06-27\"");
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }
}
