//! Statement tables keyed by `(tag, period)`.
//!
//! A [`StatementTable`] is the typed counterpart of a tag-by-period grid: rows
//! are tags, columns are [`Period`]s in ascending label order, and each cell
//! holds at most one [`Value`]. Absent cells are the "missing" state.

use polars::prelude::{Column, DataFrame, PlSmallStr};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::Result,
    statement::StatementKind,
    types::{Period, Value},
};

/// Name of the tag column in [`StatementTable::to_dataframe`] output.
pub const TAG_COLUMN: &str = "tag";

/// Two-dimensional statement table: rows are tags, columns are periods.
#[derive(Clone, Debug, PartialEq)]
pub struct StatementTable {
    kind: StatementKind,
    rows: BTreeMap<String, BTreeMap<Period, Value>>,
    periods: BTreeSet<Period>,
}

impl StatementTable {
    /// Creates an empty table for the given statement.
    #[must_use]
    pub const fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            rows: BTreeMap::new(),
            periods: BTreeSet::new(),
        }
    }

    /// Returns the statement this table belongs to.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Returns true if the table has neither rows nor columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.periods.is_empty()
    }

    /// Number of rows (tags).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (periods).
    #[must_use]
    pub fn width(&self) -> usize {
        self.periods.len()
    }

    /// Ensures a row exists for `tag`, even if it has no values yet.
    pub fn add_row(&mut self, tag: impl Into<String>) {
        self.rows.entry(tag.into()).or_default();
    }

    /// Sets the cell at `(tag, period)`, returning the value it replaced.
    pub fn insert(&mut self, tag: impl Into<String>, period: Period, value: Value) -> Option<Value> {
        self.periods.insert(period);
        self.rows
            .entry(tag.into())
            .or_default()
            .insert(period, value)
    }

    /// Clears the cell at `(tag, period)`, returning its value. The column is kept.
    pub fn remove(&mut self, tag: &str, period: &Period) -> Option<Value> {
        self.rows.get_mut(tag)?.remove(period)
    }

    /// Returns the cell at `(tag, period)`.
    #[must_use]
    pub fn get(&self, tag: &str, period: &Period) -> Option<Value> {
        self.rows.get(tag)?.get(period).copied()
    }

    /// Returns true if the table has a row for `tag`.
    #[must_use]
    pub fn has_row(&self, tag: &str) -> bool {
        self.rows.contains_key(tag)
    }

    /// Returns the cells of one row, keyed by period.
    #[must_use]
    pub fn row(&self, tag: &str) -> Option<&BTreeMap<Period, Value>> {
        self.rows.get(tag)
    }

    /// Iterates over the tags in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Iterates over the periods in ascending label order.
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.periods.iter().copied()
    }

    /// Returns true if the table has a column for `period`.
    #[must_use]
    pub fn has_column(&self, period: &Period) -> bool {
        self.periods.contains(period)
    }

    /// Returns the most recent column, i.e. the last in label order.
    #[must_use]
    pub fn latest_period(&self) -> Option<Period> {
        self.periods.last().copied()
    }

    /// Counts the rows without a value in the given column.
    #[must_use]
    pub fn missing_in_column(&self, period: &Period) -> usize {
        self.rows
            .values()
            .filter(|cells| !cells.contains_key(period))
            .count()
    }

    /// Removes a column and all of its cells. Rows are kept.
    pub fn remove_column(&mut self, period: &Period) -> bool {
        for cells in self.rows.values_mut() {
            cells.remove(period);
        }
        self.periods.remove(period)
    }

    /// Keeps only the columns for which `keep` returns true.
    pub fn retain_columns(&mut self, mut keep: impl FnMut(&Period) -> bool) {
        let dropped: Vec<Period> = self.periods.iter().filter(|p| !keep(*p)).copied().collect();
        for period in &dropped {
            self.remove_column(period);
        }
    }

    /// Renders the table as a polars DataFrame.
    ///
    /// The first column is [`TAG_COLUMN`]; each period follows as a `Float64`
    /// column named by its label, in ascending order, with nulls for missing cells.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.periods.len() + 1);
        columns.push(Column::new(
            PlSmallStr::from(TAG_COLUMN),
            self.rows.keys().map(String::as_str).collect::<Vec<_>>(),
        ));

        for period in &self.periods {
            let values: Vec<Option<f64>> = self
                .rows
                .values()
                .map(|cells| cells.get(period).map(Value::as_f64))
                .collect();
            columns.push(Column::new(PlSmallStr::from(period.to_string()), values));
        }

        Ok(DataFrame::new(columns)?)
    }
}
