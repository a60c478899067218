//! Period normalization and per-period deduplication.

use filings_core::{Fact, Period, Value};
use std::collections::HashSet;
use tracing::trace;

/// Returns one `(period, value)` per distinct period of a tag's facts.
///
/// Facts are visited in source order. Segmented facts are skipped, the first
/// consolidated fact for a period wins and later ones for the same period are
/// discarded. A fact without a value counts as zero.
#[must_use]
pub fn first_per_period(facts: &[Fact]) -> Vec<(Period, Value)> {
    let mut seen = HashSet::with_capacity(facts.len());
    let mut cells = Vec::with_capacity(facts.len());

    for fact in facts {
        if fact.is_segmented() {
            continue;
        }
        if !seen.insert(fact.period) {
            trace!(period = %fact.period, "Discarding duplicate fact");
            continue;
        }
        cells.push((fact.period, fact.value.unwrap_or_default()));
    }

    cells
}
