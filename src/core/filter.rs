// SegmentLens - core/filter.rs
//
// Composable filter engine for dataset rows.
// All active constraints are AND-combined.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{Column, Record};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Complete filter state. All constraints are AND-combined when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Permitted values per column.
    ///
    /// A column that is not a key here is unconstrained. A key mapped to an
    /// empty set permits nothing: every row is excluded. The two cases must
    /// not be conflated.
    #[serde(default)]
    pub include: BTreeMap<Column, BTreeSet<String>>,

    /// Substring text search (case-insensitive). Empty = no filter.
    #[serde(default)]
    pub text_search: String,
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.search_term().is_none()
    }

    /// Single-value filter on `column`, e.g. one business segment.
    pub fn only(column: Column, value: &str) -> Self {
        let mut state = Self::default();
        state.restrict(column, [value.to_string()]);
        state
    }

    /// Replace the permitted set for `column`.
    pub fn restrict<I>(&mut self, column: Column, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.include.insert(column, values.into_iter().collect());
    }

    /// Remove any constraint on `column`.
    pub fn unrestrict(&mut self, column: Column) {
        self.include.remove(&column);
    }

    /// Whether `value` currently passes the constraint on `column`.
    pub fn permits(&self, column: Column, value: &str) -> bool {
        self.include
            .get(&column)
            .map_or(true, |allowed| allowed.contains(value))
    }

    /// Flip a single value in or out of the permitted set for `column`.
    ///
    /// `universe` is the full list of values the column can take; it seeds
    /// the set the first time an unconstrained column is narrowed.
    pub fn toggle(&mut self, column: Column, value: &str, universe: &[String]) {
        let allowed = self
            .include
            .entry(column)
            .or_insert_with(|| universe.iter().cloned().collect());
        if !allowed.remove(value) {
            allowed.insert(value.to_string());
        }
    }

    /// The effective search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.text_search.trim();
        (!term.is_empty()).then_some(term)
    }
}

/// Apply filters to a slice of rows, returning indices of matching rows.
///
/// Returns a Vec of indices into the original slice, in input order. This
/// avoids copying rows and lets the views render straight from the cache.
pub fn apply_filters<R: Record>(rows: &[R], filter: &FilterState) -> Vec<usize> {
    if filter.is_empty() {
        return (0..rows.len()).collect();
    }

    let needle = filter.search_term().map(str::to_lowercase);

    rows.iter()
        .enumerate()
        .filter(|(_, row)| matches_all(*row, filter, needle.as_deref()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Filter `rows` into a new table preserving input order.
///
/// The input is never mutated; the result is independent of it.
pub fn filter<R: Record + Clone>(rows: &[R], filter: &FilterState) -> Vec<R> {
    apply_filters(rows, filter)
        .into_iter()
        .map(|idx| rows[idx].clone())
        .collect()
}

/// Check if a single row matches all active filters.
fn matches_all<R: Record>(row: &R, filter: &FilterState, needle: Option<&str>) -> bool {
    // Category membership: absent values are never members.
    for (column, allowed) in &filter.include {
        match row.text(*column) {
            Some(value) if allowed.contains(value) => {}
            _ => return false,
        }
    }

    // Text search over the dataset's search columns.
    if let Some(needle) = needle {
        let hit = R::SEARCH_COLUMNS.iter().any(|column| {
            row.text(*column)
                .is_some_and(|value| value.to_lowercase().contains(needle))
        });
        if !hit {
            return false;
        }
    }

    true
}
