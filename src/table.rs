//! Sparse merged table of all parsed series, keyed by thread count

use crate::parser::ParsedLog;
use std::collections::{BTreeMap, BTreeSet};

/// A file's parsed records together with its display label
#[derive(Debug, Clone)]
pub struct LabeledSeries {
    pub label: String,
    pub log: ParsedLog,
}

impl LabeledSeries {
    pub fn new(label: impl Into<String>, log: ParsedLog) -> Self {
        Self {
            label: label.into(),
            log,
        }
    }

    pub fn time_column(&self) -> String {
        format!("{}_Time", self.label)
    }

    pub fn attempts_column(&self) -> String {
        format!("{}_Attempts", self.label)
    }
}

/// thread count -> column name -> value
///
/// Rows only hold the columns of files that reported that thread count.
#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    rows: BTreeMap<u64, BTreeMap<String, f64>>,
}

impl MergedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from every series, in order
    pub fn from_series(series: &[LabeledSeries]) -> Self {
        let mut table = Self::new();
        for s in series {
            table.insert_series(s);
        }
        table
    }

    /// Add one `_Time` and one `_Attempts` cell per record
    ///
    /// A cell written twice (repeated thread count or repeated label) keeps
    /// the last value.
    pub fn insert_series(&mut self, series: &LabeledSeries) {
        let time_col = series.time_column();
        let attempts_col = series.attempts_column();

        for record in series.log.records() {
            let row = self.rows.entry(record.threads).or_default();
            row.insert(time_col.clone(), record.time_secs);
            row.insert(attempts_col.clone(), record.avg_attempts);
        }
    }

    /// Distinct column names, sorted lexicographically
    pub fn columns(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self.rows.values().flat_map(|row| row.keys()).collect();
        names.into_iter().cloned().collect()
    }

    /// Distinct thread counts, ascending
    pub fn thread_counts(&self) -> Vec<u64> {
        self.rows.keys().copied().collect()
    }

    pub fn get(&self, threads: u64, column: &str) -> Option<f64> {
        self.rows.get(&threads)?.get(column).copied()
    }

    /// Row cells in `columns` order, `None` where the row has no value
    pub fn row(&self, threads: u64, columns: &[String]) -> Vec<Option<f64>> {
        let row = self.rows.get(&threads);
        columns
            .iter()
            .map(|col| row.and_then(|r| r.get(col).copied()))
            .collect()
    }

    /// Smallest and largest thread count seen in any series
    pub fn thread_range(&self) -> Option<(u64, u64)> {
        let min = *self.rows.keys().next()?;
        let max = *self.rows.keys().next_back()?;
        Some((min, max))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
