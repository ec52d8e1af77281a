use std::collections::{BTreeSet, HashMap};

use formats::{EmissionRecord, Metrics};

use super::statistics::Statistics;

/// Distinct years of the table, ascending.
pub fn years_of(records: &[EmissionRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Country code -> metrics, scoped to exactly one year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearIndex {
    year: Option<i32>,
    entries: HashMap<String, Metrics>,
}

impl YearIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_year(records: &[EmissionRecord], year: i32) -> Self {
        let mut index = Self::new();
        index.rebuild(records, year);
        index
    }

    /// Clears the index and refills it from every record of `year`.
    ///
    /// When a country has several rows for the same year the last one wins.
    pub fn rebuild(&mut self, records: &[EmissionRecord], year: i32) {
        self.entries.clear();
        self.year = Some(year);
        for record in records {
            if record.year == year && !record.code.is_empty() {
                self.entries.insert(record.code.clone(), record.metrics);
            }
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn get(&self, code: &str) -> Option<&Metrics> {
        self.entries.get(code)
    }

    pub fn total(&self, code: &str) -> Option<f64> {
        self.get(code).and_then(|m| m.total)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Metrics)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn max_total(&self) -> Option<f64> {
        Statistics::max(self.entries.values().map(|m| m.total))
    }
}

pub fn index_for_year(records: &[EmissionRecord], year: i32) -> YearIndex {
    YearIndex::for_year(records, year)
}
