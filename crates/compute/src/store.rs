use std::collections::{BTreeSet, HashMap};

use formats::{BoundaryCollection, BoundaryFeature, Dataset, EmissionRecord};
use tracing::{debug, warn};

use crate::analysis::{YearIndex, years_of};

pub const UNKNOWN_COUNTRY: &str = "Unknown Country";

/// Loaded datasets plus the lookups derived from them once at load time.
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct EmissionsStore {
    boundaries: BoundaryCollection,
    records: Vec<EmissionRecord>,
    years: Vec<i32>,
    feature_by_code: HashMap<String, usize>,
}

impl EmissionsStore {
    pub fn new(dataset: Dataset) -> Self {
        let Dataset {
            boundaries,
            emissions: records,
        } = dataset;

        let mut feature_by_code = HashMap::new();
        for (i, feature) in boundaries.features.iter().enumerate() {
            if feature.code.is_empty() {
                continue;
            }
            // First feature wins, like a linear search would.
            feature_by_code.entry(feature.code.clone()).or_insert(i);
        }

        let years = years_of(&records);
        let store = Self {
            boundaries,
            records,
            years,
            feature_by_code,
        };
        store.log_unmatched();
        store
    }

    fn log_unmatched(&self) {
        let unmatched = self.unmatched_codes();
        if !unmatched.is_empty() {
            warn!(
                "{} emission country codes have no boundary feature: {}",
                unmatched.len(),
                unmatched.join(", ")
            );
        }

        let with_data: BTreeSet<&str> = self.records.iter().map(|r| r.code.as_str()).collect();
        for feature in &self.boundaries.features {
            if !feature.code.is_empty() && !with_data.contains(feature.code.as_str()) {
                debug!("boundary feature {} has no emission rows", feature.code);
            }
        }
    }

    pub fn boundaries(&self) -> &BoundaryCollection {
        &self.boundaries
    }

    pub fn features(&self) -> &[BoundaryFeature] {
        &self.boundaries.features
    }

    pub fn records(&self) -> &[EmissionRecord] {
        &self.records
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn year_at(&self, slot: usize) -> Option<i32> {
        self.years.get(slot).copied()
    }

    pub fn slot_of(&self, year: i32) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    pub fn feature(&self, code: &str) -> Option<&BoundaryFeature> {
        self.feature_by_code
            .get(code)
            .and_then(|&i| self.boundaries.features.get(i))
    }

    pub fn display_name(&self, code: &str) -> &str {
        self.feature(code)
            .map(|f| f.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_COUNTRY)
    }

    pub fn index_for_year(&self, year: i32) -> YearIndex {
        YearIndex::for_year(&self.records, year)
    }

    /// Every record of `code`, ascending by year.
    pub fn series(&self, code: &str) -> Vec<&EmissionRecord> {
        let mut out: Vec<&EmissionRecord> = self.records.iter().filter(|r| r.code == code).collect();
        out.sort_by_key(|r| r.year);
        out
    }

    /// Emission country codes without a boundary feature, sorted.
    pub fn unmatched_codes(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.code.as_str())
            .filter(|code| !self.feature_by_code.contains_key(*code))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{EmissionsStore, UNKNOWN_COUNTRY};
    use formats::load_dataset_from_paths;
    use pretty_assertions::assert_eq;

    fn sample_store() -> EmissionsStore {
        let root =
            std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../apps/viewer_web/assets");
        let ds = load_dataset_from_paths(
            root.join("map/world_sample.geojson"),
            root.join("data/co2_sample.csv"),
        )
        .expect("load dataset");
        EmissionsStore::new(ds)
    }

    #[test]
    fn years_and_slots() {
        let store = sample_store();
        assert_eq!(store.years(), &[1990, 2000, 2010]);
        assert_eq!(store.year_at(2), Some(2010));
        assert_eq!(store.year_at(3), None);
        assert_eq!(store.slot_of(2000), Some(1));
        assert_eq!(store.slot_of(1995), None);
    }

    #[test]
    fn names_fall_back_for_unmatched_codes() {
        let store = sample_store();
        assert_eq!(store.display_name("FRA"), "France");
        assert_eq!(store.display_name("XKX"), UNKNOWN_COUNTRY);
    }

    #[test]
    fn series_is_sorted_by_year() {
        let store = sample_store();
        let years: Vec<i32> = store.series("DEU").iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1990, 2000, 2010]);
        assert!(store.series("ATA").is_empty());
    }

    #[test]
    fn reports_unmatched_emission_codes() {
        let store = sample_store();
        assert_eq!(store.unmatched_codes(), vec!["XKX"]);
    }
}
