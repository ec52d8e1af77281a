use formats::Metrics;
use serde::Serialize;

use crate::analysis::Statistics;
use crate::store::EmissionsStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearEntry {
    pub year: i32,
    #[serde(flatten)]
    pub metrics: Metrics,
}

/// Everything the table holds about one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryReport {
    pub code: String,
    pub name: String,
    pub has_boundary: bool,
    /// Smallest and largest known total.
    pub total_range: Option<(f64, f64)>,
    pub series: Vec<YearEntry>,
}

impl EmissionsStore {
    pub fn report(&self, code: &str) -> CountryReport {
        let series: Vec<YearEntry> = self
            .series(code)
            .into_iter()
            .map(|r| YearEntry {
                year: r.year,
                metrics: r.metrics,
            })
            .collect();
        let totals: Vec<f64> = series.iter().filter_map(|e| e.metrics.total).collect();
        CountryReport {
            code: code.to_string(),
            name: self.display_name(code).to_string(),
            has_boundary: self.feature(code).is_some(),
            total_range: Statistics::min_max(&totals),
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::store::EmissionsStore;
    use formats::load_dataset_from_strs;
    use pretty_assertions::assert_eq;

    const GEOJSON: &str = include_str!("../../apps/viewer_web/assets/map/world_sample.geojson");
    const CSV: &str = include_str!("../../apps/viewer_web/assets/data/co2_sample.csv");

    #[test]
    fn report_lists_years_in_order() {
        let store = EmissionsStore::new(load_dataset_from_strs(GEOJSON, CSV).expect("fixtures load"));
        let report = store.report("DEU");
        assert_eq!(report.name, "Germany");
        assert!(report.has_boundary);
        let years: Vec<i32> = report.series.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![1990, 2000, 2010]);
        assert_eq!(report.total_range, Some((833.1, 1052.1)));

        let json = serde_json::to_value(&report).expect("serializable");
        assert_eq!(json["series"][0]["year"], 1990);
        assert_eq!(json["series"][0]["total"], 1052.1);
    }

    #[test]
    fn kosovo_has_rows_but_no_shape() {
        let store = EmissionsStore::new(load_dataset_from_strs(GEOJSON, CSV).expect("fixtures load"));
        let report = store.report("XKX");
        assert_eq!(report.name, "Unknown Country");
        assert!(!report.has_boundary);
        assert_eq!(report.series.len(), 1);
        assert_eq!(report.series[0].metrics.sources.0[4], None);
    }
}
