//! Per-country detail panel.

use std::fmt::Write;

use compute::{EmissionsStore, YearIndex};
use formats::{EmissionRecord, Metrics};

use crate::charts::{
    LineChart, PIE_MAX_SIZE, PieChart, Plot, StackedAreaChart, line_chart, pie_chart,
    stacked_area_chart,
};
use crate::format::format_amount;
use crate::svg::escape;

pub const TOTALS_TITLE: &str = "Total CO₂ Emissions Over Time (Mt)";
pub const SOURCES_TITLE: &str = "Emission Sources Over Time";

#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    pub name: &'static str,
    pub value: Option<f64>,
    pub unit: &'static str,
}

impl MetricEntry {
    pub fn display(&self) -> String {
        format_amount(self.value, self.unit)
    }
}

/// Everything shown for one selected country in one year. Rebuilt in full on
/// every selection, year change or resize.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub code: String,
    pub name: String,
    pub year: i32,
    /// The country has a row for `year`.
    pub has_current: bool,
    pub metrics: Vec<MetricEntry>,
    pub composition: Plot<PieChart>,
    pub totals: Plot<LineChart>,
    pub sources: Plot<StackedAreaChart>,
}

pub fn build_detail(
    code: &str,
    store: &EmissionsStore,
    index: &YearIndex,
    year: i32,
    panel_width: f64,
) -> DetailPanel {
    let current: Option<&Metrics> = index.get(code);
    let series: Vec<&EmissionRecord> = store.series(code);

    let metrics = vec![
        MetricEntry {
            name: "Total",
            value: current.and_then(|m| m.total),
            unit: "Mt",
        },
        MetricEntry {
            name: "Per Capita",
            value: current.and_then(|m| m.per_capita),
            unit: "t CO₂",
        },
    ];
    let composition = match current {
        Some(m) => pie_chart(&m.sources, (panel_width * 0.5).min(PIE_MAX_SIZE)),
        None => Plot::NoData,
    };

    DetailPanel {
        code: code.to_string(),
        name: store.display_name(code).to_string(),
        year,
        has_current: current.is_some(),
        metrics,
        composition,
        totals: line_chart(&series, panel_width, TOTALS_TITLE),
        sources: stacked_area_chart(&series, panel_width, SOURCES_TITLE),
    }
}

impl DetailPanel {
    pub fn title(&self) -> String {
        format!("{} CO₂ Emissions ({})", self.name, self.year)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "<h2>{}</h2>", escape(&self.title()));

        out.push_str(r#"<div class="top-section"><div class="metrics-container"><h3>Current Year Breakdown</h3><div class="metrics-grid">"#);
        for metric in &self.metrics {
            let _ = write!(
                out,
                r#"<div class="metric"><div class="metric-name">{}</div><div class="metric-value">{}</div></div>"#,
                metric.name,
                escape(&metric.display())
            );
        }
        out.push_str("</div></div>");
        let _ = write!(
            out,
            r#"<div class="pie-container">{}</div></div>"#,
            self.composition.to_html(PieChart::to_html)
        );

        let _ = write!(
            out,
            r#"<div class="charts-section" style="margin-top: 10px"><div class="chart-container">{}</div><div class="chart-container">{}</div></div>"#,
            self.totals.to_html(LineChart::to_html),
            self.sources.to_html(StackedAreaChart::to_html),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::build_detail;
    use crate::charts::{NO_DATA_HTML, Plot};
    use compute::EmissionsStore;
    use formats::{SourceCategory, load_dataset_from_strs};
    use pretty_assertions::assert_eq;

    const GEOJSON: &str = include_str!("../../apps/viewer_web/assets/map/world_sample.geojson");
    const CSV: &str = include_str!("../../apps/viewer_web/assets/data/co2_sample.csv");

    fn store() -> EmissionsStore {
        EmissionsStore::new(load_dataset_from_strs(GEOJSON, CSV).expect("fixtures load"))
    }

    #[test]
    fn france_in_2010() {
        let store = store();
        let index = store.index_for_year(2010);
        let panel = build_detail("FRA", &store, &index, 2010, 500.0);

        assert_eq!(panel.title(), "France CO₂ Emissions (2010)");
        assert!(panel.has_current);
        assert_eq!(panel.metrics[0].display(), "300 Mt");
        assert_eq!(panel.metrics[1].display(), "4.6 t CO₂");

        let Plot::Data(pie) = &panel.composition else {
            panic!("expected a pie");
        };
        assert_eq!(pie.slices.len(), 6);
        assert_eq!(pie.total(), 300.0);
        let order: Vec<SourceCategory> = pie.slices.iter().map(|s| s.category).collect();
        assert_eq!(order, SourceCategory::ALL.to_vec());

        let totals = panel.totals.data().expect("line chart");
        let years: Vec<i32> = totals.points.iter().map(|p| p.0).collect();
        assert_eq!(years, vec![1990, 2000, 2010]);

        let sources = panel.sources.data().expect("stacked chart");
        assert!(sources.layers.iter().all(|l| l.bands.len() == 3));

        let html = panel.to_html();
        assert!(html.starts_with("<h2>France CO₂ Emissions (2010)</h2>"));
        for class in ["top-section", "metrics-container", "pie-container", "charts-section", "chart-container"] {
            assert!(html.contains(class), "missing {class}");
        }
        assert!(!html.contains(NO_DATA_HTML));
    }

    #[test]
    fn boundary_without_rows_shows_placeholders() {
        let store = store();
        let index = store.index_for_year(2010);
        let panel = build_detail("ATA", &store, &index, 2010, 500.0);

        assert_eq!(panel.name, "Antarctica");
        assert!(!panel.has_current);
        assert!(panel.metrics.iter().all(|m| m.display() == "No data"));
        assert!(panel.composition.is_no_data());
        assert!(panel.totals.is_no_data());
        assert!(panel.sources.is_no_data());
        assert_eq!(panel.to_html().matches(NO_DATA_HTML).count(), 3);
    }

    #[test]
    fn unknown_code_falls_back_to_placeholder_name() {
        let store = store();
        let index = store.index_for_year(2010);
        let panel = build_detail("XKX", &store, &index, 2010, 500.0);
        assert_eq!(panel.name, "Unknown Country");
        assert!(panel.has_current);
    }
}
