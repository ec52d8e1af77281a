//! Detail panel charts: source composition pie, total emissions line chart
//! and stacked source areas over time.

use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use foundation::math::{LinearScale, Vec2};
use formats::{EmissionRecord, SourceBreakdown, SourceCategory};

use crate::axis::{Axis, AxisOrient};
use crate::format::{format_grouped, format_integer};
use crate::svg::{PathData, escape};
use crate::symbology::{Rgb, category_color};

pub const NO_DATA_HTML: &str = r#"<div class="no-data-message">No data available</div>"#;
pub const CHART_HEIGHT: f64 = 250.0;
pub const PIE_MAX_SIZE: f64 = 350.0;
pub const LINE_COLOR: &str = "steelblue";

/// Either a chart or the "no data" placeholder shown in its place.
#[derive(Debug, Clone, PartialEq)]
pub enum Plot<T> {
    Data(T),
    NoData,
}

impl<T> Plot<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Plot::NoData)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Plot::Data(t) => Some(t),
            Plot::NoData => None,
        }
    }

    pub fn to_html(&self, render: impl FnOnce(&T) -> String) -> String {
        match self {
            Plot::Data(t) => render(t),
            Plot::NoData => NO_DATA_HTML.to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const LINE_MARGIN: Margin = Margin {
    top: 20.0,
    right: 30.0,
    bottom: 40.0,
    left: 50.0,
};

pub const STACKED_MARGIN: Margin = Margin {
    top: 30.0,
    right: 100.0,
    bottom: 40.0,
    left: 50.0,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub category: SourceCategory,
    pub value: f64,
    /// Clockwise from 12 o'clock, radians.
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Rgb,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub size: f64,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

/// Composition of one year; categories with non-positive values are left
/// out, and nothing positive at all yields the placeholder.
pub fn pie_chart(sources: &SourceBreakdown, size: f64) -> Plot<PieChart> {
    let entries: Vec<(SourceCategory, f64)> = SourceCategory::ALL
        .iter()
        .filter_map(|&c| sources.get(c).filter(|v| *v > 0.0).map(|v| (c, v)))
        .collect();
    let sum: f64 = entries.iter().map(|(_, v)| v).sum();
    if entries.is_empty() || !sum.is_finite() {
        return Plot::NoData;
    }

    let radius = size / 2.0 * 0.8;
    let mut angle = 0.0;
    let slices = entries
        .into_iter()
        .map(|(category, value)| {
            let start_angle = angle;
            let end_angle = start_angle + value / sum * TAU;
            angle = end_angle;
            PieSlice {
                category,
                value,
                start_angle,
                end_angle,
                color: category_color(category),
                path: arc_path(radius, start_angle, end_angle),
            }
        })
        .collect();

    Plot::Data(PieChart { size, slices })
}

fn arc_point(radius: f64, angle: f64) -> Vec2 {
    Vec2::new(radius * angle.sin(), -radius * angle.cos())
}

/// Pie wedge from the origin; a full turn is drawn as two half circles.
fn arc_path(radius: f64, start: f64, end: f64) -> String {
    let mut d = PathData::new();
    if end - start >= TAU - 1e-9 {
        d.move_to(Vec2::new(0.0, -radius))
            .arc_to(radius, true, Vec2::new(0.0, radius))
            .arc_to(radius, true, Vec2::new(0.0, -radius))
            .close();
    } else {
        d.move_to(arc_point(radius, start))
            .arc_to(radius, end - start > PI, arc_point(radius, end))
            .line_to(Vec2::new(0.0, 0.0))
            .close();
    }
    d.finish()
}

fn legend_items(class: &str, categories: impl IntoIterator<Item = SourceCategory>) -> String {
    let mut out = format!(r#"<div class="{class}">"#);
    for c in categories {
        let _ = write!(
            out,
            r#"<div class="{class}-item"><span class="{class}-color" style="background-color:{}"></span><span>{}</span></div>"#,
            category_color(c).to_hex(),
            c.label()
        );
    }
    out.push_str("</div>");
    out
}

impl PieChart {
    pub fn to_html(&self) -> String {
        let half = self.size / 2.0;
        let mut out = String::from(r#"<div class="pie-tooltip"></div>"#);
        let _ = write!(
            out,
            r#"<svg class="pie-chart" width="{s}" height="{s}"><g transform="translate({half},{half})">"#,
            s = self.size,
        );
        for slice in &self.slices {
            let _ = write!(
                out,
                r##"<g class="arc"><path d="{}" fill="{}" stroke="#fff" stroke-width="1" data-category="{}" data-value="{}"/></g>"##,
                slice.path,
                slice.color.to_hex(),
                slice.category.label(),
                slice.value,
            );
        }
        out.push_str("</g></svg>");
        out.push_str(&legend_items(
            "pie-legend",
            self.slices.iter().map(|s| s.category),
        ));
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub x: LinearScale,
    pub y: LinearScale,
    /// `(year, total)` pairs with a known total, ascending by year.
    pub points: Vec<(i32, f64)>,
}

/// Totals over time; needs at least one positive total.
pub fn line_chart(series: &[&EmissionRecord], width: f64, title: &str) -> Plot<LineChart> {
    let points: Vec<(i32, f64)> = series
        .iter()
        .filter_map(|r| r.metrics.total.map(|t| (r.year, t)))
        .collect();
    if !points.iter().any(|(_, v)| *v > 0.0) {
        return Plot::NoData;
    }

    let m = LINE_MARGIN;
    let x = year_scale(points.iter().map(|(y, _)| *y), width, m);
    let max = points.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let y = LinearScale::new([0.0, max], [CHART_HEIGHT - m.bottom, m.top]).nice(10);

    Plot::Data(LineChart {
        title: title.to_string(),
        width,
        height: CHART_HEIGHT,
        x,
        y,
        points,
    })
}

fn year_scale(years: impl Iterator<Item = i32>, width: f64, m: Margin) -> LinearScale {
    let (lo, hi) = years.fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    LinearScale::new([f64::from(lo), f64::from(hi)], [m.left, width - m.right])
}

fn chart_open(out: &mut String, width: f64, height: f64, title: &str, title_y: f64) {
    let _ = write!(
        out,
        r#"<svg class="chart-svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" preserveAspectRatio="xMidYMid meet"><text class="chart-title" x="{}" y="{title_y}" text-anchor="middle">{}</text>"#,
        width / 2.0,
        escape(title),
    );
}

fn axes(out: &mut String, x: LinearScale, y: LinearScale, height: f64, m: Margin) {
    let x_axis = Axis {
        orient: AxisOrient::Bottom,
        class: "x-axis",
        scale: x,
        offset: height - m.bottom,
        rotate_labels: true,
        format: format_integer,
    };
    let y_axis = Axis {
        orient: AxisOrient::Left,
        class: "y-axis",
        scale: y,
        offset: m.left,
        rotate_labels: false,
        format: format_grouped,
    };
    out.push_str(&x_axis.to_svg());
    out.push_str(&y_axis.to_svg());
}

impl LineChart {
    pub fn position(&self, year: i32, value: f64) -> Vec2 {
        Vec2::new(self.x.apply(f64::from(year)), self.y.apply(value))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        chart_open(&mut out, self.width, self.height, &self.title, 15.0);

        let mut d = PathData::new();
        d.polyline(self.points.iter().map(|&(yr, v)| self.position(yr, v)), false);
        let _ = write!(
            out,
            r#"<path class="line" fill="none" stroke="{LINE_COLOR}" stroke-width="2" d="{}"/>"#,
            d.finish()
        );
        for &(year, value) in &self.points {
            let p = self.position(year, value);
            let _ = write!(
                out,
                r#"<circle class="data-point" cx="{:.2}" cy="{:.2}" r="3" fill="{LINE_COLOR}"/>"#,
                p.x, p.y
            );
        }

        axes(&mut out, self.x, self.y, self.height, LINE_MARGIN);
        out.push_str("</svg>");
        out
    }
}

/// One category band: `(year, lower, upper)` in data units.
#[derive(Debug, Clone, PartialEq)]
pub struct StackLayer {
    pub category: SourceCategory,
    pub color: Rgb,
    pub bands: Vec<(i32, f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackedAreaChart {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub x: LinearScale,
    pub y: LinearScale,
    pub layers: Vec<StackLayer>,
}

/// Sources stacked over time in fixed category order; absent or negative
/// values count as zero. Needs at least one positive source value.
pub fn stacked_area_chart(series: &[&EmissionRecord], width: f64, title: &str) -> Plot<StackedAreaChart> {
    if !series.iter().any(|r| r.metrics.sources.any_positive()) {
        return Plot::NoData;
    }

    let mut baseline = vec![0.0; series.len()];
    let layers: Vec<StackLayer> = SourceCategory::ALL
        .iter()
        .map(|&category| {
            let bands = series
                .iter()
                .zip(baseline.iter_mut())
                .map(|(r, base)| {
                    let lower = *base;
                    *base += r.metrics.sources.value_or_zero(category);
                    (r.year, lower, *base)
                })
                .collect();
            StackLayer {
                category,
                color: category_color(category),
                bands,
            }
        })
        .collect();

    let m = STACKED_MARGIN;
    let x = year_scale(series.iter().map(|r| r.year), width, m);
    let max = baseline.iter().copied().fold(0.0, f64::max);
    let y = LinearScale::new([0.0, max], [CHART_HEIGHT - m.bottom, m.top]).nice(10);

    Plot::Data(StackedAreaChart {
        title: title.to_string(),
        width,
        height: CHART_HEIGHT,
        x,
        y,
        layers,
    })
}

impl StackedAreaChart {
    fn area_path(&self, layer: &StackLayer) -> String {
        let upper = layer
            .bands
            .iter()
            .map(|&(yr, _, hi)| Vec2::new(self.x.apply(f64::from(yr)), self.y.apply(hi)));
        let lower = layer
            .bands
            .iter()
            .rev()
            .map(|&(yr, lo, _)| Vec2::new(self.x.apply(f64::from(yr)), self.y.apply(lo)));
        let mut d = PathData::new();
        d.polyline(upper.chain(lower), true);
        d.finish()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        chart_open(&mut out, self.width, self.height, &self.title, 20.0);
        for layer in &self.layers {
            let _ = write!(
                out,
                r##"<path class="area" data-category="{}" d="{}" fill="{}" stroke="#fff" stroke-width="0.5"/>"##,
                layer.category.label(),
                self.area_path(layer),
                layer.color.to_hex(),
            );
        }
        axes(&mut out, self.x, self.y, self.height, STACKED_MARGIN);
        out.push_str("</svg>");
        out.push_str(&legend_items("area-legend", SourceCategory::ALL));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{NO_DATA_HTML, Plot, line_chart, pie_chart, stacked_area_chart};
    use formats::{EmissionRecord, Metrics, SourceBreakdown, SourceCategory};
    use pretty_assertions::assert_eq;
    use std::f64::consts::TAU;

    fn record(year: i32, total: Option<f64>, sources: [Option<f64>; 6]) -> EmissionRecord {
        EmissionRecord {
            code: "FRA".to_string(),
            year,
            metrics: Metrics {
                total,
                sources: SourceBreakdown(sources),
                per_capita: None,
            },
        }
    }

    #[test]
    fn pie_skips_non_positive_categories() {
        let sources = SourceBreakdown([Some(100.0), Some(0.0), Some(50.0), None, Some(-2.0), Some(50.0)]);
        let Plot::Data(pie) = pie_chart(&sources, 350.0) else {
            panic!("expected a pie");
        };
        let cats: Vec<SourceCategory> = pie.slices.iter().map(|s| s.category).collect();
        assert_eq!(cats, vec![SourceCategory::Coal, SourceCategory::Gas, SourceCategory::Other]);
        assert_eq!(pie.total(), 200.0);
        assert_eq!(pie.slices[0].start_angle, 0.0);
        assert!((pie.slices[0].end_angle - TAU / 2.0).abs() < 1e-12);
        assert!((pie.slices[2].end_angle - TAU).abs() < 1e-12);
        // Half turn is not a large arc.
        assert!(pie.slices[0].path.contains(",0,0,1,"));
    }

    #[test]
    fn all_zero_sources_give_placeholder() {
        let sources = SourceBreakdown([Some(0.0), None, Some(0.0), None, None, Some(-1.0)]);
        let plot = pie_chart(&sources, 350.0);
        assert!(plot.is_no_data());
        assert_eq!(plot.to_html(|p| p.to_html()), NO_DATA_HTML);
    }

    #[test]
    fn single_category_draws_full_circle() {
        let sources = SourceBreakdown([None, Some(12.0), None, None, None, None]);
        let Plot::Data(pie) = pie_chart(&sources, 100.0) else {
            panic!("expected a pie");
        };
        assert_eq!(pie.slices.len(), 1);
        assert_eq!(pie.slices[0].path.matches('A').count(), 2);
        assert!(pie.to_html().contains(r#"data-category="Oil""#));
    }

    #[test]
    fn line_chart_skips_missing_totals() {
        let a = record(1990, Some(10.0), [None; 6]);
        let b = record(2000, None, [None; 6]);
        let c = record(2010, Some(287.0), [None; 6]);
        let Plot::Data(chart) = line_chart(&[&a, &b, &c], 500.0, "Totals") else {
            panic!("expected a chart");
        };
        assert_eq!(chart.points, vec![(1990, 10.0), (2010, 287.0)]);
        assert_eq!(chart.y.domain(), [0.0, 300.0]);
        assert_eq!(chart.x.range(), [50.0, 470.0]);
        let html = chart.to_html();
        assert_eq!(html.matches("<circle").count(), 2);
        assert!(html.contains(">Totals</text>"));
    }

    #[test]
    fn line_chart_without_positive_totals_is_no_data() {
        let a = record(1990, Some(0.0), [None; 6]);
        let b = record(2000, None, [None; 6]);
        assert!(line_chart(&[&a, &b], 500.0, "t").is_no_data());
        assert!(line_chart(&[], 500.0, "t").is_no_data());
    }

    #[test]
    fn stacks_in_fixed_order_with_zero_fill() {
        let a = record(1990, Some(30.0), [Some(10.0), None, Some(20.0), None, None, None]);
        let b = record(2000, Some(60.0), [Some(30.0), Some(20.0), Some(-5.0), None, None, Some(10.0)]);
        let Plot::Data(chart) = stacked_area_chart(&[&a, &b], 500.0, "Sources") else {
            panic!("expected a chart");
        };
        assert_eq!(chart.layers.len(), 6);
        assert_eq!(chart.layers[0].bands, vec![(1990, 0.0, 10.0), (2000, 0.0, 30.0)]);
        assert_eq!(chart.layers[1].bands, vec![(1990, 10.0, 10.0), (2000, 30.0, 50.0)]);
        assert_eq!(chart.layers[2].bands, vec![(1990, 10.0, 30.0), (2000, 50.0, 50.0)]);
        assert_eq!(chart.layers[5].bands[1], (2000, 50.0, 60.0));
        assert_eq!(chart.y.domain(), [0.0, 60.0]);
        let html = chart.to_html();
        assert_eq!(html.matches(r#"class="area""#).count(), 6);
        assert_eq!(html.matches("area-legend-item").count(), 6);
    }

    #[test]
    fn stacked_chart_needs_a_positive_source() {
        let a = record(1990, Some(30.0), [Some(0.0), None, None, None, None, None]);
        assert!(stacked_area_chart(&[&a], 500.0, "Sources").is_no_data());
    }
}
