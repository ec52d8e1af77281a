//! Colour legend for the map: a log-scale gradient bar with decade ticks.

use std::fmt::Write;

use foundation::math::{LogScale, Vec2};
use scene::{ViewConfig, Viewport};

use crate::format::format_si;
use crate::svg::escape;
use crate::symbology::{UNKNOWN_COLOR, interpolate_reds};

pub const LEGEND_TITLE: &str = "CO₂ Emissions (log scale, Mt CO₂)";
pub const LEGEND_GRADIENT_ID: &str = "legend-gradient";
const BAR_HEIGHT: f64 = 15.0;
const TICK_SIZE: f64 = 6.0;
const DECADES: [f64; 5] = [1.0, 10.0, 100.0, 1000.0, 10000.0];

#[derive(Debug, Clone, PartialEq)]
pub struct LegendTick {
    pub value: f64,
    /// Offset along the bar in pixels.
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub max_value: f64,
    pub width: f64,
    pub height: f64,
    pub ticks: Vec<LegendTick>,
}

/// `(offset, colour)` gradient stops of the bar.
pub fn gradient_stops() -> [(&'static str, String); 4] {
    [
        ("0%", UNKNOWN_COLOR.to_hex()),
        ("10%", interpolate_reds(0.2).to_hex()),
        ("50%", interpolate_reds(0.6).to_hex()),
        ("100%", interpolate_reds(1.0).to_hex()),
    ]
}

impl Legend {
    pub fn new(max_value: f64, config: &ViewConfig) -> Self {
        let scale = LogScale::new([1.0, max_value], [0.0, config.legend_width]);
        let ticks = DECADES
            .iter()
            .filter(|v| **v <= max_value)
            .filter_map(|&value| {
                Some(LegendTick {
                    value,
                    x: scale.apply(value)?,
                    label: format_si(value),
                })
            })
            .collect();
        Self {
            max_value,
            width: config.legend_width,
            height: config.legend_height,
            ticks,
        }
    }

    /// Top-left corner, anchored to the bottom-left of the viewport.
    pub fn position(viewport: &Viewport, config: &ViewConfig) -> Vec2 {
        Vec2::new(
            config.legend_margin,
            viewport.height - config.legend_height - config.legend_margin,
        )
    }

    pub fn transform(viewport: &Viewport, config: &ViewConfig) -> String {
        let p = Self::position(viewport, config);
        format!("translate({},{})", p.x, p.y)
    }

    /// Gradient definition, placed in the map's `<defs>`.
    pub fn defs() -> String {
        let mut out = format!(r#"<linearGradient id="{LEGEND_GRADIENT_ID}">"#);
        for (offset, color) in gradient_stops() {
            let _ = write!(out, r#"<stop offset="{offset}" stop-color="{color}"/>"#);
        }
        out.push_str("</linearGradient>");
        out
    }

    /// Inner markup of the legend group: bar, title and ticks.
    pub fn body(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<rect width="{w}" height="{BAR_HEIGHT}" style="fill: url(#{LEGEND_GRADIENT_ID}); stroke: #666; stroke-width: 0.5"/>"#,
            w = self.width,
        );
        let _ = write!(
            out,
            r##"<text x="0" y="-6" fill="#000" font-weight="bold">{}</text>"##,
            escape(LEGEND_TITLE)
        );
        let _ = write!(out, r#"<g class="legend-axis" transform="translate(0,{BAR_HEIGHT})">"#);
        for tick in &self.ticks {
            let _ = write!(
                out,
                r##"<g class="tick" transform="translate({x:.2},0)"><line stroke="#000" y2="{TICK_SIZE}"/><text fill="#000" y="9" dy="0.71em" text-anchor="middle">{label}</text></g>"##,
                x = tick.x,
                label = tick.label,
            );
        }
        out.push_str("</g>");
        out
    }

    /// Complete `<g class="legend">` positioned for `viewport`.
    pub fn to_svg_group(&self, viewport: &Viewport, config: &ViewConfig) -> String {
        format!(
            r#"<defs>{}</defs><g class="legend" transform="{}">{}</g>"#,
            Self::defs(),
            Self::transform(viewport, config),
            self.body()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Legend, gradient_stops};
    use pretty_assertions::assert_eq;
    use scene::{ViewConfig, Viewport};

    #[test]
    fn ticks_stop_at_max() {
        let config = ViewConfig::default();
        let legend = Legend::new(5698.1, &config);
        let labels: Vec<&str> = legend.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "10", "100", "1k"]);
        assert_eq!(legend.ticks[0].x, 0.0);
        assert!(legend.ticks.windows(2).all(|w| w[0].x < w[1].x));
        assert!(legend.ticks[3].x < config.legend_width);
    }

    #[test]
    fn every_decade_fits_a_large_max() {
        let legend = Legend::new(10000.0, &ViewConfig::default());
        assert_eq!(legend.ticks.len(), 5);
        assert!((legend.ticks[4].x - 150.0).abs() < 1e-9);
    }

    #[test]
    fn anchored_bottom_left() {
        let config = ViewConfig::default();
        let p = Legend::position(&Viewport::new(800.0, 600.0), &config);
        assert_eq!((p.x, p.y), (20.0, 520.0));
        assert_eq!(
            Legend::transform(&Viewport::new(800.0, 600.0), &config),
            "translate(20,520)"
        );
    }

    #[test]
    fn gradient_starts_grey() {
        let stops = gradient_stops();
        assert_eq!(stops[0], ("0%", "#cccccc".to_string()));
        assert_eq!(stops[3].1, "#67000d");
    }

    #[test]
    fn group_contains_title_and_ticks() {
        let config = ViewConfig::default();
        let svg = Legend::new(100.0, &config).to_svg_group(&Viewport::new(800.0, 600.0), &config);
        assert!(svg.contains("CO₂ Emissions (log scale, Mt CO₂)"));
        assert_eq!(svg.matches(r#"class="tick""#).count(), 3);
        assert!(svg.contains("url(#legend-gradient)"));
    }
}
