//! Country shapes coloured by the active year's totals.

use std::fmt::Write;

use compute::YearIndex;
use foundation::math::NaturalEarth;
use formats::BoundaryFeature;
use scene::{ViewConfig, Viewport, ZoomTransform};

use crate::format::format_amount;
use crate::path::geometry_path;
use crate::svg::escape;
use crate::symbology::{ChoroplethScale, Rgb};

pub const COUNTRY_STROKE: &str = "#666";
pub const COUNTRY_STROKE_WIDTH: f64 = 0.5;
pub const SELECTED_STROKE: &str = "#000";
pub const SELECTED_STROKE_WIDTH: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub code: String,
    pub name: String,
    /// SVG path data in unzoomed screen space.
    pub path: String,
    pub total: Option<f64>,
    pub fill: Rgb,
    pub selected: bool,
}

/// Keyed style change for an already drawn shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillUpdate {
    pub code: String,
    pub fill: String,
    pub selected: bool,
}

/// Everything needed to draw the map for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFrame {
    pub width: f64,
    pub height: f64,
    pub year: i32,
    pub scale: ChoroplethScale,
    pub shapes: Vec<CountryShape>,
}

/// Builds the map frame: one shape per feature, filled from `index`.
pub fn build_map_frame(
    features: &[BoundaryFeature],
    index: &YearIndex,
    projection: &NaturalEarth,
    viewport: &Viewport,
    year: i32,
    selected: Option<&str>,
) -> MapFrame {
    let scale = ChoroplethScale::new(index.max_total());
    let shapes = features
        .iter()
        .map(|feature| {
            let total = index.total(&feature.code);
            CountryShape {
                code: feature.code.clone(),
                name: feature.name.clone(),
                path: geometry_path(&feature.geometry, projection),
                total,
                fill: scale.color(total),
                selected: !feature.code.is_empty() && selected == Some(feature.code.as_str()),
            }
        })
        .collect();

    MapFrame {
        width: viewport.width,
        height: viewport.height,
        year,
        scale,
        shapes,
    }
}

/// Fill changes for a year switch that keeps the geometry.
pub fn fill_updates(
    features: &[BoundaryFeature],
    index: &YearIndex,
    selected: Option<&str>,
) -> Vec<FillUpdate> {
    let scale = ChoroplethScale::new(index.max_total());
    features
        .iter()
        .filter(|f| !f.code.is_empty())
        .map(|f| FillUpdate {
            code: f.code.clone(),
            fill: scale.color(index.total(&f.code)).to_hex(),
            selected: selected == Some(f.code.as_str()),
        })
        .collect()
}

impl MapFrame {
    pub fn max_value(&self) -> f64 {
        self.scale.max_value()
    }

    pub fn shape(&self, code: &str) -> Option<&CountryShape> {
        self.shapes.iter().find(|s| s.code == code)
    }

    /// `<g class="countries">` holding every shape, under `zoom`.
    pub fn countries_group(&self, zoom: &ZoomTransform, config: &ViewConfig) -> String {
        let mut out = String::new();
        let _ = write!(out, r#"<g class="countries" transform="{}">"#, zoom.to_svg());
        for (i, shape) in self.shapes.iter().enumerate() {
            let (stroke, stroke_width) = if shape.selected {
                (SELECTED_STROKE, SELECTED_STROKE_WIDTH)
            } else {
                (COUNTRY_STROKE, COUNTRY_STROKE_WIDTH)
            };
            let class = if shape.selected { "country selected" } else { "country" };
            let _ = write!(
                out,
                r#"<path class="{class}" data-code="{code}" data-index="{i}" d="{d}" fill="{fill}" stroke="{stroke}" stroke-width="{stroke_width}" vector-effect="non-scaling-stroke" style="transition: fill {ms}ms"><title>{title}</title></path>"#,
                code = escape(&shape.code),
                d = shape.path,
                fill = shape.fill.to_hex(),
                ms = config.fill_transition_ms,
                title = escape(&format!(
                    "{}: {}",
                    shape.name,
                    format_amount(shape.total, "Mt")
                )),
            );
        }
        out.push_str("</g>");
        out
    }

    /// Standalone `<svg>` document; `overlay` is appended after the shapes.
    pub fn to_svg(&self, zoom: &ZoomTransform, config: &ViewConfig, overlay: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="map" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{countries}{overlay}</svg>"#,
            w = self.width,
            h = self.height,
            countries = self.countries_group(zoom, config),
        )
    }
}
