use foundation::Aabb2;
use foundation::math::{NaturalEarth, Vec2};
use formats::BoundaryFeature;

use crate::config::ViewConfig;
use crate::viewport::Viewport;

/// Hand-picked lon/lat boxes `[min_lon, min_lat, max_lon, max_lat]` for
/// countries whose outline spans overseas territories or the antimeridian,
/// where the full shape would zoom out to most of the world.
pub const MAINLAND_BOUNDS: &[(&str, [f64; 4])] = &[
    ("USA", [-125.0, 24.0, -66.0, 50.0]),
    ("RUS", [20.0, 41.0, 180.0, 70.0]),
    ("FRA", [-5.0, 42.0, 15.0, 52.0]),
    ("AUS", [110.0, -45.0, 155.0, -10.0]),
    ("CAN", [-140.0, 42.0, -52.0, 70.0]),
    ("NLD", [3.0, 50.0, 8.0, 54.0]),
];

pub fn mainland_bounds(code: &str) -> Option<[f64; 4]> {
    MAINLAND_BOUNDS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, b)| *b)
}

/// Pan/zoom transform: screen = world * k + (x, y).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ZoomTransform {
    pub const fn identity() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    pub fn invert(&self, p: Vec2) -> Vec2 {
        Vec2::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Scales around `anchor` (screen space), clamped to `[min_k, max_k]`.
    pub fn scale_by(&self, factor: f64, anchor: Vec2, min_k: f64, max_k: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let k = (self.k * factor).clamp(min_k, max_k);
        let world = self.invert(anchor);
        Self::new(k, anchor.x - world.x * k, anchor.y - world.y * k)
    }

    pub fn translate_by(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.k, self.x + dx, self.y + dy)
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!("translate({:.3},{:.3}) scale({:.5})", self.x, self.y, self.k)
    }
}

/// Transform that centers `bounds` in the map area and scales it to fill
/// `config.focus_fill` of whichever dimension constrains it.
pub fn focus_transform(bounds: &Aabb2, viewport: &Viewport, config: &ViewConfig) -> Option<ZoomTransform> {
    if bounds.is_empty() {
        return None;
    }
    let map_width = viewport.map_width(config);
    let ratio = (bounds.width() / map_width).max(bounds.height() / viewport.height);
    if !ratio.is_finite() || ratio <= 0.0 {
        return None;
    }
    let k = config.focus_fill / ratio;
    let c = bounds.center();
    Some(ZoomTransform::new(
        k,
        map_width * 0.5 - k * c.x,
        viewport.height * 0.5 - k * c.y,
    ))
}

/// Screen-space box to focus on for `feature`: the curated mainland box when
/// one exists, otherwise the projected outline.
pub fn focus_bounds(feature: &BoundaryFeature, projection: &NaturalEarth) -> Aabb2 {
    if let Some([min_lon, min_lat, max_lon, max_lat]) = mainland_bounds(&feature.code) {
        return Aabb2::from_corners(
            projection.project(min_lon, min_lat),
            projection.project(max_lon, max_lat),
        );
    }

    let mut bounds = Aabb2::empty();
    for p in feature.geometry.points() {
        bounds.extend(projection.project(p.lon_deg, p.lat_deg));
    }
    bounds
}

pub fn focus_on_feature(
    feature: &BoundaryFeature,
    projection: &NaturalEarth,
    viewport: &Viewport,
    config: &ViewConfig,
) -> Option<ZoomTransform> {
    focus_transform(&focus_bounds(feature, projection), viewport, config)
}
