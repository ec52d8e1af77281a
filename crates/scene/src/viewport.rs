use foundation::math::NaturalEarth;
use formats::BoundaryCollection;

use crate::config::ViewConfig;

/// Visible drawing surface in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(config.viewport_width, config.viewport_height)
    }

    /// Width left for the map once the detail panel is reserved.
    pub fn map_width(&self, config: &ViewConfig) -> f64 {
        (self.width - config.panel_width(self.width)).max(1.0)
    }

    /// Projection fitted to the map area for the given boundaries.
    pub fn projection(&self, boundaries: &BoundaryCollection, config: &ViewConfig) -> NaturalEarth {
        NaturalEarth::fit_size(
            self.map_width(config),
            self.height,
            boundaries.lon_lat_points(),
        )
    }
}
