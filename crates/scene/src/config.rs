use std::env;

/// Layout and animation constants shared by every front end.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Detail panel width is `min(width * fraction, max)`.
    pub panel_width_fraction: f64,
    pub panel_max_width: f64,
    /// Scale extent for user pan/zoom gestures.
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Share of the constraining viewport dimension a focused country fills.
    pub focus_fill: f64,
    pub fill_transition_ms: u32,
    pub focus_transition_ms: u32,
    pub close_transition_ms: u32,
    pub reset_transition_ms: u32,
    pub legend_width: f64,
    pub legend_height: f64,
    /// Gap between the legend and the bottom-left viewport corner.
    pub legend_margin: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            panel_width_fraction: 0.4,
            panel_max_width: 500.0,
            min_zoom: 1.0,
            max_zoom: 8.0,
            focus_fill: 0.9,
            fill_transition_ms: 600,
            focus_transition_ms: 750,
            close_transition_ms: 750,
            reset_transition_ms: 500,
            legend_width: 150.0,
            legend_height: 60.0,
            legend_margin: 20.0,
        }
    }
}

impl ViewConfig {
    /// Defaults overridden by `CO2_VIEWPORT_WIDTH` / `CO2_VIEWPORT_HEIGHT`.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            viewport_width: env_var_f64("CO2_VIEWPORT_WIDTH", d.viewport_width),
            viewport_height: env_var_f64("CO2_VIEWPORT_HEIGHT", d.viewport_height),
            ..d
        }
    }

    pub fn panel_width(&self, viewport_width: f64) -> f64 {
        (viewport_width * self.panel_width_fraction).min(self.panel_max_width)
    }
}

pub fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}
