use foundation::math::Vec2;

use crate::format::{format_amount, format_fixed1};
use crate::svg::escape;

/// Offset from the pointer to the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: Vec2 = Vec2 { x: 10.0, y: -30.0 };

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub left: f64,
    pub top: f64,
    pub html: String,
}

impl Tooltip {
    fn at(pointer: Vec2, html: String) -> Self {
        let p = pointer + TOOLTIP_OFFSET;
        Self {
            left: p.x,
            top: p.y,
            html,
        }
    }
}

/// Map hover: country name over its formatted total.
pub fn country_tooltip(name: &str, total: Option<f64>, pointer: Vec2) -> Tooltip {
    Tooltip::at(
        pointer,
        format!(
            "<strong>{}</strong><br/>CO₂ Emissions: {}",
            escape(name),
            format_amount(total, "Mt")
        ),
    )
}

/// Pie slice hover, relative to the pie container.
pub fn slice_tooltip(label: &str, value: f64, pointer: Vec2) -> Tooltip {
    Tooltip::at(pointer, format!("{}: {} Mt", escape(label), format_fixed1(value)))
}
