//! SVG axes in the shape d3's axis generators produce.

use std::fmt::Write;

use foundation::math::LinearScale;

const TICK_SIZE: f64 = 6.0;
const TICK_COUNT: usize = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

#[derive(Debug, Clone)]
pub struct Axis {
    pub orient: AxisOrient,
    pub class: &'static str,
    pub scale: LinearScale,
    /// Translation of the axis line perpendicular to its orientation.
    pub offset: f64,
    /// Tick labels are rotated -45° and anchored at their end.
    pub rotate_labels: bool,
    pub format: fn(f64) -> String,
}

impl Axis {
    pub fn ticks(&self) -> Vec<(f64, String)> {
        self.scale
            .ticks(TICK_COUNT)
            .into_iter()
            .map(|v| (self.scale.apply(v), (self.format)(v)))
            .collect()
    }

    pub fn to_svg(&self) -> String {
        let [r0, r1] = self.scale.range();
        let mut out = String::new();
        match self.orient {
            AxisOrient::Bottom => {
                let _ = write!(
                    out,
                    r##"<g class="{}" transform="translate(0,{:.2})" fill="none" font-size="10" font-family="sans-serif" text-anchor="middle"><path class="domain" stroke="#000" d="M{r0:.2},{TICK_SIZE}V0H{r1:.2}V{TICK_SIZE}"/>"##,
                    self.class, self.offset,
                );
            }
            AxisOrient::Left => {
                let _ = write!(
                    out,
                    r##"<g class="{}" transform="translate({:.2},0)" fill="none" font-size="10" font-family="sans-serif" text-anchor="end"><path class="domain" stroke="#000" d="M-{TICK_SIZE},{r0:.2}H0V{r1:.2}H-{TICK_SIZE}"/>"##,
                    self.class, self.offset,
                );
            }
        }

        for (pos, label) in self.ticks() {
            match self.orient {
                AxisOrient::Bottom => {
                    let text_attrs = if self.rotate_labels {
                        r#"y="9" dx="-.8em" dy=".15em" transform="rotate(-45)" style="text-anchor: end""#
                    } else {
                        r#"y="9" dy="0.71em""#
                    };
                    let _ = write!(
                        out,
                        r##"<g class="tick" transform="translate({pos:.2},0)"><line stroke="#000" y2="{TICK_SIZE}"/><text fill="#000" {text_attrs}>{label}</text></g>"##,
                    );
                }
                AxisOrient::Left => {
                    let _ = write!(
                        out,
                        r##"<g class="tick" transform="translate(0,{pos:.2})"><line stroke="#000" x2="-{TICK_SIZE}"/><text fill="#000" x="-9" dy="0.32em">{label}</text></g>"##,
                    );
                }
            }
        }
        out.push_str("</g>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisOrient};
    use crate::format::format_integer;
    use foundation::math::LinearScale;

    #[test]
    fn year_axis_uses_integer_rotated_labels() {
        let axis = Axis {
            orient: AxisOrient::Bottom,
            class: "x-axis",
            scale: LinearScale::new([1990.0, 2010.0], [50.0, 470.0]),
            offset: 210.0,
            rotate_labels: true,
            format: format_integer,
        };
        let ticks = axis.ticks();
        assert_eq!(ticks.first().map(|t| t.1.as_str()), Some("1990"));
        assert_eq!(ticks.last().map(|t| t.1.as_str()), Some("2010"));
        assert_eq!(ticks.first().map(|t| t.0), Some(50.0));

        let svg = axis.to_svg();
        assert!(svg.starts_with(r#"<g class="x-axis" transform="translate(0,210.00)""#));
        assert_eq!(svg.matches("rotate(-45)").count(), ticks.len());
    }

    #[test]
    fn left_axis_places_ticks_vertically() {
        let axis = Axis {
            orient: AxisOrient::Left,
            class: "y-axis",
            scale: LinearScale::new([0.0, 300.0], [210.0, 20.0]),
            offset: 50.0,
            rotate_labels: false,
            format: format_integer,
        };
        let svg = axis.to_svg();
        assert!(svg.contains(r#"transform="translate(0,210.00)""#));
        assert!(svg.contains(">300</text>"));
    }
}
