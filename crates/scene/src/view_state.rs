//! View state and its transitions.
//!
//! `reduce` is pure: it takes the current state and one input event and
//! returns the next state plus a description of what has to be redrawn.
//! Front ends apply the effects to their rendering surface.

use foundation::math::Vec2;

use crate::config::ViewConfig;
use crate::viewport::Viewport;
use crate::zoom::ZoomTransform;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Slider position into the sorted distinct years.
    pub year_slot: usize,
    pub active_year: i32,
    pub selected: Option<String>,
    /// Target zoom transform; a running animation converges on it.
    pub zoom: ZoomTransform,
    pub viewport: Viewport,
}

impl ViewState {
    /// First year, nothing selected, identity zoom. `None` without years.
    pub fn initial(years: &[i32], viewport: Viewport) -> Option<Self> {
        let active_year = *years.first()?;
        Some(Self {
            year_slot: 0,
            active_year,
            selected: None,
            zoom: ZoomTransform::identity(),
            viewport,
        })
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.as_deref() == Some(code)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Year slider moved to `slot`.
    SetYear { slot: usize },
    ClickCountry { code: String },
    CloseDetails,
    Resize { width: f64, height: f64 },
    /// Wheel zoom around a screen-space anchor.
    Zoom { factor: f64, anchor: Vec2 },
    /// Drag pan in screen pixels.
    Pan { dx: f64, dy: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ZoomCommand {
    Animate { to: ZoomTransform, duration_ms: u32 },
    Jump(ZoomTransform),
}

/// What a front end must do after a state change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    /// The year changed; the year index must be rebuilt.
    pub rebuild_index: bool,
    /// Country fills (and selection highlight) must be refreshed.
    pub restyle_map: bool,
    /// The projection changed; country geometry must be rebuilt.
    pub rebuild_map: bool,
    pub render_details: bool,
    pub hide_details: bool,
    pub reposition_legend: bool,
    pub zoom: Option<ZoomCommand>,
}

impl Effects {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub state: ViewState,
    pub effects: Effects,
}

/// Computes the next state.
///
/// `focus` resolves the pan/zoom-to-bounds transform of a country for the
/// given viewport; it returns `None` when the country has no shape.
pub fn reduce<F>(
    state: &ViewState,
    event: &ViewEvent,
    years: &[i32],
    config: &ViewConfig,
    focus: F,
) -> ViewUpdate
where
    F: FnOnce(&str, &Viewport) -> Option<ZoomTransform>,
{
    let mut next = state.clone();
    let mut effects = Effects::default();

    match event {
        ViewEvent::SetYear { slot } => {
            if let Some(&year) = years.get(*slot) {
                next.year_slot = *slot;
                next.active_year = year;
                effects.rebuild_index = true;
                effects.restyle_map = true;
                effects.render_details = next.selected.is_some();
            }
        }
        // Shapes without a country code are not selectable.
        ViewEvent::ClickCountry { code } if code.is_empty() => {}
        ViewEvent::ClickCountry { code } if state.is_selected(code) => {
            next.selected = None;
            next.zoom = ZoomTransform::identity();
            effects.restyle_map = true;
            effects.hide_details = true;
            effects.zoom = Some(ZoomCommand::Animate {
                to: next.zoom,
                duration_ms: config.reset_transition_ms,
            });
        }
        ViewEvent::ClickCountry { code } => {
            next.selected = Some(code.clone());
            effects.restyle_map = true;
            effects.render_details = true;
            if let Some(to) = focus(code, &state.viewport) {
                next.zoom = to;
                effects.zoom = Some(ZoomCommand::Animate {
                    to,
                    duration_ms: config.focus_transition_ms,
                });
            }
        }
        ViewEvent::CloseDetails => {
            next.selected = None;
            next.zoom = ZoomTransform::identity();
            effects.restyle_map = state.selected.is_some();
            effects.hide_details = true;
            effects.zoom = Some(ZoomCommand::Animate {
                to: next.zoom,
                duration_ms: config.close_transition_ms,
            });
        }
        ViewEvent::Resize { width, height } => {
            next.viewport = Viewport::new(*width, *height);
            effects.rebuild_map = true;
            effects.render_details = next.selected.is_some();
            effects.reposition_legend = true;
        }
        ViewEvent::Zoom { factor, anchor } => {
            next.zoom = state
                .zoom
                .scale_by(*factor, *anchor, config.min_zoom, config.max_zoom);
            if next.zoom != state.zoom {
                effects.zoom = Some(ZoomCommand::Jump(next.zoom));
            }
        }
        ViewEvent::Pan { dx, dy } => {
            next.zoom = state.zoom.translate_by(*dx, *dy);
            effects.zoom = Some(ZoomCommand::Jump(next.zoom));
        }
    }

    ViewUpdate {
        state: next,
        effects,
    }
}

#[cfg(test)]
mod tests {
    use super::{Effects, ViewEvent, ViewState, ZoomCommand, reduce};
    use crate::config::ViewConfig;
    use crate::viewport::Viewport;
    use crate::zoom::ZoomTransform;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;

    const YEARS: [i32; 3] = [1990, 2000, 2010];

    fn focus_fra(code: &str, _: &Viewport) -> Option<ZoomTransform> {
        (code == "FRA").then(|| ZoomTransform::new(6.0, -1200.0, -500.0))
    }

    fn initial() -> ViewState {
        ViewState::initial(&YEARS, Viewport::new(1280.0, 720.0)).expect("years")
    }

    fn step(state: &ViewState, event: ViewEvent) -> (ViewState, Effects) {
        let u = reduce(state, &event, &YEARS, &ViewConfig::default(), focus_fra);
        (u.state, u.effects)
    }

    #[test]
    fn starts_at_first_year_without_selection() {
        let s = initial();
        assert_eq!(s.active_year, 1990);
        assert_eq!(s.selected, None);
        assert!(s.zoom.is_identity());
        assert!(ViewState::initial(&[], Viewport::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn year_change_keeps_zoom_and_refreshes_details() {
        let (s, _) = step(&initial(), ViewEvent::ClickCountry { code: "FRA".into() });
        let (s2, fx) = step(&s, ViewEvent::SetYear { slot: 2 });
        assert_eq!(s2.active_year, 2010);
        assert_eq!(s2.zoom, s.zoom);
        assert!(fx.rebuild_index && fx.restyle_map && fx.render_details);
        assert_eq!(fx.zoom, None);
    }

    #[test]
    fn out_of_range_year_slot_is_ignored() {
        let s = initial();
        let (s2, fx) = step(&s, ViewEvent::SetYear { slot: 7 });
        assert_eq!(s2, s);
        assert!(fx.is_noop());
    }

    #[test]
    fn click_selects_and_focuses() {
        let (s, fx) = step(&initial(), ViewEvent::ClickCountry { code: "FRA".into() });
        assert_eq!(s.selected.as_deref(), Some("FRA"));
        assert!(fx.render_details);
        assert_eq!(
            fx.zoom,
            Some(ZoomCommand::Animate {
                to: ZoomTransform::new(6.0, -1200.0, -500.0),
                duration_ms: 750
            })
        );
    }

    #[test]
    fn clicking_selected_country_again_resets() {
        let (s, _) = step(&initial(), ViewEvent::ClickCountry { code: "FRA".into() });
        let (s2, fx) = step(&s, ViewEvent::ClickCountry { code: "FRA".into() });
        assert_eq!(s2.selected, None);
        assert!(s2.zoom.is_identity());
        assert!(fx.hide_details);
        assert_eq!(
            fx.zoom,
            Some(ZoomCommand::Animate {
                to: ZoomTransform::identity(),
                duration_ms: 500
            })
        );
    }

    #[test]
    fn selecting_shape_less_country_skips_zoom() {
        let (s, fx) = step(&initial(), ViewEvent::ClickCountry { code: "ATA".into() });
        assert_eq!(s.selected.as_deref(), Some("ATA"));
        assert!(fx.render_details);
        assert_eq!(fx.zoom, None);
    }

    #[test]
    fn close_clears_selection() {
        let (s, _) = step(&initial(), ViewEvent::ClickCountry { code: "FRA".into() });
        let (s2, fx) = step(&s, ViewEvent::CloseDetails);
        assert_eq!(s2.selected, None);
        assert!(s2.zoom.is_identity());
        assert!(fx.hide_details);
        assert!(matches!(
            fx.zoom,
            Some(ZoomCommand::Animate { duration_ms: 750, .. })
        ));
    }

    #[test]
    fn resize_rebuilds_map_and_moves_legend() {
        let (s, fx) = step(&initial(), ViewEvent::Resize { width: 800.0, height: 500.0 });
        assert_eq!(s.viewport, Viewport::new(800.0, 500.0));
        assert!(fx.rebuild_map && fx.reposition_legend);
        assert!(!fx.render_details);
    }

    #[test]
    fn wheel_zoom_respects_scale_extent() {
        let s = initial();
        let anchor = Vec2::new(100.0, 100.0);
        let (s2, fx) = step(&s, ViewEvent::Zoom { factor: 0.5, anchor });
        assert!(s2.zoom.is_identity());
        assert!(fx.is_noop());
        let (s3, _) = step(&s, ViewEvent::Zoom { factor: 20.0, anchor });
        assert_eq!(s3.zoom.k, 8.0);
    }

    #[test]
    fn empty_code_click_is_ignored() {
        let s = initial();
        let (s2, fx) = step(&s, ViewEvent::ClickCountry { code: String::new() });
        assert_eq!(s2, s);
        assert!(fx.is_noop());
    }
}
