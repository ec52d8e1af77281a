//! Browser-independent half of the viewer: owns the loaded data, the view
//! state and the running zoom animation, and turns input events into DOM
//! work for the shell to apply.

use compute::{EmissionsStore, YearIndex};
use foundation::math::{NaturalEarth, Vec2};
use formats::{Dataset, LoadError};
use layers::{
    ChoroplethScale, FillUpdate, Legend, Tooltip, build_detail, build_map_frame,
    country_tooltip, fill_updates, slice_tooltip,
};
use scene::{
    Effects, ViewConfig, ViewEvent, ViewState, Viewport, ZoomCommand, ZoomTransform,
    ZoomTransition, focus_on_feature, reduce,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DetailsUpdate {
    Unchanged,
    Show(String),
    Hide,
}

/// DOM work for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    /// Full map markup (shapes plus legend); replaces the map content.
    pub map_svg: Option<String>,
    /// In-place fill changes keyed by country code.
    pub fills: Vec<FillUpdate>,
    /// Legend contents, when the year's maximum may have changed.
    pub legend_body: Option<String>,
    pub legend_transform: Option<String>,
    pub details: DetailsUpdate,
    pub year: Option<i32>,
    /// Transform to apply now; `None` leaves the current one.
    pub zoom: Option<ZoomTransform>,
    /// A zoom animation was started; the shell should keep ticking.
    pub animating: bool,
}

impl Default for RenderPlan {
    fn default() -> Self {
        Self {
            map_svg: None,
            fills: Vec::new(),
            legend_body: None,
            legend_transform: None,
            details: DetailsUpdate::Unchanged,
            year: None,
            zoom: None,
            animating: false,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    store: EmissionsStore,
    config: ViewConfig,
    state: ViewState,
    index: YearIndex,
    projection: NaturalEarth,
    displayed: ZoomTransform,
    transition: Option<ZoomTransition>,
}

impl Session {
    /// Fails with `LoadError::Empty` when the table yields no year to show.
    pub fn new(dataset: Dataset, config: ViewConfig, viewport: Viewport) -> Result<Self, LoadError> {
        let store = EmissionsStore::new(dataset);
        let state = ViewState::initial(store.years(), viewport).ok_or(LoadError::Empty)?;
        let index = store.index_for_year(state.active_year);
        let projection = viewport.projection(store.boundaries(), &config);
        Ok(Self {
            store,
            config,
            state,
            index,
            projection,
            displayed: ZoomTransform::identity(),
            transition: None,
        })
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn store(&self) -> &EmissionsStore {
        &self.store
    }

    pub fn index(&self) -> &YearIndex {
        &self.index
    }

    pub fn years(&self) -> &[i32] {
        self.store.years()
    }

    pub fn displayed_zoom(&self) -> ZoomTransform {
        self.displayed
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Everything needed for the first paint.
    pub fn initial_render(&self) -> RenderPlan {
        RenderPlan {
            map_svg: Some(self.map_svg()),
            details: DetailsUpdate::Hide,
            year: Some(self.state.active_year),
            zoom: Some(self.displayed),
            ..RenderPlan::default()
        }
    }

    pub fn handle(&mut self, event: ViewEvent, now_ms: f64) -> RenderPlan {
        // Gestures continue from what is on screen, not the animation target.
        if matches!(event, ViewEvent::Zoom { .. } | ViewEvent::Pan { .. }) && self.transition.is_some() {
            self.transition = None;
            self.state.zoom = self.displayed;
        }

        let store = &self.store;
        let config = &self.config;
        let focus = |code: &str, viewport: &Viewport| {
            let feature = store.feature(code)?;
            let projection = viewport.projection(store.boundaries(), config);
            focus_on_feature(feature, &projection, viewport, config)
        };
        let update = reduce(&self.state, &event, store.years(), config, focus);
        self.state = update.state;
        self.apply(&update.effects, now_ms)
    }

    fn apply(&mut self, effects: &Effects, now_ms: f64) -> RenderPlan {
        let mut plan = RenderPlan::default();

        if effects.rebuild_index {
            self.index.rebuild(self.store.records(), self.state.active_year);
            plan.year = Some(self.state.active_year);
        }

        if effects.rebuild_map {
            self.projection = self.state.viewport.projection(self.store.boundaries(), &self.config);
            plan.map_svg = Some(self.map_svg());
        } else if effects.restyle_map {
            plan.fills = fill_updates(
                self.store.features(),
                &self.index,
                self.state.selected.as_deref(),
            );
            if effects.rebuild_index {
                plan.legend_body = Some(self.legend().body());
            }
        }

        if effects.reposition_legend {
            plan.legend_transform = Some(Legend::transform(&self.state.viewport, &self.config));
        }

        if effects.hide_details {
            plan.details = DetailsUpdate::Hide;
        } else if effects.render_details {
            if let Some(html) = self.detail_html() {
                plan.details = DetailsUpdate::Show(html);
            }
        }

        match effects.zoom {
            Some(ZoomCommand::Animate { to, duration_ms }) => {
                let center = Vec2::new(self.state.viewport.width * 0.5, self.state.viewport.height * 0.5);
                self.transition = Some(ZoomTransition::new(self.displayed, to, now_ms, duration_ms, center));
                plan.animating = true;
            }
            Some(ZoomCommand::Jump(to)) => {
                self.transition = None;
                self.displayed = to;
                plan.zoom = Some(to);
            }
            None => {}
        }

        plan
    }

    /// Advances a running zoom animation; returns the transform to show.
    pub fn tick(&mut self, now_ms: f64) -> Option<ZoomTransform> {
        let transition = self.transition?;
        self.displayed = transition.sample(now_ms);
        if transition.is_finished(now_ms) {
            self.transition = None;
        }
        Some(self.displayed)
    }

    /// Tooltip for the drawn shape at `feature` (its `data-index`).
    pub fn hover(&self, feature: usize, pointer: Vec2) -> Option<Tooltip> {
        let feature = self.store.features().get(feature)?;
        let total = if feature.code.is_empty() {
            None
        } else {
            self.index.total(&feature.code)
        };
        Some(country_tooltip(&feature.name, total, pointer))
    }

    pub fn hover_slice(&self, label: &str, value: f64, pointer: Vec2) -> Tooltip {
        slice_tooltip(label, value, pointer)
    }

    fn legend(&self) -> Legend {
        Legend::new(ChoroplethScale::new(self.index.max_total()).max_value(), &self.config)
    }

    fn map_svg(&self) -> String {
        let frame = build_map_frame(
            self.store.features(),
            &self.index,
            &self.projection,
            &self.state.viewport,
            self.state.active_year,
            self.state.selected.as_deref(),
        );
        let legend = self.legend().to_svg_group(&self.state.viewport, &self.config);
        frame.to_svg(&self.displayed, &self.config, &legend)
    }

    fn detail_html(&self) -> Option<String> {
        let code = self.state.selected.as_deref()?;
        let panel = build_detail(
            code,
            &self.store,
            &self.index,
            self.state.active_year,
            self.config.panel_width(self.state.viewport.width),
        );
        Some(panel.to_html())
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailsUpdate, Session};
    use foundation::math::Vec2;
    use formats::load_dataset_from_strs;
    use pretty_assertions::assert_eq;
    use scene::{ViewConfig, ViewEvent, Viewport, ZoomTransform};

    const GEOJSON: &str = include_str!("../assets/map/world_sample.geojson");
    const CSV: &str = include_str!("../assets/data/co2_sample.csv");

    fn session() -> Session {
        let config = ViewConfig::default();
        let dataset = load_dataset_from_strs(GEOJSON, CSV).expect("fixtures load");
        Session::new(dataset, config, Viewport::from_config(&config)).expect("years")
    }

    fn feature_slot(s: &Session, code: &str) -> usize {
        s.store()
            .features()
            .iter()
            .position(|f| f.code == code)
            .expect("feature present")
    }

    fn click(code: &str) -> ViewEvent {
        ViewEvent::ClickCountry {
            code: code.to_string(),
        }
    }

    #[test]
    fn first_paint_shows_first_year() {
        let s = session();
        assert_eq!(s.years(), &[1990, 2000, 2010]);
        let plan = s.initial_render();
        assert_eq!(plan.year, Some(1990));
        assert_eq!(plan.details, DetailsUpdate::Hide);
        assert!(plan.map_svg.is_some_and(|svg| svg.contains(r#"data-code="FRA""#)));
    }

    #[test]
    fn selecting_france_in_2010() {
        let mut s = session();
        let plan = s.handle(ViewEvent::SetYear { slot: 2 }, 0.0);
        assert_eq!(plan.year, Some(2010));
        assert_eq!(plan.fills.len(), 4);
        assert!(plan.legend_body.is_some());
        assert_eq!(s.index().year(), Some(2010));

        let plan = s.handle(click("FRA"), 100.0);
        assert_eq!(s.state().selected.as_deref(), Some("FRA"));
        let DetailsUpdate::Show(html) = plan.details else {
            panic!("details expected");
        };
        assert!(html.contains("France CO₂ Emissions (2010)"));
        assert!(html.contains("300 Mt"));
        assert!(plan.animating);
        assert!(plan.fills.iter().any(|f| f.code == "FRA" && f.selected));
    }

    #[test]
    fn reclick_clears_selection_and_zoom() {
        let mut s = session();
        s.handle(click("FRA"), 0.0);
        assert!(!s.state().zoom.is_identity());
        let plan = s.handle(click("FRA"), 10.0);
        assert_eq!(s.state().selected, None);
        assert_eq!(s.state().zoom, ZoomTransform::identity());
        assert_eq!(plan.details, DetailsUpdate::Hide);

        // The reset animation lands on identity after 500 ms.
        assert_eq!(s.tick(600.0), Some(ZoomTransform::identity()));
        assert!(!s.is_animating());
        assert_eq!(s.tick(700.0), None);
    }

    #[test]
    fn focus_animation_converges_on_target() {
        let mut s = session();
        s.handle(click("DEU"), 1000.0);
        let target = s.state().zoom;
        let mid = s.tick(1375.0).expect("running");
        assert!(mid.k > 1.0 && mid.k < target.k);
        assert_eq!(s.tick(1750.0), Some(target));
        assert_eq!(s.displayed_zoom(), target);
    }

    #[test]
    fn year_switch_is_idempotent() {
        let mut s = session();
        let before = s.index().clone();
        s.handle(ViewEvent::SetYear { slot: 1 }, 0.0);
        s.handle(ViewEvent::SetYear { slot: 0 }, 0.0);
        assert_eq!(s.index(), &before);
    }

    #[test]
    fn resize_rebuilds_map_and_moves_legend() {
        let mut s = session();
        s.handle(click("FRA"), 0.0);
        let plan = s.handle(
            ViewEvent::Resize {
                width: 900.0,
                height: 500.0,
            },
            10.0,
        );
        assert!(plan.map_svg.is_some());
        assert_eq!(plan.legend_transform.as_deref(), Some("translate(20,420)"));
        assert!(matches!(plan.details, DetailsUpdate::Show(_)));
    }

    #[test]
    fn wheel_zoom_interrupts_animation() {
        let mut s = session();
        s.handle(click("USA"), 0.0);
        s.tick(100.0);
        let shown = s.displayed_zoom();
        let plan = s.handle(
            ViewEvent::Zoom {
                factor: 1.0,
                anchor: Vec2::new(10.0, 10.0),
            },
            120.0,
        );
        assert!(!s.is_animating());
        assert_eq!(s.state().zoom, shown);
        assert_eq!(plan.zoom, None);
    }

    #[test]
    fn hover_reads_current_year() {
        let mut s = session();
        s.handle(ViewEvent::SetYear { slot: 2 }, 0.0);
        let t = s.hover(feature_slot(&s, "FRA"), Vec2::new(0.0, 100.0)).expect("france drawn");
        assert_eq!(t.html, "<strong>France</strong><br/>CO₂ Emissions: 300 Mt");
        let t = s.hover(feature_slot(&s, "ATA"), Vec2::new(0.0, 100.0)).expect("antarctica drawn");
        assert!(t.html.contains("No data"));
        assert_eq!(s.hover(usize::MAX, Vec2::new(0.0, 0.0)), None);
        assert_eq!(s.hover_slice("Gas", 50.0, Vec2::new(0.0, 0.0)).html, "Gas: 50.0 Mt");
    }

    #[test]
    fn hovering_uncoded_shape_uses_its_own_name() {
        let geojson = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"iso_a3":"-99","name":"Somaliland"},
             "geometry":{"type":"Polygon","coordinates":[[[44,9],[48,9],[48,11],[44,11],[44,9]]]}},
            {"type":"Feature","properties":{"iso_a3":"DEU","name":"Germany"},
             "geometry":{"type":"Polygon","coordinates":[[[6,47],[15,47],[15,55],[6,55],[6,47]]]}}
        ]}"#;
        let config = ViewConfig::default();
        let dataset = load_dataset_from_strs(geojson, CSV).expect("fixtures load");
        let s = Session::new(dataset, config, Viewport::from_config(&config)).expect("years");

        let plan = s.initial_render();
        assert!(plan.map_svg.is_some_and(|svg| svg.contains(r#"data-code="" data-index="0""#)));

        let t = s.hover(0, Vec2::new(0.0, 0.0)).expect("shape drawn");
        assert_eq!(t.html, "<strong>Somaliland</strong><br/>CO₂ Emissions: No data");
    }
}
