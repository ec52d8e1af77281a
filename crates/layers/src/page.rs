//! Self-contained HTML snapshot of the whole view: map, legend and the
//! detail panel for the selected country.

use compute::{EmissionsStore, YearIndex};
use scene::{ViewConfig, ViewEvent, ViewState, Viewport, focus_on_feature, reduce};

use crate::choropleth::build_map_frame;
use crate::detail::build_detail;
use crate::legend::Legend;
use crate::svg::escape;

const STYLE: &str = include_str!("../../apps/viewer_web/assets/style.css");

/// View state for a still snapshot: `year` (first year when `None`) and an
/// optional selection, zoomed the way a click would zoom it. `None` when the
/// year has no data.
pub fn snapshot_state(
    store: &EmissionsStore,
    config: &ViewConfig,
    viewport: Viewport,
    year: Option<i32>,
    selected: Option<&str>,
) -> Option<ViewState> {
    let mut state = ViewState::initial(store.years(), viewport)?;
    if let Some(year) = year {
        let slot = store.slot_of(year)?;
        state = reduce(&state, &ViewEvent::SetYear { slot }, store.years(), config, |_, _| None).state;
    }
    if let Some(code) = selected {
        let focus = |code: &str, viewport: &Viewport| {
            let feature = store.feature(code)?;
            let projection = viewport.projection(store.boundaries(), config);
            focus_on_feature(feature, &projection, viewport, config)
        };
        let event = ViewEvent::ClickCountry {
            code: code.to_string(),
        };
        state = reduce(&state, &event, store.years(), config, focus).state;
    }
    Some(state)
}

/// Map `<svg>` with the legend overlaid, for `state`.
pub fn render_map_svg(
    store: &EmissionsStore,
    index: &YearIndex,
    state: &ViewState,
    config: &ViewConfig,
) -> String {
    let projection = state.viewport.projection(store.boundaries(), config);
    let frame = build_map_frame(
        store.features(),
        index,
        &projection,
        &state.viewport,
        state.active_year,
        state.selected.as_deref(),
    );
    let legend = Legend::new(frame.max_value(), config);
    frame.to_svg(
        &state.zoom,
        config,
        &legend.to_svg_group(&state.viewport, config),
    )
}

/// Detail panel markup, or `None` without a selection.
pub fn render_detail_html(
    store: &EmissionsStore,
    index: &YearIndex,
    state: &ViewState,
    config: &ViewConfig,
) -> Option<String> {
    let code = state.selected.as_deref()?;
    let panel = build_detail(
        code,
        store,
        index,
        state.active_year,
        config.panel_width(state.viewport.width),
    );
    Some(panel.to_html())
}

pub fn render_page(
    store: &EmissionsStore,
    index: &YearIndex,
    state: &ViewState,
    config: &ViewConfig,
) -> String {
    let map = render_map_svg(store, index, state, config);
    let (details_class, details) = match render_detail_html(store, index, state, config) {
        Some(html) => ("details-panel", html),
        None => ("details-panel hidden", String::new()),
    };
    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>{title}</title><style>{STYLE}</style></head><body><div id="controls"><label>Year: <span id="year-label">{year}</span></label></div><div id="map-container">{map}</div><div id="details-panel" class="{details_class}" style="width: {panel}px"><div id="country-details">{details}</div></div></body></html>"#,
        title = escape(&format!("CO₂ Emissions {}", state.active_year)),
        year = state.active_year,
        panel = config.panel_width(state.viewport.width),
    )
}
