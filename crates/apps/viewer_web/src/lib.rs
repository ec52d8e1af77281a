use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element};

use foundation::math::Vec2;
use formats::{LoadError, load_dataset_from_strs};
use layers::{COUNTRY_STROKE, COUNTRY_STROKE_WIDTH, SELECTED_STROKE, SELECTED_STROKE_WIDTH, Tooltip};
use scene::{ViewConfig, ViewEvent, Viewport};

pub mod session;
use session::{DetailsUpdate, RenderPlan, Session};

thread_local! {
    static STATE: RefCell<Option<Session>> = const { RefCell::new(None) };
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn element(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

fn set_hidden(el: &Element, hidden: bool) -> Result<(), JsValue> {
    if hidden {
        el.class_list().add_1("hidden")
    } else {
        el.class_list().remove_1("hidden")
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Fetches both datasets, then draws the first year. A failure is shown in
/// `#load-error` with a reload button.
#[wasm_bindgen]
pub fn load_datasets(boundaries_url: String, emissions_url: String, width: f64, height: f64) {
    spawn_local(async move {
        let result = fetch_dataset(&boundaries_url, &emissions_url).await.and_then(|dataset| {
            let config = ViewConfig::default();
            Session::new(dataset, config, Viewport::new(width, height))
        });

        match result {
            Ok(session) => {
                let plan = session.initial_render();
                let years = session.years().len();
                STATE.with(|state| *state.borrow_mut() = Some(session));
                log(&format!("loaded emissions covering {years} years"));
                if let Err(err) = set_slider_range(years).and_then(|()| apply_plan(&plan)) {
                    web_sys::console::error_1(&err);
                }
            }
            Err(err) => {
                web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
                if let Err(err) = show_load_error(&err) {
                    web_sys::console::error_1(&err);
                }
            }
        }
    });
}

#[wasm_bindgen]
pub fn set_year_index(slot: usize, now_ms: f64) -> Result<bool, JsValue> {
    dispatch(ViewEvent::SetYear { slot }, now_ms)
}

#[wasm_bindgen]
pub fn click_country(code: String, now_ms: f64) -> Result<bool, JsValue> {
    dispatch(ViewEvent::ClickCountry { code }, now_ms)
}

#[wasm_bindgen]
pub fn close_details(now_ms: f64) -> Result<bool, JsValue> {
    dispatch(ViewEvent::CloseDetails, now_ms)
}

#[wasm_bindgen]
pub fn resize(width: f64, height: f64, now_ms: f64) -> Result<bool, JsValue> {
    dispatch(ViewEvent::Resize { width, height }, now_ms)
}

/// Wheel zoom around the pointer.
#[wasm_bindgen]
pub fn zoom_by(factor: f64, anchor_x: f64, anchor_y: f64, now_ms: f64) -> Result<bool, JsValue> {
    dispatch(
        ViewEvent::Zoom {
            factor,
            anchor: Vec2::new(anchor_x, anchor_y),
        },
        now_ms,
    )
}

#[wasm_bindgen]
pub fn pan_by(dx: f64, dy: f64, now_ms: f64) -> Result<bool, JsValue> {
    dispatch(ViewEvent::Pan { dx, dy }, now_ms)
}

/// Advances the zoom animation. Returns whether another frame is needed.
#[wasm_bindgen]
pub fn tick(now_ms: f64) -> Result<bool, JsValue> {
    let (zoom, animating) = STATE.with(|state| {
        let mut state = state.borrow_mut();
        match state.as_mut() {
            Some(s) => (s.tick(now_ms), s.is_animating()),
            None => (None, false),
        }
    });
    if let Some(zoom) = zoom {
        apply_plan(&RenderPlan {
            zoom: Some(zoom),
            ..RenderPlan::default()
        })?;
    }
    Ok(animating)
}

#[wasm_bindgen]
pub fn hover_country(feature: usize, page_x: f64, page_y: f64) -> Result<(), JsValue> {
    let tooltip = STATE.with(|state| {
        state
            .borrow()
            .as_ref()
            .and_then(|s| s.hover(feature, Vec2::new(page_x, page_y)))
    });
    match tooltip {
        Some(t) => show_tooltip("tooltip", &t),
        None => Ok(()),
    }
}

#[wasm_bindgen]
pub fn hover_out() -> Result<(), JsValue> {
    hide_tooltip("tooltip")
}

/// Pie slice hover; coordinates are relative to the pie container.
#[wasm_bindgen]
pub fn hover_slice(label: String, value: f64, x: f64, y: f64) -> Result<(), JsValue> {
    let tooltip = STATE.with(|state| {
        state
            .borrow()
            .as_ref()
            .map(|s| s.hover_slice(&label, value, Vec2::new(x, y)))
    });
    match tooltip {
        Some(t) => show_tooltip_in(".pie-tooltip", &t),
        None => Ok(()),
    }
}

#[wasm_bindgen]
pub fn hover_slice_out() -> Result<(), JsValue> {
    let doc = document()?;
    if let Some(el) = doc.query_selector(".pie-tooltip")? {
        el.set_attribute("style", "opacity: 0")?;
    }
    Ok(())
}

fn dispatch(event: ViewEvent, now_ms: f64) -> Result<bool, JsValue> {
    let plan = STATE.with(|state| {
        state
            .borrow_mut()
            .as_mut()
            .map(|s| s.handle(event, now_ms))
    });
    match plan {
        Some(plan) => {
            apply_plan(&plan)?;
            Ok(plan.animating)
        }
        None => Ok(false),
    }
}

fn apply_plan(plan: &RenderPlan) -> Result<(), JsValue> {
    let doc = document()?;

    if let Some(svg) = &plan.map_svg {
        element(&doc, "map-container")?.set_inner_html(svg);
    }

    for fill in &plan.fills {
        let selector = format!(r#"path[data-code="{}"]"#, fill.code);
        let Some(path) = doc.query_selector(&selector)? else {
            continue;
        };
        path.set_attribute("fill", &fill.fill)?;
        if fill.selected {
            path.set_attribute("class", "country selected")?;
            path.set_attribute("stroke", SELECTED_STROKE)?;
            path.set_attribute("stroke-width", &SELECTED_STROKE_WIDTH.to_string())?;
        } else {
            path.set_attribute("class", "country")?;
            path.set_attribute("stroke", COUNTRY_STROKE)?;
            path.set_attribute("stroke-width", &COUNTRY_STROKE_WIDTH.to_string())?;
        }
    }

    if let Some(body) = &plan.legend_body {
        if let Some(legend) = doc.query_selector("#map-container .legend")? {
            legend.set_inner_html(body);
        }
    }
    if let Some(transform) = &plan.legend_transform {
        if let Some(legend) = doc.query_selector("#map-container .legend")? {
            legend.set_attribute("transform", transform)?;
        }
    }

    match &plan.details {
        DetailsUpdate::Unchanged => {}
        DetailsUpdate::Show(html) => {
            element(&doc, "country-details")?.set_inner_html(html);
            set_hidden(&element(&doc, "details-panel")?, false)?;
        }
        DetailsUpdate::Hide => {
            set_hidden(&element(&doc, "details-panel")?, true)?;
        }
    }

    if let Some(year) = plan.year {
        element(&doc, "year-label")?.set_text_content(Some(&year.to_string()));
    }

    if let Some(zoom) = &plan.zoom {
        if let Some(group) = doc.query_selector("#map-container .countries")? {
            group.set_attribute("transform", &zoom.to_svg())?;
        }
    }

    Ok(())
}

fn show_tooltip(id: &str, tooltip: &Tooltip) -> Result<(), JsValue> {
    let doc = document()?;
    place_tooltip(&element(&doc, id)?, tooltip)
}

fn show_tooltip_in(selector: &str, tooltip: &Tooltip) -> Result<(), JsValue> {
    let doc = document()?;
    match doc.query_selector(selector)? {
        Some(el) => place_tooltip(&el, tooltip),
        None => Ok(()),
    }
}

fn place_tooltip(el: &Element, tooltip: &Tooltip) -> Result<(), JsValue> {
    el.set_inner_html(&tooltip.html);
    el.set_attribute(
        "style",
        &format!("opacity: 1; left: {}px; top: {}px", tooltip.left, tooltip.top),
    )
}

fn hide_tooltip(id: &str) -> Result<(), JsValue> {
    let doc = document()?;
    element(&doc, id)?.set_attribute("style", "opacity: 0")
}

/// The slider ranges over year slots `0..years`.
fn set_slider_range(years: usize) -> Result<(), JsValue> {
    let doc = document()?;
    let slider = element(&doc, "year-slider")?;
    slider.set_attribute("max", &years.saturating_sub(1).to_string())?;
    slider.set_attribute("value", "0")
}

fn show_load_error(err: &LoadError) -> Result<(), JsValue> {
    let doc = document()?;
    let banner = element(&doc, "load-error")?;
    let message = layers::svg::escape(&err.to_string());
    banner.set_inner_html(&format!(
        r#"<p>Could not load the emissions map: {message}</p><button type="button" onclick="window.location.reload()">Reload</button>"#
    ));
    set_hidden(&banner, false)
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let fetch_error = |reason: String| LoadError::Fetch {
        url: url.to_string(),
        reason,
    };
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;
    if !resp.ok() {
        return Err(fetch_error(format!("HTTP {}", resp.status())));
    }
    resp.text().await.map_err(|e| fetch_error(e.to_string()))
}

/// Both requests must succeed before anything is drawn.
async fn fetch_dataset(boundaries_url: &str, emissions_url: &str) -> Result<formats::Dataset, LoadError> {
    let (geojson, csv) = futures_util::join!(fetch_text(boundaries_url), fetch_text(emissions_url));
    load_dataset_from_strs(&geojson?, &csv?)
}
