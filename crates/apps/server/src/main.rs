use std::env;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use compute::EmissionsStore;
use formats::load_dataset_from_paths;
use layers::{build_detail, render_map_svg, render_page, snapshot_state};
use scene::{ViewConfig, ViewState, Viewport};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct AppState {
    assets_root: PathBuf,
    store: Arc<EmissionsStore>,
    config: ViewConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ViewQuery {
    year: Option<i32>,
    selected: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let assets_root = PathBuf::from(
        env::var("CO2_ASSETS_ROOT").unwrap_or_else(|_| "crates/apps/viewer_web/assets".to_string()),
    );
    let boundaries = env::var("CO2_BOUNDARIES")
        .map(PathBuf::from)
        .unwrap_or_else(|_| assets_root.join("map/world_sample.geojson"));
    let emissions = env::var("CO2_EMISSIONS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| assets_root.join("data/co2_sample.csv"));
    let addr: SocketAddr = env::var("CO2_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9200".to_string())
        .parse()?;

    let dataset = load_dataset_from_paths(&boundaries, &emissions).map_err(|err| {
        error!("refusing to start: {err}");
        err
    })?;
    let store = EmissionsStore::new(dataset);
    info!(
        "serving {} countries over {} years",
        store.features().len(),
        store.years().len()
    );

    let state = AppState {
        assets_root,
        store: Arc::new(store),
        config: ViewConfig::from_env(),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/years", get(get_years))
        .route("/api/map.svg", get(get_map))
        .route("/api/country/:code", get(get_country))
        .route("/api/country/:code/details.html", get(get_details))
        .route("/snapshot.html", get(get_snapshot))
        .route("/", get(get_index))
        .route("/*path", get(get_asset))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("emissions map listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_years(State(state): State<AppState>) -> Response {
    Json(state.store.years().to_vec()).into_response()
}

fn viewport_for(query: &ViewQuery, config: &ViewConfig) -> Viewport {
    Viewport::new(
        query.width.unwrap_or(config.viewport_width),
        query.height.unwrap_or(config.viewport_height),
    )
}

fn view_state(state: &AppState, query: &ViewQuery) -> Result<ViewState, Response> {
    snapshot_state(
        &state.store,
        &state.config,
        viewport_for(query, &state.config),
        query.year,
        query.selected.as_deref(),
    )
    .ok_or_else(|| {
        warn!("no data for requested year {:?}", query.year);
        (StatusCode::NOT_FOUND, "unknown year").into_response()
    })
}

async fn get_map(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Response {
    let view = match view_state(&state, &query) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let index = state.store.index_for_year(view.active_year);
    let svg = render_map_svg(&state.store, &index, &view, &state.config);
    with_content_type(svg, "image/svg+xml")
}

async fn get_snapshot(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Response {
    let view = match view_state(&state, &query) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let index = state.store.index_for_year(view.active_year);
    let html = render_page(&state.store, &index, &view, &state.config);
    with_content_type(html, "text/html; charset=utf-8")
}

async fn get_country(State(state): State<AppState>, AxumPath(code): AxumPath<String>) -> Response {
    let report = state.store.report(&code);
    if report.series.is_empty() && !report.has_boundary {
        return (StatusCode::NOT_FOUND, "unknown country").into_response();
    }
    Json(report).into_response()
}

async fn get_details(
    State(state): State<AppState>,
    AxumPath(code): AxumPath<String>,
    Query(query): Query<ViewQuery>,
) -> Response {
    let view = match view_state(&state, &ViewQuery { selected: None, ..query }) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let index = state.store.index_for_year(view.active_year);
    let width = state.config.panel_width(view.viewport.width);
    let panel = build_detail(&code, &state.store, &index, view.active_year, width);
    with_content_type(panel.to_html(), "text/html; charset=utf-8")
}

async fn get_index(State(state): State<AppState>) -> Response {
    serve_file(&state.assets_root.join("index.html")).await
}

async fn get_asset(State(state): State<AppState>, AxumPath(path): AxumPath<String>) -> Response {
    let rel = Path::new(&path);
    if rel.components().any(|c| !matches!(c, Component::Normal(_))) {
        return (StatusCode::BAD_REQUEST, "bad path").into_response();
    }
    serve_file(&state.assets_root.join(rel)).await
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("wasm") => "application/wasm",
        Some("json") | Some("geojson") => "application/json",
        Some("csv") => "text/csv",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn with_content_type(body: String, content_type: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    (StatusCode::OK, headers, body).into_response()
}

async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(data) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static(content_type_for(path)),
            );
            (StatusCode::OK, headers, Body::from(data)).into_response()
        }
        Err(err) => {
            error!("file read failed: {path:?} -> {err}");
            (StatusCode::NOT_FOUND, "not found").into_response()
        }
    }
}
