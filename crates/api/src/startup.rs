use std::sync::Arc;

use anyhow::{anyhow, bail};
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use climate_api_core::is_directory;
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    db::{load_snapshot, ClimateData},
    index_handler, precipitation, routes, stations, stats_from, stats_range, tobs, QueryService,
    Station, TemperatureObservation, TemperatureStats,
};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub queries: QueryService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::precipitation,
        routes::climate::stations,
        routes::climate::tobs,
        routes::climate::stats_from,
        routes::climate::stats_range,
    ),
    components(
        schemas(
            Station,
            TemperatureObservation,
            TemperatureStats,
        )
    ),
    tags(
        (name = "climate query api", description = "read-only aggregate queries over a historical weather-measurement snapshot")
    )
)]
struct ApiDoc;

/// Load the snapshot and assemble the shared state. The snapshot is read
/// exactly once here; every request afterwards is served from memory.
pub fn build_app_state(remote_url: String, data_dir: String) -> Result<AppState, anyhow::Error> {
    if !is_directory(&data_dir) {
        bail!("data directory does not exist: {}", data_dir);
    }

    let snapshot =
        load_snapshot(&data_dir).map_err(|e| anyhow!("error loading climate snapshot: {}", e))?;
    let store: Arc<dyn ClimateData> = Arc::new(snapshot);

    Ok(AppState {
        remote_url,
        queries: QueryService::new(store),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/start/{start}", get(stats_from))
        .route("/api/v1.0/start_end/{start}/{end}", get(stats_range))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
