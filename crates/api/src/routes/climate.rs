use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;

use crate::{
    queries::Error, AppState, Station, TemperatureObservation, TemperatureStats,
};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::DateFormat(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Error::NoData | Error::Store(_) | Error::DateRender(_) => {
                error!("query failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "failed to query the climate snapshot" })),
                )
                    .into_response()
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation by date over the trailing year, null where a station reported no value"),
        (status = INTERNAL_SERVER_ERROR, description = "Snapshot is empty or unreadable")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, Error> {
    Ok(Json(state.queries.precipitation()?))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "All stations in the directory", body = Vec<Station>),
        (status = INTERNAL_SERVER_ERROR, description = "Snapshot is unreadable")
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Station>>, Error> {
    Ok(Json(state.queries.stations()?))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature readings at the most-active station over the trailing year", body = Vec<TemperatureObservation>),
        (status = INTERNAL_SERVER_ERROR, description = "Snapshot is empty or unreadable")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureObservation>>, Error> {
    Ok(Json(state.queries.temperature_observations()?))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/start/{start}",
    params(
        ("start" = String, Path, description = "Range start, YYYY-MM-DD; the range ends at the latest date in the snapshot"),
    ),
    responses(
        (status = OK, description = "One min/avg/max summary, or an empty array when nothing matches", body = Vec<TemperatureStats>),
        (status = BAD_REQUEST, description = "Malformed start date"),
        (status = INTERNAL_SERVER_ERROR, description = "Snapshot is empty or unreadable")
    ))]
pub async fn stats_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureStats>>, Error> {
    let stats = state.queries.stats_from(&start)?;
    Ok(Json(stats.into_iter().collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/start_end/{start}/{end}",
    params(
        ("start" = String, Path, description = "Range start, YYYY-MM-DD"),
        ("end" = String, Path, description = "Range end, YYYY-MM-DD, inclusive"),
    ),
    responses(
        (status = OK, description = "One min/avg/max summary, or an empty array when nothing matches", body = Vec<TemperatureStats>),
        (status = BAD_REQUEST, description = "Malformed start or end date"),
        (status = INTERNAL_SERVER_ERROR, description = "Snapshot is unreadable")
    ))]
pub async fn stats_range(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureStats>>, Error> {
    let stats = state.queries.stats_range(&start, &end)?;
    Ok(Json(stats.into_iter().collect()))
}
