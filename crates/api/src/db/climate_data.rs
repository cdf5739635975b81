use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};
use utoipa::ToSchema;

/// Wire format for calendar dates, both for snapshot rows and for
/// caller-supplied range bounds. Strictly `YYYY-MM-DD`, zero padded.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query duckdb: {0}")]
    Query(#[from] duckdb::Error),
    #[error("Failed to parse date in snapshot: {0}")]
    DateParse(#[from] time::error::Parse),
    #[error("Malformed snapshot: {0}")]
    Snapshot(String),
}

/// One daily reading at one station.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub station_id: String,
    pub date: Date,
    /// Absent means "not reported", never zero.
    pub precipitation: Option<f64>,
    pub temperature: f64,
}

/// A weather station known to the directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Station {
    #[serde(rename = "station")]
    pub station_id: String,
    pub name: String,
}

/// Read-only access to the measurement snapshot and the station directory.
///
/// The snapshot is loaded once before serving begins and never mutated, so
/// implementations hand out shared slices rather than fresh copies.
pub trait ClimateData: Send + Sync {
    fn measurements(&self) -> Result<Arc<[Measurement]>, Error>;
    fn stations(&self) -> Result<Arc<[Station]>, Error>;
}

/// The in-memory snapshot backing every query for the process lifetime.
pub struct ClimateSnapshot {
    measurements: Arc<[Measurement]>,
    stations: Arc<[Station]>,
}

impl ClimateSnapshot {
    pub fn new(measurements: Vec<Measurement>, stations: Vec<Station>) -> Self {
        Self {
            measurements: measurements.into(),
            stations: stations.into(),
        }
    }
}

impl ClimateData for ClimateSnapshot {
    fn measurements(&self) -> Result<Arc<[Measurement]>, Error> {
        Ok(self.measurements.clone())
    }

    fn stations(&self) -> Result<Arc<[Station]>, Error> {
        Ok(self.stations.clone())
    }
}
