//! The query/aggregation engine.
//!
//! Pure functions over the loaded measurement snapshot, orchestrated by
//! [`QueryService`] into the five read operations the HTTP layer exposes.

mod aggregate;
mod ranking;
mod service;
mod window;

pub use aggregate::{precipitation_series, temperature_stats, TemperatureStats};
pub use ranking::most_active_station;
pub use service::{parse_date, QueryService, TemperatureObservation};
pub use window::resolve_window;

use crate::db;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Caller-supplied date did not parse. The Display text is the exact
    /// body clients receive with the 400 response.
    #[error("Invalid date format. Use YYYY-MM-DD.")]
    DateFormat(#[source] time::error::Parse),
    /// The snapshot holds zero measurements, so no latest date exists.
    /// A deployment problem, not user input.
    #[error("no measurement data loaded")]
    NoData,
    #[error("failed to read from the climate store: {0}")]
    Store(#[from] db::Error),
    #[error("failed to render date: {0}")]
    DateRender(#[from] time::error::Format),
}
