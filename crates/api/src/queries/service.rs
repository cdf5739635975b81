use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

use super::{
    most_active_station, precipitation_series, resolve_window, temperature_stats, Error,
    TemperatureStats,
};
use crate::db::{ClimateData, Measurement, Station, DATE_FORMAT};

/// One temperature reading at the most-active station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureObservation {
    pub date: String,
    pub temperature: f64,
}

/// Parse a caller-supplied date, strictly `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<Date, Error> {
    Date::parse(value, DATE_FORMAT).map_err(Error::DateFormat)
}

/// The five read operations exposed over HTTP, each a stateless pass over
/// the snapshot behind the store handle.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn ClimateData>,
}

impl QueryService {
    pub fn new(store: Arc<dyn ClimateData>) -> Self {
        Self { store }
    }

    /// Precipitation by date over the trailing year, keyed `YYYY-MM-DD`.
    pub fn precipitation(&self) -> Result<BTreeMap<String, Option<f64>>, Error> {
        let measurements = self.store.measurements()?;
        let (start, end) = resolve_window(&measurements)?;

        let mut series = BTreeMap::new();
        for (date, precipitation) in precipitation_series(&measurements, start, end) {
            series.insert(date.format(DATE_FORMAT)?, precipitation);
        }
        Ok(series)
    }

    /// The station directory, in directory order.
    pub fn stations(&self) -> Result<Vec<Station>, Error> {
        Ok(self.store.stations()?.to_vec())
    }

    /// Temperature readings at the most-active station over the trailing
    /// year, ascending by date.
    pub fn temperature_observations(&self) -> Result<Vec<TemperatureObservation>, Error> {
        let measurements = self.store.measurements()?;
        let (start, end) = resolve_window(&measurements)?;
        let station_id = most_active_station(&measurements)?;

        let mut readings: Vec<&Measurement> = measurements
            .iter()
            .filter(|m| m.station_id == station_id && m.date >= start && m.date <= end)
            .collect();
        readings.sort_by_key(|m| m.date);

        readings
            .into_iter()
            .map(|m| {
                Ok(TemperatureObservation {
                    date: m.date.format(DATE_FORMAT)?,
                    temperature: m.temperature,
                })
            })
            .collect()
    }

    /// Temperature stats from `start` through the latest date in the
    /// snapshot. The end of the range is never caller-controlled.
    pub fn stats_from(&self, start: &str) -> Result<Option<TemperatureStats>, Error> {
        let start = parse_date(start)?;
        let measurements = self.store.measurements()?;
        let (_, end) = resolve_window(&measurements)?;
        Ok(temperature_stats(&measurements, start, end, None))
    }

    /// Temperature stats over a caller-supplied inclusive range. No
    /// `start <= end` validation: an inverted range yields the same empty
    /// aggregate as any other empty range.
    pub fn stats_range(&self, start: &str, end: &str) -> Result<Option<TemperatureStats>, Error> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        let measurements = self.store.measurements()?;
        Ok(temperature_stats(&measurements, start, end, None))
    }
}
