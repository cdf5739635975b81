use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

use crate::db::Measurement;

/// Derived min/avg/max temperature summary over a filtered measurement set.
///
/// The serialized field names match the wire contract of the start/start_end
/// endpoints verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureStats {
    #[serde(rename = "Min_Temp")]
    pub min: f64,
    #[serde(rename = "Avg_Temp")]
    pub avg: f64,
    #[serde(rename = "Max_Temp")]
    pub max: f64,
}

/// Min/avg/max temperature over `start..=end`, optionally restricted to one
/// station.
///
/// Returns `None` when nothing matches so callers can tell "no data" apart
/// from "data with value 0". An inverted range (`start > end`) is simply an
/// empty range, never an error.
pub fn temperature_stats(
    measurements: &[Measurement],
    start: Date,
    end: Date,
    station_filter: Option<&str>,
) -> Option<TemperatureStats> {
    let mut count = 0u64;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for m in measurements {
        if m.date < start || m.date > end {
            continue;
        }
        if let Some(station_id) = station_filter {
            if m.station_id != station_id {
                continue;
            }
        }
        count += 1;
        sum += m.temperature;
        min = min.min(m.temperature);
        max = max.max(m.temperature);
    }

    if count == 0 {
        return None;
    }
    Some(TemperatureStats {
        min,
        avg: sum / count as f64,
        max,
    })
}

/// Date-keyed precipitation over `start..=end` across all stations.
///
/// When several stations report the same date, the record encountered last
/// in snapshot order wins. That mirrors the behavior callers of the
/// precipitation endpoint have always seen, so it is kept as a contract
/// rather than averaged away.
pub fn precipitation_series(
    measurements: &[Measurement],
    start: Date,
    end: Date,
) -> BTreeMap<Date, Option<f64>> {
    let mut series = BTreeMap::new();
    for m in measurements {
        if m.date >= start && m.date <= end {
            series.insert(m.date, m.precipitation);
        }
    }
    series
}
