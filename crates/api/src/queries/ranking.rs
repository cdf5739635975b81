use itertools::Itertools;

use super::Error;
use crate::db::Measurement;

/// The station with the greatest number of measurements in the whole
/// snapshot, not limited to the trailing window.
///
/// Ties break to the lexicographically smallest station id so repeated
/// calls against the same snapshot always agree.
pub fn most_active_station(measurements: &[Measurement]) -> Result<String, Error> {
    measurements
        .iter()
        .map(|m| m.station_id.as_str())
        .counts()
        .into_iter()
        .max_by(|(id_a, count_a), (id_b, count_b)| {
            count_a.cmp(count_b).then_with(|| id_b.cmp(id_a))
        })
        .map(|(station_id, _)| station_id.to_owned())
        .ok_or(Error::NoData)
}
