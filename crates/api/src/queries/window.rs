use time::{Date, Duration};

use super::Error;
use crate::db::Measurement;

/// Resolve the canonical trailing-year window: the latest date present in
/// the snapshot and the day 365 days before it, both bounds inclusive.
pub fn resolve_window(measurements: &[Measurement]) -> Result<(Date, Date), Error> {
    let end = measurements
        .iter()
        .map(|m| m.date)
        .max()
        .ok_or(Error::NoData)?;
    let start = end.checked_sub(Duration::days(365)).unwrap_or(Date::MIN);
    Ok((start, end))
}
