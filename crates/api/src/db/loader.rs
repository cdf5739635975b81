use duckdb::{
    arrow::array::{Array, Float64Array, RecordBatch, StringArray},
    Connection,
};
use log::info;
use time::Date;

use super::{ClimateSnapshot, Error, Measurement, Station, DATE_FORMAT};

const MEASUREMENTS_FILE: &str = "measurements.csv";
const STATIONS_FILE: &str = "stations.csv";

/// Load the full measurement/station snapshot from CSV files in `data_dir`.
///
/// This is the only I/O the service performs after argument parsing: both
/// files are read once through an in-memory duckdb connection and the typed
/// rows are held in memory for the process lifetime. Rows with a missing
/// temperature or an unparseable date fail the load outright; a partial
/// snapshot would silently skew every aggregate built on top of it.
pub fn load_snapshot(data_dir: &str) -> Result<ClimateSnapshot, Error> {
    let conn = open_connection()?;

    let measurements = load_measurements(&conn, &format!("{}/{}", data_dir, MEASUREMENTS_FILE))?;
    let stations = load_stations(&conn, &format!("{}/{}", data_dir, STATIONS_FILE))?;

    info!(
        "loaded snapshot: {} measurements, {} stations",
        measurements.len(),
        stations.len()
    );
    Ok(ClimateSnapshot::new(measurements, stations))
}

/// Creates a new in-memory connection, making it so we always start with a
/// fresh slate and no possible locking issues
fn open_connection() -> Result<Connection, duckdb::Error> {
    Connection::open_in_memory()
}

fn load_measurements(conn: &Connection, path: &str) -> Result<Vec<Measurement>, Error> {
    // Explicit casts so the arrow column types below are stable regardless
    // of what the CSV sniffer infers (integer temperatures would otherwise
    // arrive as BIGINT).
    let query_sql = format!(
        r#"
        SELECT
            station::VARCHAR AS station_id,
            date::VARCHAR AS date,
            prcp::DOUBLE AS precipitation,
            tobs::DOUBLE AS temperature
        FROM read_csv('{}', header = true)
        "#,
        path
    );

    let mut stmt = conn.prepare(&query_sql)?;
    let records: Vec<RecordBatch> = stmt.query_arrow([])?.collect();

    let mut measurements = Vec::new();
    for record_batch in &records {
        let station_id_arr = record_batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("Expected StringArray in column 0");
        let date_arr = record_batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("Expected StringArray in column 1");
        let precipitation_arr = record_batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .expect("Expected Float64Array in column 2");
        let temperature_arr = record_batch
            .column(3)
            .as_any()
            .downcast_ref::<Float64Array>()
            .expect("Expected Float64Array in column 3");

        for row_index in 0..record_batch.num_rows() {
            let station_id = station_id_arr.value(row_index).to_owned();
            let date_str = date_arr.value(row_index);
            let date = Date::parse(date_str, DATE_FORMAT)?;

            if temperature_arr.is_null(row_index) {
                return Err(Error::Snapshot(format!(
                    "missing temperature for station {} on {}",
                    station_id, date_str
                )));
            }
            let temperature = temperature_arr.value(row_index);

            // Missing precipitation stays None, it is not a zero reading
            let precipitation = if precipitation_arr.is_null(row_index) {
                None
            } else {
                Some(precipitation_arr.value(row_index))
            };

            measurements.push(Measurement {
                station_id,
                date,
                precipitation,
                temperature,
            });
        }
    }

    Ok(measurements)
}

fn load_stations(conn: &Connection, path: &str) -> Result<Vec<Station>, Error> {
    // The source file also carries geography columns (latitude, longitude,
    // elevation) that the API does not expose; only id and name are kept.
    let query_sql = format!(
        r#"
        SELECT
            station::VARCHAR AS station_id,
            name::VARCHAR AS name
        FROM read_csv('{}', header = true)
        "#,
        path
    );

    let mut stmt = conn.prepare(&query_sql)?;
    let records: Vec<RecordBatch> = stmt.query_arrow([])?.collect();

    let mut stations = Vec::new();
    for record_batch in &records {
        let station_id_arr = record_batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("Expected StringArray in column 0");
        let name_arr = record_batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("Expected StringArray in column 1");

        for row_index in 0..record_batch.num_rows() {
            if station_id_arr.is_null(row_index) {
                return Err(Error::Snapshot(format!(
                    "station row {} has no station id",
                    row_index
                )));
            }
            let station_id = station_id_arr.value(row_index).to_owned();
            let name = if name_arr.is_null(row_index) {
                String::new()
            } else {
                name_arr.value(row_index).to_owned()
            };

            stations.push(Station { station_id, name });
        }
    }

    Ok(stations)
}
