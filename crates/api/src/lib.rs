pub mod db;
pub mod queries;
pub mod routes;
mod startup;
mod templates;
mod utils;

pub use db::{ClimateData, ClimateSnapshot, Measurement, Station, DATE_FORMAT};
pub use queries::{QueryService, TemperatureObservation, TemperatureStats};
pub use routes::*;
pub use startup::{app, build_app_state, AppState};
pub use utils::{get_config_info, get_log_level, setup_logger, Cli};
