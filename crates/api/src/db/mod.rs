mod climate_data;
mod loader;

pub use climate_data::*;
pub use loader::load_snapshot;
