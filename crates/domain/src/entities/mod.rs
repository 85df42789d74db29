//! Domain entities and per-call lookup options

mod address;
mod geocode_config;

pub use address::Address;
pub use geocode_config::{DEFAULT_ZOOM, GeocodeConfig, ReverseGeocodeConfig};
