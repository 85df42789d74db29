//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports: the vendor failover aggregator behind
//! [`GeocodingPort`](application::ports::GeocodingPort), Moka and redb behind
//! [`CachePort`](application::ports::CachePort). Also owns configuration
//! loading and logging setup.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod telemetry;

pub use adapters::GeocodingAdapter;
pub use cache::{MokaCache, MokaCacheConfig, RedbCache, build_cache};
pub use config::{
    AppConfig, CacheBackend, CacheConfig, GeocodingAppConfig, ProviderEntry, TelemetryConfig,
};
pub use telemetry::{TelemetryError, init_telemetry};
