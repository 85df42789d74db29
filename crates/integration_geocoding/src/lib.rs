#![forbid(unsafe_code)]
//! Geocoding integration for Wayfinder
//!
//! Forward and reverse geocoding against interchangeable vendors (HERE,
//! GraphHopper, OpenStreetMap Nominatim, LocationIQ, Yandex) with bounded
//! per-call latency and round-robin failover.
//!
//! # Architecture
//!
//! Every vendor is an [`HttpGeocodingProvider`] assembled from an
//! [`EndpointBuilder`] and a [`ResponseParser`]. Each call runs on a detached
//! task raced against the [`CallContext`] deadline (see [`execution`]). The
//! [`RoundRobinProvider`] implements the same [`GeocodingProvider`] trait and
//! tries its providers in rotation until one succeeds.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{
//!     GeocodingClientConfig, ProviderKind, ProviderSpec, create_round_robin,
//! };
//!
//! let specs = [
//!     ProviderSpec::new(ProviderKind::Here, "here-key"),
//!     ProviderSpec::new(ProviderKind::OsmNominatim, ""),
//! ];
//! let geocoder = create_round_robin(&specs, &GeocodingClientConfig::default())?;
//!
//! let locations = geocoder.geocode("1600 Amphitheatre Parkway", &Default::default()).await?;
//! ```

mod config;
mod context;
mod error;
pub mod execution;
mod factory;
mod http_provider;
mod provider;
mod round_robin;
pub mod vendors;

pub use config::GeocodingClientConfig;
pub use context::CallContext;
pub use error::{GeocodingError, ProviderError};
pub use factory::{
    ProviderKind, ProviderSpec, create_provider, create_provider_by_key, create_round_robin,
};
pub use http_provider::{EndpointBuilder, HttpGeocodingProvider, ResponseParser};
pub use provider::{DEFAULT_TIMEOUT, GeocodingProvider};
pub use round_robin::RoundRobinProvider;
pub use vendors::EndpointOverrides;
