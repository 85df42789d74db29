//! Application services - Use case implementations

mod geocoding_service;

pub use geocoding_service::{
    AddressOutput, GeocodingInput, GeocodingOutput, GeocodingService, PointOutput,
    ReverseGeocodingInput, ReverseGeocodingOutput, geocode_cache_key, reverse_geocode_cache_key,
};
