//! Adapters implementing application ports

mod geocoding_adapter;

pub use geocoding_adapter::GeocodingAdapter;
