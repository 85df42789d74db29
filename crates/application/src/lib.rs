//! Application layer - Use cases and orchestration
//!
//! Defines the ports the geocoding use cases depend on and the cache-aside
//! service that sits between callers and the vendor aggregator.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
