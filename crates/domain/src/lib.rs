//! Domain layer for Wayfinder
//!
//! Contains the canonical geocoding model every vendor response is normalized
//! into, the per-call lookup options, and domain errors.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
