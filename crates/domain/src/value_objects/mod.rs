//! Value Objects - Immutable, identity-less domain primitives

mod language_tag;
mod location;

pub use language_tag::LanguageTag;
pub use location::Location;
