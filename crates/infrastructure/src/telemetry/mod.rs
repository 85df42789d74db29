//! Logging and tracing setup
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either a
//! human-readable or a JSON formatter. Logs go to stderr so command output on
//! stdout stays machine-readable.

mod subscriber;

pub use subscriber::{TelemetryConfig, TelemetryError, init_telemetry};
