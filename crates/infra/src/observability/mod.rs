//! Logging setup for applications embedding the SDK
//!
//! The SDK itself only emits `tracing` events; installing a subscriber is
//! left to the application. [`init_logging`] is a ready-made one.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingConfig};
