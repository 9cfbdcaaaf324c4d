//! # Vellum Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The reqwest HTTP transport with retry
//! - Token stores (memory, platform keychain, JSON file)
//! - The WebSocket realtime client
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `vellum-core`
//! - Contains all "impure" code (network, keychain, filesystem)

pub mod config;
pub mod connect;
pub mod errors;
pub mod http;
pub mod observability;
pub mod realtime;
pub mod tokens;

// Re-export commonly used items
pub use connect::{connect, connect_realtime};
pub use errors::InfraError;
pub use http::{HttpClient, ReqwestTransport};
pub use observability::{init_logging, LoggingConfig};
pub use realtime::RealtimeClient;
pub use tokens::{FileTokenStore, InMemoryTokenStore, KeychainTokenStore};
