//! Port interfaces between the typed services and infrastructure
//!
//! Implementations live in `vellum-infra`; tests supply in-memory doubles.

pub mod token_store;
pub mod transport;

pub use token_store::TokenStore;
pub use transport::{HttpMethod, RequestBody, Transport, TransportRequest};
