//! # Vellum Domain
//!
//! Data types shared by every layer of the Vellum CMS SDK.
//!
//! This crate contains:
//! - Data-transfer records (users, roles, files, envelopes, tokens)
//! - The [`Query`] descriptor
//! - Client configuration structures
//! - The [`VellumError`] type and `Result` alias
//!
//! ## Architecture
//! - No dependencies on other Vellum crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod query;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use query::Query;
pub use types::*;
