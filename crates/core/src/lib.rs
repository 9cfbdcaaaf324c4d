//! # Vellum Core
//!
//! Typed CMS services on top of two ports.
//!
//! This crate contains:
//! - Port interfaces ([`Transport`], [`TokenStore`])
//! - Typed services (auth, items, users, roles, files, GraphQL, server)
//! - [`CmsClient`], which hands the services out
//!
//! ## Architecture Principles
//! - Only depends on `vellum-domain`
//! - No HTTP, socket or storage code
//! - All external dependencies via traits

pub mod client;
pub mod ports;
pub mod services;

pub use client::CmsClient;
pub use ports::{HttpMethod, RequestBody, TokenStore, Transport, TransportRequest};
pub use services::{
    AuthService, FilesService, GraphqlService, ItemsService, RolesService, ServerHealth,
    ServerService, UsersService,
};
