//! HTTP client and transport

pub mod client;
pub mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use transport::ReqwestTransport;
