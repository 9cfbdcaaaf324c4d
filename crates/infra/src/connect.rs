//! Wiring from configuration to a ready client

use std::sync::Arc;

use tracing::info;
use vellum_core::CmsClient;
use vellum_domain::{ClientConfig, Result};

use crate::http::ReqwestTransport;
use crate::realtime::RealtimeClient;
use crate::tokens;

/// Build a [`CmsClient`] with the configured token store and an HTTP
/// transport.
///
/// # Errors
/// Returns `VellumError::Config` for an invalid configuration and
/// `VellumError::TokenStore` if the token store cannot be opened.
pub fn connect(config: &ClientConfig) -> Result<CmsClient> {
    let token_store = tokens::from_config(&config.tokens)?;
    let transport = ReqwestTransport::new(config, token_store.clone())?;

    info!(base_url = %config.api_base(), "CMS client ready");
    Ok(CmsClient::new(Arc::new(transport), token_store))
}

/// Open a realtime connection that authenticates with the tokens of `client`.
pub async fn connect_realtime(config: &ClientConfig, client: &CmsClient) -> Result<RealtimeClient> {
    RealtimeClient::connect(config, client.token_store()).await
}
