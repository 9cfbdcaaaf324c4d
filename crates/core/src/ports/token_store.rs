//! Token persistence port

use async_trait::async_trait;
use vellum_domain::{AuthTokens, Result};

/// Storage for the access token, refresh token and expiry of the current
/// session.
///
/// After `store(tokens)`, `load()` returns exactly `tokens`; after `clear()`
/// every slot reads `None`.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored tokens, `None` when nothing is stored.
    async fn load(&self) -> Result<Option<AuthTokens>>;

    /// Replace the stored tokens.
    async fn store(&self, tokens: &AuthTokens) -> Result<()>;

    /// Remove all stored tokens. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<()>;

    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.map(|tokens| tokens.access_token))
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.and_then(|tokens| tokens.refresh_token))
    }
}
