use async_trait::async_trait;
use parking_lot::RwLock;
use vellum_core::TokenStore;
use vellum_domain::{AuthTokens, Result};

/// Token store that lives for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<Option<AuthTokens>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self { tokens: RwLock::new(Some(tokens)) }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<AuthTokens>> {
        Ok(self.tokens.read().clone())
    }

    async fn store(&self, tokens: &AuthTokens) -> Result<()> {
        *self.tokens.write() = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.tokens.write().take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn sample() -> AuthTokens {
        AuthTokens {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            expires_at: Some(Utc::now() + Duration::minutes(15)),
        }
    }

    #[tokio::test]
    async fn returns_what_was_last_stored() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.store(&sample()).await.unwrap();
        let replacement = AuthTokens::access_only("other");
        store.store(&replacement).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(replacement));
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("other"));
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_empties_every_slot() {
        let store = InMemoryTokenStore::with_tokens(sample());
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.load().await.unwrap(), None);
        assert_eq!(store.access_token().await.unwrap(), None);
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }
}
