//! Token persistence in the platform keychain
//!
//! Each token lives in its own credential under one service name:
//! `access.<account>`, `refresh.<account>` and `expires.<account>` (RFC 3339).
//! Missing credentials read as `None`, so a partially written session still
//! loads as long as the access token is present.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keyring::Entry;
use tracing::{debug, warn};
use vellum_core::TokenStore;
use vellum_domain::{AuthTokens, Result, VellumError};

use crate::errors::InfraError;

const ACCESS_PREFIX: &str = "access.";
const REFRESH_PREFIX: &str = "refresh.";
const EXPIRES_PREFIX: &str = "expires.";

/// [`TokenStore`] backed by `keyring`.
pub struct KeychainTokenStore {
    service: String,
    account: String,
    access: Entry,
    refresh: Entry,
    expires: Entry,
}

impl KeychainTokenStore {
    /// # Errors
    /// Returns `VellumError::TokenStore` if the platform rejects the entry
    /// attributes.
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Result<Self> {
        let service = service.into();
        let account = account.into();

        let entry = |prefix: &str| {
            Entry::new(&service, &format!("{prefix}{account}"))
                .map_err(|err| VellumError::from(InfraError::from(err)))
        };

        Ok(Self {
            access: entry(ACCESS_PREFIX)?,
            refresh: entry(REFRESH_PREFIX)?,
            expires: entry(EXPIRES_PREFIX)?,
            service,
            account,
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn account(&self) -> &str {
        &self.account
    }
}

fn read(entry: &Entry) -> Result<Option<String>> {
    match entry.get_password() {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(InfraError::from(err).into()),
    }
}

fn write(entry: &Entry, value: Option<&str>) -> Result<()> {
    match value {
        Some(value) => entry.set_password(value).map_err(|err| InfraError::from(err).into()),
        None => remove(entry),
    }
}

/// Delete a credential; deleting a missing one succeeds.
fn remove(entry: &Entry) -> Result<()> {
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(err) => Err(InfraError::from(err).into()),
    }
}

#[async_trait]
impl TokenStore for KeychainTokenStore {
    async fn load(&self) -> Result<Option<AuthTokens>> {
        let Some(access_token) = read(&self.access)? else {
            return Ok(None);
        };

        let expires_at = match read(&self.expires)? {
            Some(raw) => match DateTime::parse_from_rfc3339(&raw) {
                Ok(parsed) => Some(parsed.with_timezone(&Utc)),
                Err(err) => {
                    warn!(account = %self.account, error = %err, "ignoring unreadable token expiry");
                    None
                }
            },
            None => None,
        };

        Ok(Some(AuthTokens { access_token, refresh_token: read(&self.refresh)?, expires_at }))
    }

    async fn store(&self, tokens: &AuthTokens) -> Result<()> {
        debug!(service = %self.service, account = %self.account, "storing tokens in keychain");

        write(&self.access, Some(&tokens.access_token))?;
        write(&self.refresh, tokens.refresh_token.as_deref())?;
        let expires = tokens.expires_at.map(|at| at.to_rfc3339());
        write(&self.expires, expires.as_deref())
    }

    async fn clear(&self) -> Result<()> {
        debug!(service = %self.service, account = %self.account, "clearing keychain tokens");

        remove(&self.access)?;
        remove(&self.refresh)?;
        remove(&self.expires)
    }
}
