//! Login, token refresh and logout
//!
//! The auth service is the only writer of the token store during normal
//! operation: login and refresh store the new pair, logout clears it.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use vellum_domain::constants::{
    AUTH_LOGIN_PATH, AUTH_LOGOUT_PATH, AUTH_PASSWORD_REQUEST_PATH, AUTH_PASSWORD_RESET_PATH,
    AUTH_REFRESH_PATH,
};
use vellum_domain::{
    AuthTokens, LoginRequest, LogoutRequest, PasswordRequest, PasswordReset, RefreshRequest,
    Result, TokenPayload, VellumError,
};

use crate::ports::transport::{execute_unit, fetch_data};
use crate::ports::{TokenStore, Transport, TransportRequest};

/// Authentication service backed by a [`TokenStore`]
#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    /// Log in with email and password and store the issued tokens.
    ///
    /// # Errors
    /// Returns `VellumError::Api` with status 401 for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens> {
        self.login_with(LoginRequest::new(email, password)).await
    }

    /// Log in with a one-time password for accounts with 2FA enabled.
    #[instrument(skip(self, password, otp))]
    pub async fn login_with_otp(&self, email: &str, password: &str, otp: &str) -> Result<AuthTokens> {
        self.login_with(LoginRequest::new(email, password).with_otp(otp)).await
    }

    async fn login_with(&self, body: LoginRequest) -> Result<AuthTokens> {
        let request = TransportRequest::post(AUTH_LOGIN_PATH).json(&body)?.anonymous();
        let payload: TokenPayload = fetch_data(self.transport.as_ref(), request).await?;

        let tokens = payload.into_tokens(Utc::now());
        self.tokens.store(&tokens).await?;

        info!(expires_at = ?tokens.expires_at, "login successful");
        Ok(tokens)
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// A rejected refresh token (401) clears the store so the session reads
    /// as logged out.
    ///
    /// # Errors
    /// Returns `VellumError::Auth` when no refresh token is stored.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<AuthTokens> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .await?
            .ok_or_else(|| VellumError::Auth("No refresh token available".into()))?;

        let request = TransportRequest::post(AUTH_REFRESH_PATH)
            .json(&RefreshRequest::new(refresh_token))?
            .anonymous();

        let payload: TokenPayload = match fetch_data(self.transport.as_ref(), request).await {
            Ok(payload) => payload,
            Err(err) => {
                if err.is_unauthorized() {
                    warn!(error = %err, "refresh token rejected, clearing session");
                    self.tokens.clear().await?;
                }
                return Err(err);
            }
        };

        let tokens = payload.into_tokens(Utc::now());
        self.tokens.store(&tokens).await?;

        debug!(expires_at = ?tokens.expires_at, "tokens refreshed");
        Ok(tokens)
    }

    /// Refresh when the access token expires within `threshold_secs`.
    ///
    /// Returns `true` if a refresh happened. Sessions without tokens, without
    /// a refresh token or without an expiry are left untouched.
    pub async fn refresh_if_expiring(&self, threshold_secs: i64) -> Result<bool> {
        let Some(tokens) = self.tokens.load().await? else {
            return Ok(false);
        };

        if tokens.refresh_token.is_none() || !tokens.is_expired(threshold_secs) {
            return Ok(false);
        }

        self.refresh().await?;
        Ok(true)
    }

    /// Invalidate the refresh token on the server and clear local tokens.
    ///
    /// A failing server call is logged; local tokens are cleared regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if let Some(refresh_token) = self.tokens.refresh_token().await? {
            let request = TransportRequest::post(AUTH_LOGOUT_PATH)
                .json(&LogoutRequest::new(refresh_token))?
                .anonymous();

            if let Err(err) = execute_unit(self.transport.as_ref(), request).await {
                warn!(error = %err, "server logout failed, clearing local session anyway");
            }
        }

        self.tokens.clear().await?;
        info!("logged out");
        Ok(())
    }

    /// `true` while an unexpired access token is stored.
    pub async fn is_authenticated(&self) -> bool {
        match self.tokens.load().await {
            Ok(Some(tokens)) => !tokens.is_expired(0),
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "token store unavailable");
                false
            }
        }
    }

    pub async fn current_tokens(&self) -> Result<Option<AuthTokens>> {
        self.tokens.load().await
    }

    /// Use a static API token instead of login tokens.
    pub async fn set_static_token(&self, token: &str) -> Result<()> {
        self.tokens.store(&AuthTokens::access_only(token)).await
    }

    /// Ask the server to email a password reset link.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str, reset_url: Option<&str>) -> Result<()> {
        let body = PasswordRequest { email: email.to_string(), reset_url: reset_url.map(String::from) };
        let request = TransportRequest::post(AUTH_PASSWORD_REQUEST_PATH).json(&body)?.anonymous();
        execute_unit(self.transport.as_ref(), request).await
    }

    /// Set a new password using the token from the reset email.
    #[instrument(skip(self, token, password))]
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        let body = PasswordReset { token: token.to_string(), password: password.to_string() };
        let request = TransportRequest::post(AUTH_PASSWORD_RESET_PATH).json(&body)?.anonymous();
        execute_unit(self.transport.as_ref(), request).await
    }
}
