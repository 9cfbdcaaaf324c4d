//! Authentication tokens and request bodies

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token delivery mode requested from the auth endpoints.
///
/// The SDK always asks for tokens in the JSON body rather than cookies.
pub const TOKEN_MODE_JSON: &str = "json";

/// Access/refresh token pair with absolute expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Absolute expiration timestamp (UTC) of the access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthTokens {
    /// Tokens without refresh capability or expiry, e.g. a static API token.
    pub fn access_only(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: None, expires_at: None }
    }

    /// Check if the access token is expired or will expire within
    /// `threshold_seconds`.
    ///
    /// Tokens without an expiry never report as expired.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + Duration::seconds(threshold_seconds) >= expires_at,
            None => false,
        }
    }

    /// Seconds until expiry, negative once expired.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }
}

/// Token payload returned by `/auth/login` and `/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in milliseconds.
    #[serde(default)]
    pub expires: Option<i64>,
}

impl TokenPayload {
    /// Convert into stored tokens, anchoring the lifetime at `issued_at`.
    pub fn into_tokens(self, issued_at: DateTime<Utc>) -> AuthTokens {
        let expires_at = self
            .expires
            .filter(|ms| *ms > 0)
            .map(|ms| issued_at + Duration::milliseconds(ms));

        AuthTokens { access_token: self.access_token, refresh_token: self.refresh_token, expires_at }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    pub mode: &'static str,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into(), otp: None, mode: TOKEN_MODE_JSON }
    }

    /// Attach a one-time password for accounts with 2FA enabled.
    #[must_use]
    pub fn with_otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(otp.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
    pub mode: &'static str,
}

impl RefreshRequest {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self { refresh_token: refresh_token.into(), mode: TOKEN_MODE_JSON }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
    pub mode: &'static str,
}

impl LogoutRequest {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self { refresh_token: refresh_token.into(), mode: TOKEN_MODE_JSON }
    }
}

/// Body of `/auth/password/request`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_url: Option<String>,
}

/// Body of `/auth/password/reset`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordReset {
    pub token: String,
    pub password: String,
}

/// Body of `/users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_url: Option<String>,
}

impl RegisterRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
            verification_url: None,
        }
    }
}
