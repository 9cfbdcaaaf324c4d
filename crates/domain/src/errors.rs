//! Error types used throughout the SDK

use std::time::Duration;

use thiserror::Error;

use crate::types::ApiErrorDetail;

/// Main error type for Vellum
#[derive(Error, Debug, Clone)]
pub enum VellumError {
    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// Machine-readable code from `errors[0].extensions.code`, if any.
        code: Option<String>,
        message: String,
    },

    /// A GraphQL request succeeded at the HTTP level but returned `errors`.
    #[error("GraphQL error: {}", join_messages(.0))]
    Graphql(Vec<ApiErrorDetail>),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("Realtime error: {0}")]
    Realtime(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VellumError {
    /// HTTP status for [`VellumError::Api`] errors.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// API error code, from the REST error envelope or the first GraphQL error.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            Self::Graphql(errors) => errors.first().and_then(ApiErrorDetail::code),
            _ => None,
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// `true` for 401 responses and local authentication failures.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. } | Self::Auth(_))
    }

    /// Stable label suitable for log fields.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Api { .. } => "api",
            Self::Graphql(_) => "graphql",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
            Self::Auth(_) => "auth",
            Self::TokenStore(_) => "token_store",
            Self::Realtime(_) => "realtime",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

fn join_messages(errors: &[ApiErrorDetail]) -> String {
    if errors.is_empty() {
        return "unknown error".to_string();
    }
    errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
}

impl From<serde_json::Error> for VellumError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Vellum operations
pub type Result<T> = std::result::Result<T, VellumError>;
