//! REST response envelopes
//!
//! Successful responses wrap their payload in `{"data": ..., "meta": ...}`;
//! failures carry `{"errors": [{"message", "extensions": {"code"}}]}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Successful response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

/// Envelope for list endpoints.
pub type ListResponse<T> = ApiResponse<Vec<T>>;

/// Counts returned when a query asks for `meta`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_count: Option<u64>,
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

impl ErrorEnvelope {
    /// First error, which the API treats as the primary cause.
    pub fn primary(&self) -> Option<&ApiErrorDetail> {
        self.errors.first()
    }
}

/// A single API error entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(default)]
    pub extensions: ErrorExtensions,
}

impl ApiErrorDetail {
    pub fn code(&self) -> Option<&str> {
        self.extensions.code.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorExtensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
