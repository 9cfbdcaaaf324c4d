//! HTTP transport port
//!
//! Services describe a call as a [`TransportRequest`]; the transport performs
//! it, maps non-2xx responses to [`VellumError::Api`] and hands back the raw
//! JSON body. Unwrapping the `data` envelope happens on this side of the
//! port so every transport stays a pass-through.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use vellum_domain::{ApiResponse, FileUpload, Query, Result, VellumError};

/// HTTP methods used by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(FileUpload),
}

/// A request relative to the configured API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Path starting with `/`, e.g. `/items/articles`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Attach the bearer token from the token store
    pub authenticated: bool,
}

impl TransportRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Append the parameters of `query`.
    #[must_use]
    pub fn query(mut self, query: &Query) -> Self {
        self.query.extend(query.to_query_pairs());
        self
    }

    /// Serialize `body` as the JSON request body.
    ///
    /// # Errors
    /// Returns `VellumError::Serialization` if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, upload: FileUpload) -> Self {
        self.body = RequestBody::Multipart(upload);
        self
    }

    /// Send without an `Authorization` header (login, refresh, register).
    #[must_use]
    pub const fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

/// The HTTP abstraction used by all typed services.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform `request`.
    ///
    /// Returns the parsed JSON body, or `None` when a 2xx response has no
    /// body (204/205 or zero length).
    ///
    /// # Errors
    /// `VellumError::Api` for non-2xx responses, `Network`/`Timeout` for
    /// transport failures, `Serialization` for bodies that are not JSON.
    async fn execute(&self, request: TransportRequest) -> Result<Option<Value>>;
}

/// Execute and decode the whole `{data, meta}` envelope.
pub(crate) async fn fetch_envelope<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: TransportRequest,
) -> Result<ApiResponse<T>> {
    let path = request.path.clone();
    let body = transport.execute(request).await?.ok_or_else(|| {
        VellumError::Serialization(format!("{path} returned an empty body where data was expected"))
    })?;
    Ok(serde_json::from_value(body)?)
}

/// Execute and decode the `data` member of the envelope.
pub(crate) async fn fetch_data<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: TransportRequest,
) -> Result<T> {
    Ok(fetch_envelope(transport, request).await?.data)
}

/// Execute a request whose response body, if any, is irrelevant.
pub(crate) async fn execute_unit(transport: &dyn Transport, request: TransportRequest) -> Result<()> {
    transport.execute(request).await.map(|_| ())
}

/// Reject path segments that would change the request target.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(VellumError::InvalidInput("Primary key must not be empty".into()));
    }
    if matches!(key, "." | "..") || key.contains(['/', '\\', '?', '#']) || has_encoded_separator(key) {
        return Err(VellumError::InvalidInput(format!("Primary key '{key}' is not a valid path segment")));
    }
    Ok(())
}

/// `%2F`, `%5C` and `%2E` in any case; URL normalization may decode them.
fn has_encoded_separator(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    ["%2f", "%5c", "%2e"].iter().any(|encoded| lower.contains(encoded))
}
