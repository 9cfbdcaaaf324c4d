//! reqwest-backed implementation of the core [`Transport`] port

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use vellum_core::{HttpMethod, RequestBody, TokenStore, Transport, TransportRequest};
use vellum_domain::{ClientConfig, ErrorEnvelope, FileUpload, Result, VellumError};

use super::client::HttpClient;

/// Transport that talks to the CMS over HTTP(S).
///
/// Authenticated requests carry the stored access token, or the configured
/// static token when the store is empty.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: HttpClient,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    static_token: Option<String>,
}

impl ReqwestTransport {
    /// Build a transport from client configuration.
    ///
    /// # Errors
    /// Returns `VellumError::Config` if the configuration is invalid.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        config.validate()?;

        let http = HttpClient::builder()
            .timeout(config.timeout())
            .max_attempts(config.max_attempts)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base().to_string(),
            tokens,
            static_token: config.static_token.clone(),
        })
    }

    /// Use a preconfigured [`HttpClient`].
    pub fn with_http_client(
        http: HttpClient,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, tokens, static_token: None }
    }

    #[must_use]
    pub fn static_token(mut self, token: impl Into<String>) -> Self {
        self.static_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn bearer_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.tokens.access_token().await? {
            return Ok(Some(token));
        }
        Ok(self.static_token.clone())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: TransportRequest) -> Result<Option<Value>> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(reqwest_method(request.method), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if request.authenticated {
            if let Some(token) = self.bearer_token().await? {
                builder = builder.bearer_auth(token);
            }
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(upload) => builder.multipart(multipart_form(upload)?),
        };

        let response = self.http.send(builder).await?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| self.http.map_error(err))?;

        if !status.is_success() {
            let error = api_error(status, &bytes);
            warn!(status = status.as_u16(), code = ?error.code(), "CMS request failed");
            return Err(error);
        }

        if status == StatusCode::NO_CONTENT
            || status == StatusCode::RESET_CONTENT
            || bytes.iter().all(u8::is_ascii_whitespace)
        {
            debug!(status = status.as_u16(), "empty response body");
            return Ok(None);
        }

        serde_json::from_slice(&bytes).map(Some).map_err(|err| {
            VellumError::Serialization(format!("Invalid JSON from {}: {err}", request.path))
        })
    }
}

const fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Metadata fields go first; the API ignores fields sent after the file.
fn multipart_form(upload: FileUpload) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in upload.fields {
        form = form.text(name, value);
    }

    let part = Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(&upload.content_type)
        .map_err(|err| {
            VellumError::InvalidInput(format!("Invalid content type '{}': {err}", upload.content_type))
        })?;

    Ok(form.part("file", part))
}

/// Map a non-2xx response to `VellumError::Api`, preferring the message and
/// code of the first entry in the error envelope.
fn api_error(status: StatusCode, body: &[u8]) -> VellumError {
    let envelope = serde_json::from_slice::<ErrorEnvelope>(body).ok();
    let primary = envelope.as_ref().and_then(ErrorEnvelope::primary);

    let message = match primary {
        Some(detail) => detail.message.clone(),
        None => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                text
            }
        }
    };

    VellumError::Api {
        status: status.as_u16(),
        code: primary.and_then(|detail| detail.code()).map(String::from),
        message,
    }
}
