use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use vellum_domain::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use vellum_domain::VellumError;

use crate::errors::InfraError;

/// HTTP client with built-in retry and timeout support.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, VellumError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// Requests whose body cannot be cloned (multipart uploads) are sent
    /// exactly once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, VellumError> {
        if builder.try_clone().is_none() {
            debug!("request body is not replayable, sending without retry");
            return self.send_once(builder).await;
        }

        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                VellumError::InvalidInput("request body cannot be cloned for retry".into())
            })?;

            let request = cloned_builder.build().map_err(|err| {
                let infra: InfraError = err.into();
                VellumError::from(infra)
            })?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && attempt + 1 < attempts {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");

                    if attempt + 1 < attempts && should_retry_error(&err) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(self.map_error(err));
                }
            }
        }

        Err(VellumError::Network("http client exhausted retries without producing a result".into()))
    }

    async fn send_once(&self, builder: RequestBuilder) -> Result<Response, VellumError> {
        builder.send().await.map_err(|err| self.map_error(err))
    }

    /// Map a reqwest failure, reporting timeouts with the configured limit.
    pub(crate) fn map_error(&self, err: reqwest::Error) -> VellumError {
        if err.is_timeout() {
            return VellumError::Timeout(self.timeout);
        }
        let infra: InfraError = err.into();
        VellumError::from(infra)
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    use_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(200),
            user_agent: Some(concat!("vellum-sdk/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
            use_proxy: true,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Ignore `HTTP_PROXY`/`HTTPS_PROXY`/`ALL_PROXY`, which are honoured by
    /// default.
    pub fn no_proxy(mut self) -> Self {
        self.use_proxy = false;
        self
    }

    pub fn build(self) -> Result<HttpClient, VellumError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if !self.use_proxy {
            builder = builder.no_proxy();
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            VellumError::from(infra)
        })?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
            timeout: self.timeout,
        })
    }
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::multipart::{Form, Part};
    use reqwest::{Method, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_with_defaults() -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(10))
            .max_attempts(3)
            .no_proxy()
            .build()
            .expect("http client")
    }

    #[tokio::test]
    async fn returns_successful_response_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_defaults();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                let current = attempts_clone.fetch_add(1, Ordering::SeqCst);
                if current < 2 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let client = client_with_defaults();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_last_server_error_after_exhausting_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_with_defaults();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_defaults();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn multipart_requests_are_sent_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_defaults();
        let form = Form::new().part("file", Part::bytes(b"hello".to_vec()).file_name("a.txt"));
        let response = client
            .send(client.request(Method::POST, server.uri()).multipart(form))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn slow_responses_map_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .timeout(Duration::from_millis(50))
            .max_attempts(1)
            .no_proxy()
            .build()
            .expect("http client");

        let result = client.send(client.request(Method::GET, server.uri())).await;
        match result {
            Err(VellumError::Timeout(after)) => assert_eq!(after, Duration::from_millis(50)),
            other => panic!("expected timeout, got {:?}", other.map(|r| r.status())),
        }
    }

    #[tokio::test]
    async fn retries_on_network_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED
        let url = format!("http://{}", addr);

        let client = HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(2)
            .no_proxy()
            .build()
            .expect("http client");

        let result = client.send(client.request(Method::GET, &url)).await;
        match result {
            Err(VellumError::Network(msg)) => {
                assert!(msg.to_lowercase().contains("http"));
            }
            other => panic!("expected network error, got {:?}", other.map(|r| r.status())),
        }
    }
}
