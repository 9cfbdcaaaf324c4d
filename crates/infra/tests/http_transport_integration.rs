//! ReqwestTransport against a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use serde_json::json;
use vellum_core::{CmsClient, TokenStore, Transport, TransportRequest};
use vellum_domain::{AuthTokens, ClientConfig, FileUpload, Query, VellumError};
use vellum_infra::{HttpClient, InMemoryTokenStore, ReqwestTransport};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn transport(server: &MockServer, tokens: Arc<InMemoryTokenStore>) -> ReqwestTransport {
    let http = HttpClient::builder()
        .max_attempts(2)
        .base_backoff(std::time::Duration::from_millis(5))
        .no_proxy()
        .build()
        .expect("http client");
    ReqwestTransport::with_http_client(http, server.uri(), tokens)
}

fn logged_in() -> Arc<InMemoryTokenStore> {
    Arc::new(InMemoryTokenStore::with_tokens(AuthTokens::access_only("access-123")))
}

#[tokio::test]
async fn get_sends_query_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/articles"))
        .and(query_param("fields", "id,title"))
        .and(query_param("filter", r#"{"status":{"_eq":"published"}}"#))
        .and(query_param("limit", "5"))
        .and(header("authorization", "Bearer access-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 1}]})))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query::new()
        .fields(["id", "title"])
        .filter(json!({"status": {"_eq": "published"}}))
        .limit(5);
    let body = transport(&server, logged_in())
        .execute(TransportRequest::get("/items/articles").query(&query))
        .await
        .unwrap();

    assert_eq!(body, Some(json!({"data": [{"id": 1}]})));
}

#[tokio::test]
async fn anonymous_requests_carry_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "a@b.c", "password": "pw", "mode": "json"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"data": {"access_token": "x", "refresh_token": "y", "expires": 1000}}),
        ))
        .mount(&server)
        .await;

    let request = TransportRequest::post("/auth/login")
        .json(&json!({"email": "a@b.c", "password": "pw", "mode": "json"}))
        .unwrap()
        .anonymous();
    transport(&server, logged_in()).execute(request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn static_token_is_used_when_store_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer static-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server, Arc::new(InMemoryTokenStore::new())).static_token("static-token");
    transport.execute(TransportRequest::get("/users/me")).await.unwrap();
}

#[tokio::test]
async fn no_content_and_empty_bodies_are_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let transport = transport(&server, logged_in());
    let deleted = transport.execute(TransportRequest::delete("/items/articles/1")).await.unwrap();
    let posted = transport.execute(TransportRequest::post("/auth/password/request")).await.unwrap();

    assert_eq!(deleted, None);
    assert_eq!(posted, None);
}

#[tokio::test]
async fn error_envelope_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{"message": "You don't have permission to access this.", "extensions": {"code": "FORBIDDEN"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = transport(&server, logged_in())
        .execute(TransportRequest::get("/items/secrets"))
        .await
        .unwrap_err();

    match err {
        VellumError::Api { status, code, message } => {
            assert_eq!(status, 403);
            assert_eq!(code.as_deref(), Some("FORBIDDEN"));
            assert_eq!(message, "You don't have permission to access this.");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_retried_before_failing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(2)
        .mount(&server)
        .await;

    let err = transport(&server, logged_in())
        .execute(TransportRequest::get("/server/info"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn invalid_json_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = transport(&server, logged_in())
        .execute(TransportRequest::get("/items/articles"))
        .await
        .unwrap_err();

    assert!(matches!(err, VellumError::Serialization(msg) if msg.contains("/items/articles")));
}

#[tokio::test]
async fn uploads_are_multipart_with_fields_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .and(header_exists("content-type"))
        .respond_with(|request: &Request| {
            let content_type = request.headers.get("content-type").unwrap().to_str().unwrap();
            assert!(content_type.starts_with("multipart/form-data"));

            let body = String::from_utf8_lossy(&request.body).to_string();
            let title = body.find("name=\"title\"").expect("title field");
            let file = body.find("name=\"file\"").expect("file part");
            assert!(title < file);
            assert!(body.contains("filename=\"notes.txt\""));
            assert!(body.contains("hello world"));

            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "f1"}}))
        })
        .expect(1)
        .mount(&server)
        .await;

    let tokens = logged_in();
    let client = CmsClient::new(Arc::new(transport(&server, tokens.clone())), tokens);
    let upload = FileUpload::new("notes.txt", "text/plain", b"hello world".to_vec()).field("title", "Notes");

    let record = client.files().upload(upload).await.unwrap();
    assert_eq!(record.id, "f1");
}

#[tokio::test]
async fn login_then_authenticated_call_through_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"data": {"access_token": "fresh", "refresh_token": "r", "expires": 900000}}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "u1", "email": "a@b.c"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(InMemoryTokenStore::new());
    let client = CmsClient::new(Arc::new(transport(&server, tokens.clone())), tokens.clone());

    client.auth().login("a@b.c", "pw").await.unwrap();
    let me = client.users().me(&Query::new()).await.unwrap();

    assert_eq!(me.email.as_deref(), Some("a@b.c"));
    assert_eq!(tokens.refresh_token().await.unwrap().as_deref(), Some("r"));
}

#[tokio::test]
async fn connect_builds_client_from_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/server/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let mut config = ClientConfig::new(format!("{}/", server.uri()));
    config.max_attempts = 1;
    let client = vellum_infra::connect(&config).unwrap();

    assert!(client.server().health().await.unwrap());
}

#[tokio::test]
async fn connect_rejects_invalid_config() {
    let config = ClientConfig::new("not a url");
    assert!(matches!(vellum_infra::connect(&config), Err(VellumError::Config(_))));
}

#[tokio::test]
async fn stalled_body_maps_to_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"data\":")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let http = HttpClient::builder()
        .timeout(Duration::from_millis(200))
        .max_attempts(1)
        .no_proxy()
        .build()
        .unwrap();
    let transport = ReqwestTransport::with_http_client(http, format!("http://{addr}"), logged_in());

    let err = transport.execute(TransportRequest::get("/items/articles")).await.unwrap_err();
    assert!(matches!(err, VellumError::Timeout(after) if after == Duration::from_millis(200)));
}
