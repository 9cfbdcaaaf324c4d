mod support;

use std::sync::Arc;

use serde_json::{json, Value};
use support::RecordingTransport;
use vellum_core::{GraphqlService, RequestBody};
use vellum_domain::{GraphqlRequest, VellumError};

#[tokio::test]
async fn query_returns_data() {
    let transport = RecordingTransport::new()
        .respond_with(json!({"data": {"articles": [{"id": "1", "title": "Hello"}]}}));
    let graphql = GraphqlService::new(Arc::new(transport.clone()));

    let request = GraphqlRequest::new("query Articles($n: Int) { articles(limit: $n) { id title } }")
        .variables(json!({"n": 1}))
        .operation_name("Articles");
    let data: Value = graphql.query(&request).await.unwrap();

    assert_eq!(data["articles"][0]["title"], "Hello");
    let sent = transport.last_request();
    assert_eq!(sent.path, "/graphql");
    match sent.body {
        RequestBody::Json(body) => {
            assert_eq!(body["operationName"], "Articles");
            assert_eq!(body["variables"]["n"], 1);
        }
        other => panic!("unexpected body {other:?}"),
    }
}

#[tokio::test]
async fn system_query_targets_system_schema() {
    let transport = RecordingTransport::new().respond_with(json!({"data": {"users_me": {"id": "u1"}}}));
    let graphql = GraphqlService::new(Arc::new(transport.clone()));

    let data: Value = graphql.system_query(&GraphqlRequest::new("{ users_me { id } }")).await.unwrap();

    assert_eq!(data["users_me"]["id"], "u1");
    assert_eq!(transport.last_request().path, "/graphql/system");
}

#[tokio::test]
async fn errors_in_body_become_graphql_error() {
    let transport = RecordingTransport::new().respond_with(json!({
        "data": null,
        "errors": [
            {"message": "Cannot query field \"nope\"", "extensions": {"code": "GRAPHQL_VALIDATION"}},
            {"message": "second"}
        ]
    }));
    let graphql = GraphqlService::new(Arc::new(transport));

    let err = graphql.query::<Value>(&GraphqlRequest::new("{ nope }")).await.unwrap_err();

    match &err {
        VellumError::Graphql(errors) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].code(), Some("GRAPHQL_VALIDATION"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("second"));
}

#[tokio::test]
async fn missing_data_is_serialization_error() {
    let transport = RecordingTransport::new().respond_with(json!({}));
    let graphql = GraphqlService::new(Arc::new(transport));

    let err = graphql.query::<Value>(&GraphqlRequest::new("{ a }")).await.unwrap_err();

    assert!(matches!(err, VellumError::Serialization(_)));
}
