//! GraphQL queries against the content and system schemas

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{instrument, warn};
use vellum_domain::constants::{GRAPHQL_PATH, GRAPHQL_SYSTEM_PATH};
use vellum_domain::{GraphqlRequest, GraphqlResponse, Result, VellumError};

use crate::ports::{Transport, TransportRequest};

#[derive(Clone)]
pub struct GraphqlService {
    transport: Arc<dyn Transport>,
}

impl GraphqlService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Run a query or mutation against the content schema (`/graphql`).
    ///
    /// # Errors
    /// Returns `VellumError::Graphql` when the response carries `errors`.
    #[instrument(skip(self, request), fields(operation = ?request.operation_name))]
    pub async fn query<T: DeserializeOwned>(&self, request: &GraphqlRequest) -> Result<T> {
        self.execute(GRAPHQL_PATH, request).await
    }

    /// Run a query against the system schema (`/graphql/system`).
    #[instrument(skip(self, request), fields(operation = ?request.operation_name))]
    pub async fn system_query<T: DeserializeOwned>(&self, request: &GraphqlRequest) -> Result<T> {
        self.execute(GRAPHQL_SYSTEM_PATH, request).await
    }

    async fn execute<T: DeserializeOwned>(&self, path: &str, request: &GraphqlRequest) -> Result<T> {
        let http_request = TransportRequest::post(path).json(request)?;
        let body = self.transport.execute(http_request).await?.ok_or_else(|| {
            VellumError::Serialization("GraphQL endpoint returned an empty body".into())
        })?;

        let response: GraphqlResponse<T> = serde_json::from_value(body)?;
        if !response.errors.is_empty() {
            warn!(count = response.errors.len(), "GraphQL response contained errors");
            return Err(VellumError::Graphql(response.errors));
        }

        response
            .data
            .ok_or_else(|| VellumError::Serialization("GraphQL response without data".into()))
    }
}
