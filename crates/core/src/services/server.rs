//! Server health and info

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use vellum_domain::constants::{SERVER_HEALTH_PATH, SERVER_INFO_PATH};
use vellum_domain::Result;

use crate::ports::transport::fetch_data;
use crate::ports::{Transport, TransportRequest};

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerHealth {
    pub status: String,
}

impl ServerHealth {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Clone)]
pub struct ServerService {
    transport: Arc<dyn Transport>,
}

impl ServerService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Health check. The health endpoint is not wrapped in a data envelope.
    ///
    /// # Returns
    /// `true` if the server reports `ok`. A 503 with a health body is
    /// returned as an `Api` error by the transport.
    pub async fn health(&self) -> Result<bool> {
        let request = TransportRequest::get(SERVER_HEALTH_PATH).anonymous();
        let body = self.transport.execute(request).await?.unwrap_or(Value::Null);

        match serde_json::from_value::<ServerHealth>(body) {
            Ok(health) if health.is_ok() => {
                info!("CMS is healthy");
                Ok(true)
            }
            Ok(health) => {
                warn!(status = %health.status, "CMS reported degraded health");
                Ok(false)
            }
            Err(err) => {
                warn!(error = %err, "unexpected health response");
                Ok(false)
            }
        }
    }

    /// Project and server information visible to the caller.
    pub async fn info(&self) -> Result<Value> {
        fetch_data(self.transport.as_ref(), TransportRequest::get(SERVER_INFO_PATH)).await
    }
}
