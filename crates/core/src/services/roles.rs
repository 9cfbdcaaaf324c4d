//! Permission roles

use std::sync::Arc;

use serde::Serialize;
use vellum_domain::constants::ROLES_PATH;
use vellum_domain::{Query, Result, Role};

use crate::ports::transport::{execute_unit, fetch_data, validate_key};
use crate::ports::{Transport, TransportRequest};

#[derive(Clone)]
pub struct RolesService {
    transport: Arc<dyn Transport>,
}

impl RolesService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn role_path(id: &str) -> Result<String> {
        validate_key(id)?;
        Ok(format!("{ROLES_PATH}/{id}"))
    }

    pub async fn list(&self, query: &Query) -> Result<Vec<Role>> {
        let request = TransportRequest::get(ROLES_PATH).query(query);
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn get(&self, id: &str, query: &Query) -> Result<Role> {
        let request = TransportRequest::get(Self::role_path(id)?).query(query);
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn create<B: Serialize + Sync + ?Sized>(&self, body: &B) -> Result<Role> {
        let request = TransportRequest::post(ROLES_PATH).json(body)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn update<B: Serialize + Sync + ?Sized>(&self, id: &str, body: &B) -> Result<Role> {
        let request = TransportRequest::patch(Self::role_path(id)?).json(body)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let request = TransportRequest::delete(Self::role_path(id)?);
        execute_unit(self.transport.as_ref(), request).await
    }
}
