//! User records and the current user's profile

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;
use vellum_domain::constants::USERS_PATH;
use vellum_domain::{Query, RegisterRequest, Result, User};

use crate::ports::transport::{execute_unit, fetch_data, validate_key};
use crate::ports::{Transport, TransportRequest};

#[derive(Clone)]
pub struct UsersService {
    transport: Arc<dyn Transport>,
}

impl UsersService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn user_path(id: &str) -> Result<String> {
        validate_key(id)?;
        Ok(format!("{USERS_PATH}/{id}"))
    }

    /// The user the current access token belongs to.
    #[instrument(skip(self, query))]
    pub async fn me(&self, query: &Query) -> Result<User> {
        let request = TransportRequest::get(format!("{USERS_PATH}/me")).query(query);
        fetch_data(self.transport.as_ref(), request).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_me<B: Serialize + Sync + ?Sized>(&self, body: &B) -> Result<User> {
        let request = TransportRequest::patch(format!("{USERS_PATH}/me")).json(body)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn get(&self, id: &str, query: &Query) -> Result<User> {
        let request = TransportRequest::get(Self::user_path(id)?).query(query);
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn list(&self, query: &Query) -> Result<Vec<User>> {
        let request = TransportRequest::get(USERS_PATH).query(query);
        fetch_data(self.transport.as_ref(), request).await
    }

    /// Create a user (admin operation).
    pub async fn create<B: Serialize + Sync + ?Sized>(&self, body: &B) -> Result<User> {
        let request = TransportRequest::post(USERS_PATH).json(body)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn update<B: Serialize + Sync + ?Sized>(&self, id: &str, body: &B) -> Result<User> {
        let request = TransportRequest::patch(Self::user_path(id)?).json(body)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let request = TransportRequest::delete(Self::user_path(id)?);
        execute_unit(self.transport.as_ref(), request).await
    }

    /// Public self-registration. The server answers without a body.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &RegisterRequest) -> Result<()> {
        let request =
            TransportRequest::post(format!("{USERS_PATH}/register")).json(registration)?.anonymous();
        execute_unit(self.transport.as_ref(), request).await
    }
}
