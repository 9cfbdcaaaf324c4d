//! Entry point bundling the transport and token store

use std::sync::Arc;

use vellum_domain::Result;

use crate::ports::{TokenStore, Transport};
use crate::services::{
    AuthService, FilesService, GraphqlService, ItemsService, RolesService, ServerService,
    UsersService,
};

/// CMS client handing out typed services.
///
/// Cloning is cheap; all clones share the transport and token store.
#[derive(Clone)]
pub struct CmsClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl CmsClient {
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.transport.clone(), self.tokens.clone())
    }

    /// Item operations on `collection`.
    ///
    /// # Errors
    /// Returns `VellumError::InvalidInput` for an invalid collection name.
    pub fn items(&self, collection: &str) -> Result<ItemsService> {
        ItemsService::new(self.transport.clone(), collection)
    }

    pub fn users(&self) -> UsersService {
        UsersService::new(self.transport.clone())
    }

    pub fn roles(&self) -> RolesService {
        RolesService::new(self.transport.clone())
    }

    pub fn files(&self) -> FilesService {
        FilesService::new(self.transport.clone())
    }

    pub fn graphql(&self) -> GraphqlService {
        GraphqlService::new(self.transport.clone())
    }

    pub fn server(&self) -> ServerService {
        ServerService::new(self.transport.clone())
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        self.tokens.clone()
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }
}
