//! CRUD on the records of a single collection

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use vellum_domain::constants::ITEMS_PATH;
use vellum_domain::{ListResponse, Query, Result, VellumError};

use crate::ports::transport::{execute_unit, fetch_data, fetch_envelope, validate_key};
use crate::ports::{Transport, TransportRequest};

static COLLECTION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("COLLECTION_NAME should compile - this is a bug")
});

/// Item operations for one collection.
///
/// Records are generic: pass your own `Deserialize` type, or
/// `serde_json::Value` for untyped access.
#[derive(Clone)]
pub struct ItemsService {
    transport: Arc<dyn Transport>,
    collection: String,
    base_path: String,
}

impl ItemsService {
    /// # Errors
    /// Returns `VellumError::InvalidInput` unless `collection` matches
    /// `[A-Za-z0-9_-]+`.
    pub fn new(transport: Arc<dyn Transport>, collection: impl Into<String>) -> Result<Self> {
        let collection = collection.into();
        if !COLLECTION_NAME.is_match(&collection) {
            return Err(VellumError::InvalidInput(format!("Invalid collection name '{collection}'")));
        }

        let base_path = format!("{ITEMS_PATH}/{collection}");
        Ok(Self { transport, collection, base_path })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn item_path(&self, id: &str) -> Result<String> {
        validate_key(id)?;
        Ok(format!("{}/{id}", self.base_path))
    }

    #[instrument(skip(self, query), fields(collection = %self.collection))]
    pub async fn list<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>> {
        let request = TransportRequest::get(&self.base_path).query(query);
        let items: Vec<T> = fetch_data(self.transport.as_ref(), request).await?;
        debug!(count = items.len(), "items listed");
        Ok(items)
    }

    /// List items together with the `meta` counts requested by `query`.
    pub async fn list_with_meta<T: DeserializeOwned>(&self, query: &Query) -> Result<ListResponse<T>> {
        let request = TransportRequest::get(&self.base_path).query(query);
        fetch_envelope(self.transport.as_ref(), request).await
    }

    #[instrument(skip(self, query), fields(collection = %self.collection))]
    pub async fn get<T: DeserializeOwned>(&self, id: &str, query: &Query) -> Result<T> {
        let request = TransportRequest::get(self.item_path(id)?).query(query);
        fetch_data(self.transport.as_ref(), request).await
    }

    #[instrument(skip(self, body), fields(collection = %self.collection))]
    pub async fn create<T, B>(&self, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let request = TransportRequest::post(&self.base_path).json(body)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn create_many<T, B>(&self, bodies: &[B]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let request = TransportRequest::post(&self.base_path).json(bodies)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    /// Partially update an item; only the fields present in `body` change.
    #[instrument(skip(self, body), fields(collection = %self.collection))]
    pub async fn update<T, B>(&self, id: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let request = TransportRequest::patch(self.item_path(id)?).json(body)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let request = TransportRequest::delete(self.item_path(id)?);
        execute_unit(self.transport.as_ref(), request).await
    }

    /// Delete several items by primary key in one request.
    pub async fn delete_many(&self, ids: &[&str]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let request = TransportRequest::delete(&self.base_path).json(ids)?;
        execute_unit(self.transport.as_ref(), request).await
    }
}
