//! File metadata, uploads and imports

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};
use vellum_domain::constants::FILES_PATH;
use vellum_domain::{FileImport, FileRecord, FileUpload, Query, Result, VellumError};

use crate::ports::transport::{execute_unit, fetch_data, validate_key};
use crate::ports::{Transport, TransportRequest};

#[derive(Clone)]
pub struct FilesService {
    transport: Arc<dyn Transport>,
}

impl FilesService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn file_path(id: &str) -> Result<String> {
        validate_key(id)?;
        Ok(format!("{FILES_PATH}/{id}"))
    }

    pub async fn list(&self, query: &Query) -> Result<Vec<FileRecord>> {
        let request = TransportRequest::get(FILES_PATH).query(query);
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn get(&self, id: &str, query: &Query) -> Result<FileRecord> {
        let request = TransportRequest::get(Self::file_path(id)?).query(query);
        fetch_data(self.transport.as_ref(), request).await
    }

    /// Upload a file as `multipart/form-data`.
    ///
    /// # Errors
    /// Returns `VellumError::InvalidInput` for an empty file name.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
    pub async fn upload(&self, upload: FileUpload) -> Result<FileRecord> {
        if upload.file_name.trim().is_empty() {
            return Err(VellumError::InvalidInput("File name must not be empty".into()));
        }

        let request = TransportRequest::post(FILES_PATH).multipart(upload);
        let record: FileRecord = fetch_data(self.transport.as_ref(), request).await?;

        info!(file_id = %record.id, "file uploaded");
        Ok(record)
    }

    /// Let the server download a file from `url`.
    #[instrument(skip(self, import), fields(url = %import.url))]
    pub async fn import_url(&self, import: &FileImport) -> Result<FileRecord> {
        let request = TransportRequest::post(format!("{FILES_PATH}/import")).json(import)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    /// Update file metadata such as `title` or `folder`.
    pub async fn update<B: Serialize + Sync + ?Sized>(&self, id: &str, body: &B) -> Result<FileRecord> {
        let request = TransportRequest::patch(Self::file_path(id)?).json(body)?;
        fetch_data(self.transport.as_ref(), request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let request = TransportRequest::delete(Self::file_path(id)?);
        execute_unit(self.transport.as_ref(), request).await
    }
}
