use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use vellum_core::TokenStore;
use vellum_domain::{AuthTokens, Result, VellumError};

/// Token store persisted as a JSON file.
///
/// The whole file is rewritten on every store. A missing file reads as no
/// tokens and clearing removes the file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, action: &str, err: &std::io::Error) -> VellumError {
        VellumError::TokenStore(format!("Failed to {action} {}: {err}", self.path.display()))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<AuthTokens>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error("read", &err)),
        };

        let tokens = serde_json::from_str(&contents).map_err(|err| {
            VellumError::TokenStore(format!("Corrupt token file {}: {err}", self.path.display()))
        })?;
        Ok(Some(tokens))
    }

    async fn store(&self, tokens: &AuthTokens) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error("create directory for", &err))?;
        }

        let json = serde_json::to_vec_pretty(tokens)?;
        tokio::fs::write(&self.path, json).await.map_err(|err| self.io_error("write", &err))?;

        debug!(path = %self.path.display(), "tokens written");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error("remove", &err)),
        }
    }
}
