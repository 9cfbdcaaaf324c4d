//! Token store implementations
//!
//! - [`InMemoryTokenStore`]: process memory, lost on exit
//! - [`KeychainTokenStore`]: platform keychain via `keyring`
//! - [`FileTokenStore`]: JSON file on disk

pub mod file;
pub mod keychain;
pub mod memory;

use std::sync::Arc;

use vellum_core::TokenStore;
use vellum_domain::{Result, TokenStorageConfig};

pub use file::FileTokenStore;
pub use keychain::KeychainTokenStore;
pub use memory::InMemoryTokenStore;

/// Build the token store selected by configuration.
///
/// # Errors
/// Returns `VellumError::TokenStore` if the keychain entries cannot be
/// created.
pub fn from_config(config: &TokenStorageConfig) -> Result<Arc<dyn TokenStore>> {
    Ok(match config {
        TokenStorageConfig::Memory => Arc::new(InMemoryTokenStore::new()),
        TokenStorageConfig::Keychain { service, account } => {
            Arc::new(KeychainTokenStore::new(service, account)?)
        }
        TokenStorageConfig::File { path } => Arc::new(FileTokenStore::new(path)),
    })
}
