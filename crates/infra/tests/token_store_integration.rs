//! File-backed and configured token stores.

use chrono::{Duration, SubsecRound, Utc};
use tempfile::TempDir;
use vellum_core::TokenStore;
use vellum_domain::{AuthTokens, TokenStorageConfig, VellumError};
use vellum_infra::tokens::from_config;
use vellum_infra::FileTokenStore;

fn sample() -> AuthTokens {
    AuthTokens {
        access_token: "access".into(),
        refresh_token: Some("refresh".into()),
        expires_at: Some((Utc::now() + Duration::minutes(15)).trunc_subsecs(0)),
    }
}

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileTokenStore::new(dir.path().join("tokens.json"));

    assert_eq!(store.load().await.unwrap(), None);
    assert_eq!(store.access_token().await.unwrap(), None);
}

#[tokio::test]
async fn tokens_survive_a_new_store_instance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("tokens.json");

    FileTokenStore::new(&path).store(&sample()).await.unwrap();
    let reopened = FileTokenStore::new(&path);

    assert_eq!(reopened.load().await.unwrap(), Some(sample()));
    assert_eq!(reopened.refresh_token().await.unwrap().as_deref(), Some("refresh"));
}

#[tokio::test]
async fn clear_removes_the_file_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = FileTokenStore::new(dir.path().join("tokens.json"));
    store.store(&sample()).await.unwrap();

    store.clear().await.unwrap();
    store.clear().await.unwrap();

    assert!(!store.path().exists());
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn corrupt_file_is_a_token_store_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tokens.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = FileTokenStore::new(&path).load().await.unwrap_err();

    assert!(matches!(err, VellumError::TokenStore(_)));
}

#[tokio::test]
async fn configured_store_round_trips() {
    let dir = TempDir::new().unwrap();
    let config = TokenStorageConfig::File { path: dir.path().join("session.json") };

    let store = from_config(&config).unwrap();
    store.store(&AuthTokens::access_only("static")).await.unwrap();

    assert_eq!(from_config(&config).unwrap().load().await.unwrap(), Some(AuthTokens::access_only("static")));

    let memory = from_config(&TokenStorageConfig::Memory).unwrap();
    assert_eq!(memory.load().await.unwrap(), None);
}
