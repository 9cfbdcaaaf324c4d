//! Test doubles for the core ports.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use vellum_core::{TokenStore, Transport, TransportRequest};
use vellum_domain::{AuthTokens, Result as DomainResult, VellumError};

/// Transport that records every request and replays queued responses.
///
/// When the queue is empty the transport answers with a network error so a
/// missing expectation fails loudly.
#[derive(Default, Clone)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    responses: Arc<Mutex<VecDeque<DomainResult<Option<Value>>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body.
    pub fn respond_with(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(Some(body)));
        self
    }

    /// Queue an empty 2xx response.
    pub fn respond_empty(self) -> Self {
        self.responses.lock().unwrap().push_back(Ok(None));
        self
    }

    pub fn fail_with(self, error: VellumError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: TransportRequest) -> DomainResult<Option<Value>> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(VellumError::Network("no response queued".into())))
    }
}

/// Minimal token store for service tests.
#[derive(Default, Clone)]
pub struct MemoryTokens {
    tokens: Arc<Mutex<Option<AuthTokens>>>,
}

impl MemoryTokens {
    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self { tokens: Arc::new(Mutex::new(Some(tokens))) }
    }

    pub fn snapshot(&self) -> Option<AuthTokens> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokens {
    async fn load(&self) -> DomainResult<Option<AuthTokens>> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn store(&self, tokens: &AuthTokens) -> DomainResult<()> {
        *self.tokens.lock().unwrap() = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> DomainResult<()> {
        *self.tokens.lock().unwrap() = None;
        Ok(())
    }
}
