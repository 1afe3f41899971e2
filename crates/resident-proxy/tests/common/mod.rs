//! Shared test fixtures for resident-proxy integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use resident_core::errors::{ErrorCatalog, ErrorKind, ResidentError};
use resident_core_types::{RequestContext, RequestId};
use resident_proxy::{MasterdataProvider, MasterdataRequest, NoopAudit, ProxyFacade};
use serde_json::Value;

/// What the provider answers with
#[derive(Clone)]
pub enum Reply {
    Payload(Value),
    Fail(ResidentError),
    /// Sleep before answering with the payload
    Slow(Duration, Value),
}

/// Provider stub that records every request it receives
pub struct RecordingProvider {
    reply: Reply,
    calls: Mutex<Vec<MasterdataRequest>>,
}

impl RecordingProvider {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn payload(payload: Value) -> Arc<Self> {
        Self::new(Reply::Payload(payload))
    }

    pub fn failing(err: ResidentError) -> Arc<Self> {
        Self::new(Reply::Fail(err))
    }

    pub fn calls(&self) -> Vec<MasterdataRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MasterdataProvider for RecordingProvider {
    async fn fetch(
        &self,
        _ctx: &RequestContext,
        request: &MasterdataRequest,
    ) -> Result<Value, ResidentError> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Payload(value) => Ok(value.clone()),
            Reply::Fail(err) => Err(err.clone()),
            Reply::Slow(delay, value) => {
                tokio::time::sleep(*delay).await;
                Ok(value.clone())
            }
        }
    }
}

pub fn standard_catalog() -> Arc<ErrorCatalog> {
    Arc::new(ErrorCatalog::standard())
}

/// Catalog whose schema-not-found code is the literal `SCHEMA_NOT_FOUND`
pub fn fixture_catalog() -> Arc<ErrorCatalog> {
    Arc::new(
        ErrorCatalog::standard()
            .to_builder()
            .register(ErrorKind::SchemaNotFound, "SCHEMA_NOT_FOUND", "No ID schema for domain/type")
            .build()
            .unwrap(),
    )
}

/// Facade over `provider` with silent audit
pub fn facade(provider: Arc<RecordingProvider>, catalog: Arc<ErrorCatalog>) -> ProxyFacade {
    ProxyFacade::builder(provider, catalog)
        .audit(Arc::new(NoopAudit))
        .build()
}

pub fn ctx(request_id: &str) -> RequestContext {
    RequestContext::with_request_id(RequestId::from_string(request_id))
}
