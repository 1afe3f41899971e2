//! Downstream masterdata provider seam.

use async_trait::async_trait;
use resident_core::ResidentError;
use resident_core_types::RequestContext;
use serde_json::Value;

use crate::request::MasterdataRequest;

/// A source of masterdata payloads.
///
/// Implementations answer one validated request with the downstream payload,
/// passed through to the resident verbatim, or a `ResidentError` carrying the
/// failure's kind, cause and metadata. The facade never retries a call.
/// A `null` payload is read as an empty result (`{}`).
#[async_trait]
pub trait MasterdataProvider: Send + Sync {
    async fn fetch(
        &self,
        ctx: &RequestContext,
        request: &MasterdataRequest,
    ) -> Result<Value, ResidentError>;
}


/// `{}` in place of `null`, so a success envelope always carries a response
pub(crate) fn empty_if_null(payload: Value) -> Value {
    if payload.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        payload
    }
}
