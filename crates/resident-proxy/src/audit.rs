//! Failure audit.
//!
//! The envelope only exposes `{errorCode, message}`. Cause chains and
//! metadata are handed to a [`FailureAudit`] before the error is reduced to
//! its wire form, so operators keep the full diagnostic context.

use resident_core::{Metadata, ResidentError};
use resident_core_types::schema::{is_sensitive_key, EVENT_FAILURE_AUDIT};
use resident_core_types::{mask, RequestContext};
use serde_json::Value;

pub trait FailureAudit: Send + Sync {
    /// Called once per failed operation, before envelope translation
    fn record(&self, operation: &str, ctx: &RequestContext, err: &ResidentError);
}

/// Emits one `warn` event per failure with masked metadata and the
/// rendered cause chain
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudit;

impl FailureAudit for TracingAudit {
    fn record(&self, operation: &str, ctx: &RequestContext, err: &ResidentError) {
        let metadata = err.metadata().map(masked).unwrap_or_default();
        let metadata = serde_json::to_string(&metadata).unwrap_or_default();
        let causes = render_causes(err);
        let trace_id = ctx.trace_id.as_ref().map(|t| t.as_str()).unwrap_or("");

        tracing::warn!(
            component = module_path!(),
            op = operation,
            event = EVENT_FAILURE_AUDIT,
            request_id = ctx.request_id.as_str(),
            trace_id = trace_id,
            err.kind = err.kind().name(),
            err.code = err.code(),
            metadata = metadata.as_str(),
            causes = causes.as_str(),
        );
    }
}

/// Discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAudit;

impl FailureAudit for NoopAudit {
    fn record(&self, _operation: &str, _ctx: &RequestContext, _err: &ResidentError) {}
}

/// Copy of `metadata` with sensitive values masked to their last four
/// characters, at any depth of nested objects and arrays
pub fn masked(metadata: &Metadata) -> Metadata {
    metadata
        .iter()
        .map(|(key, value)| (key.clone(), mask_value(key, value)))
        .collect()
}

fn mask_value(key: &str, value: &Value) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) => Value::String(mask(s)),
        Value::Number(n) if is_sensitive_key(key) => Value::String(mask(&n.to_string())),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), mask_value(k, v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| mask_value(key, v)).collect()),
        other => other.clone(),
    }
}

/// Raw sensitive values held in metadata anywhere along `err`'s chain
fn sensitive_values(err: &ResidentError) -> Vec<String> {
    fn collect(key: &str, value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) if is_sensitive_key(key) => out.push(s.clone()),
            Value::Number(n) if is_sensitive_key(key) => out.push(n.to_string()),
            Value::Object(map) => map.iter().for_each(|(k, v)| collect(k, v, out)),
            Value::Array(items) => items.iter().for_each(|v| collect(key, v, out)),
            _ => {}
        }
    }

    let mut out = Vec::new();
    let chain = std::iter::once(err)
        .chain(err.causes().filter_map(|e| e.downcast_ref::<ResidentError>()));
    for e in chain {
        for (key, value) in e.metadata().into_iter().flat_map(|m| m.iter()) {
            collect(key, value, &mut out);
        }
    }
    out.retain(|v| !v.is_empty());
    // longest first, so a value is never partly replaced by a shorter one
    out.sort_by_key(|v| std::cmp::Reverse(v.len()));
    out.dedup();
    out
}

/// Cause chain rendered as `a <- b <- c`, innermost last.
///
/// Sensitive metadata values found along the chain are masked wherever they
/// appear in a cause message. An identifier that only appears in message
/// text, with no metadata entry, is rendered as is.
pub fn render_causes(err: &ResidentError) -> String {
    let rendered = err
        .causes()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(" <- ");
    sensitive_values(err)
        .iter()
        .fold(rendered, |text, secret| text.replace(secret.as_str(), &mask(secret)))
}
