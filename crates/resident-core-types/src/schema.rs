//! Canonical field keys for structured logging, audit records and error
//! metadata.

// Log fields
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Metadata keys attached to resident errors
pub const META_OPERATION: &str = "operation";
pub const META_PARAMETER: &str = "parameter";
pub const META_VALUE: &str = "value";
pub const META_TIMEOUT_MS: &str = "timeout_ms";
pub const META_HTTP_STATUS: &str = "http_status";
pub const META_DOWNSTREAM_CODE: &str = "downstream_code";
pub const META_DOWNSTREAM_MESSAGE: &str = "downstream_message";

// VID revocation context
pub const META_VID: &str = "vid";
pub const META_REQUESTER: &str = "requester";
pub const META_STAGE: &str = "stage";
pub const META_REASON: &str = "reason";

/// Metadata keys whose values identify a resident and must be masked
/// wherever they leave the process (logs, audit lines).
pub const SENSITIVE_METADATA_KEYS: &[&str] = &[META_VID, META_REQUESTER, "individual_id", "uin"];

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_FAILURE_AUDIT: &str = "failure_audit";

/// Whether a metadata key names resident-identifying data
pub fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_METADATA_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
        assert_ne!(EVENT_END_ERROR, EVENT_FAILURE_AUDIT);
    }

    #[test]
    fn test_vid_and_requester_are_sensitive() {
        assert!(is_sensitive_key(META_VID));
        assert!(is_sensitive_key(META_REQUESTER));
        assert!(!is_sensitive_key(META_STAGE));
        assert!(!is_sensitive_key(META_OPERATION));
    }
}
