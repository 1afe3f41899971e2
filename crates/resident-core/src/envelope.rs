//! Uniform response envelope returned by every proxy operation.

use serde::{Deserialize, Serialize};

use crate::errors::ResidentError;

/// Wire-visible error: code and message only
///
/// Built exclusively from a [`ResidentError`], so the code always comes from
/// the catalog. Cause and metadata stay behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(rename = "errorCode")]
    code: String,
    message: String,
}

impl ErrorEntry {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&ResidentError> for ErrorEntry {
    fn from(err: &ResidentError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.message().to_string(),
        }
    }
}

impl From<ResidentError> for ErrorEntry {
    fn from(err: ResidentError) -> Self {
        Self::from(&err)
    }
}

/// Correlation fields stamped on every envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeDefaults {
    pub id: String,
    pub version: String,
}

pub const DEFAULT_ENVELOPE_ID: &str = "1";
pub const DEFAULT_ENVELOPE_VERSION: &str = "v1";

impl Default for EnvelopeDefaults {
    fn default() -> Self {
        Self {
            id: DEFAULT_ENVELOPE_ID.to_string(),
            version: DEFAULT_ENVELOPE_VERSION.to_string(),
        }
    }
}

/// Success/error wrapper
///
/// The facade sets exactly one side: `response` on success, a single
/// `errors` entry on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub id: String,
    pub version: String,
    pub response: Option<T>,
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

impl<T> ResponseEnvelope<T> {
    pub fn success(defaults: &EnvelopeDefaults, payload: T) -> Self {
        Self {
            id: defaults.id.clone(),
            version: defaults.version.clone(),
            response: Some(payload),
            errors: Vec::new(),
        }
    }

    pub fn failure(defaults: &EnvelopeDefaults, err: &ResidentError) -> Self {
        Self {
            id: defaults.id.clone(),
            version: defaults.version.clone(),
            response: None,
            errors: vec![ErrorEntry::from(err)],
        }
    }

    pub fn from_result(defaults: &EnvelopeDefaults, result: Result<T, ResidentError>) -> Self {
        match result {
            Ok(payload) => Self::success(defaults, payload),
            Err(err) => Self::failure(defaults, &err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.response.is_some() && self.errors.is_empty()
    }

    /// Codes of all error entries, in order
    pub fn error_codes(&self) -> Vec<&str> {
        self.errors.iter().map(ErrorEntry::code).collect()
    }

    /// Split into payload or error entries.
    ///
    /// # Errors
    ///
    /// Returns the error entries when any are present, or an empty list when
    /// the envelope carries neither a payload nor errors.
    pub fn into_result(self) -> Result<T, Vec<ErrorEntry>> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        self.response.ok_or_else(Vec::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorCatalog, ErrorKind};
    use crate::model::Metadata;
    use serde_json::json;

    #[test]
    fn test_success_envelope_wire_shape() {
        let env = ResponseEnvelope::success(&EnvelopeDefaults::default(), json!({"documents": []}));
        let wire = serde_json::to_value(&env).unwrap();

        assert_eq!(
            wire,
            json!({"id": "1", "version": "v1", "response": {"documents": []}, "errors": []})
        );
    }

    #[test]
    fn test_failure_envelope_hides_metadata_and_cause() {
        let catalog = ErrorCatalog::standard();
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = ResidentError::with_cause(
            &catalog,
            ErrorKind::ApiResourceUnavailable,
            "masterdata unreachable",
            io,
            &Metadata::new().with("vid", "6205860271354160"),
        );

        let env: ResponseEnvelope<serde_json::Value> =
            ResponseEnvelope::failure(&EnvelopeDefaults::default(), &err);
        let wire = serde_json::to_string(&env).unwrap();

        assert!(wire.contains("\"errorCode\":\"RES-SER-411\""));
        assert!(wire.contains("\"response\":null"));
        assert!(!wire.contains("6205860271354160"));
        assert!(!wire.contains("socket closed"));
    }

    #[test]
    fn test_into_result_prefers_errors() {
        let catalog = ErrorCatalog::standard();
        let err = ResidentError::new(&catalog, ErrorKind::DataNotFound);
        let env: ResponseEnvelope<u32> = ResponseEnvelope::failure(&EnvelopeDefaults::default(), &err);

        let entries = env.into_result().unwrap_err();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code(), "RES-SER-418");
    }

    #[test]
    fn test_deserialize_without_errors_field() {
        let env: ResponseEnvelope<u32> =
            serde_json::from_value(json!({"id": "1", "version": "v1", "response": 5})).unwrap();
        assert!(env.is_success());
        assert_eq!(env.into_result().unwrap(), 5);
    }
}
