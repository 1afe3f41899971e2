//! VID revocation failures
//!
//! Revocation cannot be undone, so a failed attempt must be reconstructable
//! from the error alone: [`RevocationContext`] records which VID, who asked,
//! and which workflow stage broke.

use std::fmt;

use resident_core_types::schema::{META_REASON, META_REQUESTER, META_STAGE, META_VID};
use resident_core_types::{RequestId, Sensitive};
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorCatalog, ErrorKind, ResidentError};
use crate::model::Metadata;

/// Step of the revocation workflow at which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationStage {
    /// Checking that the VID exists, is active, and belongs to the requester
    EligibilityCheck,
    /// Persisting the REVOKED status in the VID registry
    StatusUpdate,
    /// Revoking credentials issued against the VID
    CredentialRevocation,
    /// Notifying the resident
    Notification,
}

impl RevocationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevocationStage::EligibilityCheck => "eligibility_check",
            RevocationStage::StatusUpdate => "status_update",
            RevocationStage::CredentialRevocation => "credential_revocation",
            RevocationStage::Notification => "notification",
        }
    }
}

impl fmt::Display for RevocationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one revocation attempt
#[derive(Debug, Clone)]
pub struct RevocationContext {
    vid: Sensitive<String>,
    requester: String,
    stage: RevocationStage,
    reason: Option<String>,
    request_id: Option<RequestId>,
}

impl RevocationContext {
    pub fn new(vid: impl Into<String>, requester: impl Into<String>, stage: RevocationStage) -> Self {
        Self {
            vid: Sensitive::new(vid.into()),
            requester: requester.into(),
            stage,
            reason: None,
            request_id: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn stage(&self) -> RevocationStage {
        self.stage
    }

    /// Metadata recorded on the error
    ///
    /// The VID is stored unmasked: metadata never reaches the response
    /// envelope, and audit sinks mask it on output.
    pub fn to_metadata(&self) -> Metadata {
        let mut meta = Metadata::new()
            .with(META_VID, self.vid.expose().as_str())
            .with(META_REQUESTER, self.requester.as_str())
            .with(META_STAGE, self.stage.as_str());
        if let Some(reason) = &self.reason {
            meta.insert(META_REASON, reason.as_str());
        }
        if let Some(request_id) = &self.request_id {
            meta.insert(
                resident_core_types::schema::FIELD_REQUEST_ID,
                request_id.as_str(),
            );
        }
        meta
    }
}

impl ResidentError {
    /// Revocation failure with the catalog default message
    pub fn vid_revocation(catalog: &ErrorCatalog) -> Self {
        Self::new(catalog, ErrorKind::VidRevocation)
    }

    /// Revocation failure with a custom message
    pub fn vid_revocation_with_message(catalog: &ErrorCatalog, message: impl Into<String>) -> Self {
        Self::with_message(catalog, ErrorKind::VidRevocation, message)
    }

    /// Revocation failure with a cause and caller-defined metadata
    pub fn vid_revocation_with_cause<E>(
        catalog: &ErrorCatalog,
        message: impl Into<String>,
        cause: E,
        metadata: &Metadata,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::with_cause(catalog, ErrorKind::VidRevocation, message, cause, metadata)
    }

    /// Revocation failure described by a [`RevocationContext`]
    pub fn vid_revocation_at(
        catalog: &ErrorCatalog,
        context: &RevocationContext,
        message: impl Into<String>,
    ) -> Self {
        Self::with_metadata(
            catalog,
            ErrorKind::VidRevocation,
            message,
            &context.to_metadata(),
        )
    }

    pub fn is_vid_revocation(&self) -> bool {
        self.kind() == ErrorKind::VidRevocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_metadata_names_the_attempt() {
        let ctx = RevocationContext::new("6205860271354160", "resident-portal", RevocationStage::StatusUpdate)
            .with_reason("registry returned 409")
            .with_request_id(RequestId::from_string("req-7"));

        let meta = ctx.to_metadata();

        assert_eq!(meta.get_str(META_VID), Some("6205860271354160"));
        assert_eq!(meta.get_str(META_REQUESTER), Some("resident-portal"));
        assert_eq!(meta.get_str(META_STAGE), Some("status_update"));
        assert_eq!(meta.get_str(META_REASON), Some("registry returned 409"));
        assert_eq!(meta.get_str("request_id"), Some("req-7"));
    }

    #[test]
    fn test_context_debug_hides_vid() {
        let ctx = RevocationContext::new("6205860271354160", "portal", RevocationStage::EligibilityCheck);
        let debug_str = format!("{:?}", ctx);
        assert!(!debug_str.contains("6205860271354160"));
    }

    #[test]
    fn test_stage_serde_matches_as_str() {
        let json = serde_json::to_string(&RevocationStage::CredentialRevocation).unwrap();
        assert_eq!(json, "\"credential_revocation\"");
    }
}
