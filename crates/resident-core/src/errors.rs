use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Metadata;

/// Result type alias using ResidentError
pub type Result<T> = std::result::Result<T, ResidentError>;

// ========== Error Catalog ==========

/// Closed taxonomy of resident-facing failures
///
/// Each kind has exactly one entry in an [`ErrorCatalog`], which supplies the
/// stable code and default message that reach the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    // Validation
    InvalidInput,
    MissingInput,

    // Downstream
    ApiResourceUnavailable,
    ProviderTimeout,
    ProviderRejected,

    // Absence
    DataNotFound,
    SchemaNotFound,

    // Operational
    #[serde(rename = "VID_REVOCATION_EXCEPTION")]
    VidRevocation,

    // Internal
    #[serde(rename = "UNKNOWN_EXCEPTION")]
    Unknown,
}

impl ErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::InvalidInput,
        ErrorKind::MissingInput,
        ErrorKind::ApiResourceUnavailable,
        ErrorKind::ProviderTimeout,
        ErrorKind::ProviderRejected,
        ErrorKind::DataNotFound,
        ErrorKind::SchemaNotFound,
        ErrorKind::VidRevocation,
        ErrorKind::Unknown,
    ];

    /// Stable symbolic name, identical to the serde representation
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::MissingInput => "MISSING_INPUT",
            ErrorKind::ApiResourceUnavailable => "API_RESOURCE_UNAVAILABLE",
            ErrorKind::ProviderTimeout => "PROVIDER_TIMEOUT",
            ErrorKind::ProviderRejected => "PROVIDER_REJECTED",
            ErrorKind::DataNotFound => "DATA_NOT_FOUND",
            ErrorKind::SchemaNotFound => "SCHEMA_NOT_FOUND",
            ErrorKind::VidRevocation => "VID_REVOCATION_EXCEPTION",
            ErrorKind::Unknown => "UNKNOWN_EXCEPTION",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::InvalidInput | ErrorKind::MissingInput => ErrorCategory::Validation,
            ErrorKind::ApiResourceUnavailable
            | ErrorKind::ProviderTimeout
            | ErrorKind::ProviderRejected => ErrorCategory::DownstreamUnavailable,
            ErrorKind::DataNotFound | ErrorKind::SchemaNotFound => ErrorCategory::NotFound,
            ErrorKind::VidRevocation => ErrorCategory::Operational,
            ErrorKind::Unknown => ErrorCategory::Internal,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse classification of an [`ErrorKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or missing caller input, rejected before any provider call
    Validation,
    /// Provider unreachable, timed out, or refused the request
    DownstreamUnavailable,
    /// Provider explicitly reported absence
    NotFound,
    /// Domain workflow failure (e.g. VID revocation)
    Operational,
    Internal,
}

/// Code and default message registered for one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    code: String,
    message: String,
}

impl CatalogEntry {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Catalog configuration errors
///
/// These are raised while the catalog is assembled at startup, never while
/// serving a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("error kind {kind} has no catalog entry")]
    Unregistered { kind: ErrorKind },

    #[error("error kind {kind} is registered with an empty code")]
    EmptyCode { kind: ErrorKind },

    #[error("error code {code} is registered for both {first} and {second}")]
    DuplicateCode {
        code: String,
        first: ErrorKind,
        second: ErrorKind,
    },

    #[error("no error kind is registered under code {code}")]
    UnknownCode { code: String },
}

const STANDARD_ENTRIES: [(ErrorKind, &str, &str); 9] = [
    (
        ErrorKind::InvalidInput,
        "RES-SER-410",
        "Invalid Input Parameter",
    ),
    (
        ErrorKind::MissingInput,
        "RES-SER-414",
        "Missing Input Parameter",
    ),
    (
        ErrorKind::ApiResourceUnavailable,
        "RES-SER-411",
        "API resource is not available",
    ),
    (
        ErrorKind::ProviderTimeout,
        "RES-SER-412",
        "Downstream service did not respond in time",
    ),
    (
        ErrorKind::ProviderRejected,
        "RES-SER-415",
        "Downstream service rejected the request",
    ),
    (
        ErrorKind::DataNotFound,
        "RES-SER-418",
        "Requested data not found",
    ),
    (
        ErrorKind::SchemaNotFound,
        "RES-SER-419",
        "ID schema not found",
    ),
    (
        ErrorKind::VidRevocation,
        "RES-SER-407",
        "VID revocation request failed. Please visit the nearest registration center for assistance.",
    ),
    (
        ErrorKind::Unknown,
        "RES-SER-999",
        "Unknown exception occurred",
    ),
];

/// Immutable kind → (code, default message) registry
///
/// A built catalog is total over [`ErrorKind::ALL`], so [`ErrorCatalog::lookup`]
/// cannot fail. Share it behind an `Arc` and inject it where errors are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCatalog {
    // indexed by ErrorKind::index
    entries: Vec<CatalogEntry>,
}

impl ErrorCatalog {
    /// The catalog shipped with the service
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_ENTRIES
                .iter()
                .map(|(_, code, message)| CatalogEntry {
                    code: (*code).to_string(),
                    message: (*message).to_string(),
                })
                .collect(),
        }
    }

    /// Start an empty catalog
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder {
            entries: vec![None; ErrorKind::ALL.len()],
        }
    }

    /// Start from this catalog's entries, e.g. to override a few codes
    pub fn to_builder(&self) -> CatalogBuilder {
        CatalogBuilder {
            entries: self.entries.iter().cloned().map(Some).collect(),
        }
    }

    pub fn lookup(&self, kind: ErrorKind) -> &CatalogEntry {
        &self.entries[kind.index()]
    }

    pub fn code(&self, kind: ErrorKind) -> &str {
        self.lookup(kind).code()
    }

    pub fn default_message(&self, kind: ErrorKind) -> &str {
        self.lookup(kind).message()
    }

    /// Reverse lookup of a code
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownCode` if no kind carries `code`.
    pub fn kind_for_code(&self, code: &str) -> std::result::Result<ErrorKind, CatalogError> {
        ErrorKind::ALL
            .iter()
            .copied()
            .find(|kind| self.code(*kind) == code)
            .ok_or_else(|| CatalogError::UnknownCode {
                code: code.to_string(),
            })
    }

    pub fn entries(&self) -> impl Iterator<Item = (ErrorKind, &CatalogEntry)> {
        ErrorKind::ALL.iter().copied().zip(self.entries.iter())
    }
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Assembles an [`ErrorCatalog`], checking totality and code uniqueness
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    entries: Vec<Option<CatalogEntry>>,
}

impl CatalogBuilder {
    /// Register (or replace) the entry for `kind`
    pub fn register(
        mut self,
        kind: ErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.entries[kind.index()] = Some(CatalogEntry {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    /// Finish the catalog.
    ///
    /// # Errors
    ///
    /// Fails if any kind is unregistered, has a blank code, or shares its
    /// code with another kind.
    pub fn build(self) -> std::result::Result<ErrorCatalog, CatalogError> {
        let mut entries = Vec::with_capacity(ErrorKind::ALL.len());
        for (kind, slot) in ErrorKind::ALL.iter().copied().zip(self.entries) {
            let entry = slot.ok_or(CatalogError::Unregistered { kind })?;
            if entry.code.trim().is_empty() {
                return Err(CatalogError::EmptyCode { kind });
            }
            if let Some(first) = entries
                .iter()
                .position(|existing: &CatalogEntry| existing.code == entry.code)
                .map(|i| ErrorKind::ALL[i])
            {
                return Err(CatalogError::DuplicateCode {
                    code: entry.code,
                    first,
                    second: kind,
                });
            }
            entries.push(entry);
        }
        Ok(ErrorCatalog { entries })
    }
}

// ========== Resident Error ==========

type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Structured failure carried from a provider (or a validation rule) to the
/// facade boundary
///
/// Code and default message always come from an [`ErrorCatalog`]. The cause
/// and metadata are diagnostics for logging and audit; only code and message
/// reach the wire. Once built an error is never modified: add context by
/// wrapping it in a new error with [`ResidentError::wrap`].
#[derive(Debug, Clone)]
pub struct ResidentError {
    kind: ErrorKind,
    code: String,
    message: String,
    cause: Option<Cause>,
    metadata: Option<Metadata>,
}

impl ResidentError {
    /// Error with the catalog code and default message for `kind`
    pub fn new(catalog: &ErrorCatalog, kind: ErrorKind) -> Self {
        let entry = catalog.lookup(kind);
        Self {
            kind,
            code: entry.code().to_string(),
            message: entry.message().to_string(),
            cause: None,
            metadata: None,
        }
    }

    /// Error with the catalog code and a custom message
    pub fn with_message(catalog: &ErrorCatalog, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::new(catalog, kind)
        }
    }

    /// Error carrying a copy of `metadata`
    pub fn with_metadata(
        catalog: &ErrorCatalog,
        kind: ErrorKind,
        message: impl Into<String>,
        metadata: &Metadata,
    ) -> Self {
        Self {
            metadata: Some(metadata.clone()),
            ..Self::with_message(catalog, kind, message)
        }
    }

    /// Error with an explicit cause and a copy of `metadata`
    pub fn with_cause<E>(
        catalog: &ErrorCatalog,
        kind: ErrorKind,
        message: impl Into<String>,
        cause: E,
        metadata: &Metadata,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            cause: Some(Arc::new(cause)),
            ..Self::with_metadata(catalog, kind, message, metadata)
        }
    }

    /// New error of `kind` whose cause is `self`
    pub fn wrap(self, catalog: &ErrorCatalog, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            cause: Some(Arc::new(self)),
            ..Self::with_message(catalog, kind, message)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// The immediate cause, if any
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Walk the causal chain, nearest cause first
    pub fn causes(&self) -> impl Iterator<Item = &(dyn std::error::Error + 'static)> {
        let first = self
            .cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static));
        std::iter::successors(first, |e| e.source())
    }

    /// The innermost cause, if any
    pub fn root_cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes().last()
    }

    /// Find a metadata value on this error or on any wrapped `ResidentError`
    /// further down the chain.
    pub fn find_metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(key))
            .or_else(|| {
                self.causes()
                    .filter_map(|e| e.downcast_ref::<ResidentError>())
                    .find_map(|e| e.metadata().and_then(|m| m.get(key)))
            })
    }
}

impl fmt::Display for ResidentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ResidentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
