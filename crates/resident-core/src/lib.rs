//! Resident Core - error model and response contract
//!
//! This crate provides the pieces every resident-facing operation shares:
//! - A closed error taxonomy with an injectable code/message catalog
//! - `ResidentError`, carrying cause chain and diagnostic metadata
//! - VID revocation failures with workflow context
//! - The uniform response envelope
//! - Input validation rules
//! - The structured logging facility

pub mod envelope;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;
pub mod vid_revocation;

// Used by the logging macros
pub use resident_core_types;

pub use envelope::{EnvelopeDefaults, ErrorEntry, ResponseEnvelope};
pub use errors::{
    CatalogBuilder, CatalogEntry, CatalogError, ErrorCatalog, ErrorCategory, ErrorKind,
    ResidentError, Result,
};
pub use model::Metadata;
pub use vid_revocation::{RevocationContext, RevocationStage};
