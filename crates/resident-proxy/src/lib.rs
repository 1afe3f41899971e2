//! Resident Proxy - masterdata facade
//!
//! Resident-facing read operations proxied onto a masterdata provider. Every
//! operation validates its input, makes at most one provider call and answers
//! with a [`ResponseEnvelope`](resident_core::ResponseEnvelope).

pub mod audit;
pub mod config;
pub mod facade;
pub mod http_provider;
pub mod provider;
pub mod request;

pub use audit::{FailureAudit, NoopAudit, TracingAudit};
pub use config::{ConfigError, ProxyConfig};
pub use facade::{MasterdataEnvelope, ProxyFacade, ProxyFacadeBuilder, DEFAULT_PROVIDER_TIMEOUT};
pub use http_provider::HttpMasterdataProvider;
pub use provider::MasterdataProvider;
pub use request::{MasterdataRequest, PageParams};
