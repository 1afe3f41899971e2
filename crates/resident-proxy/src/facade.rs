//! Resident-facing masterdata proxy.
//!
//! Each operation follows the same pipeline:
//!
//! 1. log `start`
//! 2. validate raw input into a [`MasterdataRequest`]; a validation failure
//!    never reaches the provider
//! 3. exactly one provider call, bounded by the configured timeout
//! 4. on failure, hand the full error to the [`FailureAudit`]
//! 5. log `end` or `end_error`
//! 6. wrap the payload or the single error entry into a [`ResponseEnvelope`];
//!    a `null` payload becomes `{}`
//!
//! The facade holds no per-request state and never retries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use resident_core::errors::{ErrorCatalog, ErrorKind, ResidentError, Result};
use resident_core::rules::validation::require_non_blank;
use resident_core::{log_op_end, log_op_error, log_op_start};
use resident_core::{EnvelopeDefaults, Metadata, ResponseEnvelope};
use resident_core_types::schema::{META_OPERATION, META_TIMEOUT_MS};
use resident_core_types::RequestContext;
use serde_json::Value;

use crate::audit::{FailureAudit, TracingAudit};
use crate::provider::{empty_if_null, MasterdataProvider};
use crate::request::{
    param, Code, Coordinates, HierarchyLevel, LangCode, LanguageList, MasterdataRequest, Names,
    PageParams, PageRequest, SchemaQuery,
};

/// Provider call budget when none is configured
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Envelope type returned by every operation
pub type MasterdataEnvelope = ResponseEnvelope<Value>;

#[derive(Clone)]
pub struct ProxyFacade {
    provider: Arc<dyn MasterdataProvider>,
    catalog: Arc<ErrorCatalog>,
    defaults: EnvelopeDefaults,
    timeout: Duration,
    audit: Arc<dyn FailureAudit>,
}

pub struct ProxyFacadeBuilder {
    provider: Arc<dyn MasterdataProvider>,
    catalog: Arc<ErrorCatalog>,
    defaults: EnvelopeDefaults,
    timeout: Duration,
    audit: Arc<dyn FailureAudit>,
}

impl ProxyFacadeBuilder {
    pub fn defaults(mut self, defaults: EnvelopeDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn audit(mut self, audit: Arc<dyn FailureAudit>) -> Self {
        self.audit = audit;
        self
    }

    pub fn build(self) -> ProxyFacade {
        ProxyFacade {
            provider: self.provider,
            catalog: self.catalog,
            defaults: self.defaults,
            timeout: self.timeout,
            audit: self.audit,
        }
    }
}

impl ProxyFacade {
    /// Start a facade with default envelope fields, a 30 s timeout and
    /// tracing-based failure audit
    pub fn builder(
        provider: Arc<dyn MasterdataProvider>,
        catalog: Arc<ErrorCatalog>,
    ) -> ProxyFacadeBuilder {
        ProxyFacadeBuilder {
            provider,
            catalog,
            defaults: EnvelopeDefaults::default(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            audit: Arc::new(TracingAudit),
        }
    }

    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    pub fn defaults(&self) -> &EnvelopeDefaults {
        &self.defaults
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    pub async fn get_valid_document_by_lang_code(
        &self,
        ctx: &RequestContext,
        lang_code: &str,
    ) -> MasterdataEnvelope {
        self.run(ctx, "get_valid_document_by_lang_code", |catalog| {
            Ok(MasterdataRequest::ValidDocuments {
                lang_code: LangCode::parse(catalog, lang_code)?,
            })
        })
        .await
    }

    pub async fn get_location_hierarchy_level_by_lang_code(
        &self,
        ctx: &RequestContext,
        lang_code: &str,
    ) -> MasterdataEnvelope {
        self.run(ctx, "get_location_hierarchy_level_by_lang_code", |catalog| {
            Ok(MasterdataRequest::LocationHierarchyLevels {
                lang_code: LangCode::parse(catalog, lang_code)?,
            })
        })
        .await
    }

    pub async fn get_immediate_children_by_loc_code_and_lang_code(
        &self,
        ctx: &RequestContext,
        location_code: &str,
        lang_code: &str,
    ) -> MasterdataEnvelope {
        self.run(ctx, "get_immediate_children_by_loc_code_and_lang_code", |catalog| {
            Ok(MasterdataRequest::ImmediateChildren {
                location_code: Code::parse(catalog, param::LOCATION_CODE, location_code)?,
                lang_code: LangCode::parse(catalog, lang_code)?,
            })
        })
        .await
    }

    pub async fn get_location_details_by_loc_code_and_lang_code(
        &self,
        ctx: &RequestContext,
        location_code: &str,
        lang_code: &str,
    ) -> MasterdataEnvelope {
        self.run(ctx, "get_location_details_by_loc_code_and_lang_code", |catalog| {
            Ok(MasterdataRequest::LocationDetails {
                location_code: Code::parse(catalog, param::LOCATION_CODE, location_code)?,
                lang_code: LangCode::parse(catalog, lang_code)?,
            })
        })
        .await
    }

    pub async fn get_coordinate_specific_registration_centers(
        &self,
        ctx: &RequestContext,
        lang_code: &str,
        longitude: &str,
        latitude: &str,
        proximity_distance: &str,
    ) -> MasterdataEnvelope {
        self.run(ctx, "get_coordinate_specific_registration_centers", |catalog| {
            Ok(MasterdataRequest::CoordinateSpecificRegistrationCenters {
                lang_code: LangCode::parse(catalog, lang_code)?,
                coordinates: Coordinates::parse(catalog, longitude, latitude, proximity_distance)?,
            })
        })
        .await
    }

    pub async fn get_applicant_valid_document(
        &self,
        ctx: &RequestContext,
        applicant_id: &str,
        languages: &[&str],
    ) -> MasterdataEnvelope {
        self.run(ctx, "get_applicant_valid_document", |catalog| {
            Ok(MasterdataRequest::ApplicantValidDocument {
                applicant_id: Code::parse(catalog, param::APPLICANT_ID, applicant_id)?,
                languages: LanguageList::parse(catalog, languages)?,
            })
        })
        .await
    }

    pub async fn get_registration_centers_by_hierarchy_level(
        &self,
        ctx: &RequestContext,
        lang_code: &str,
        hierarchy_level: &str,
        names: &[&str],
    ) -> MasterdataEnvelope {
        self.run(ctx, "get_registration_centers_by_hierarchy_level", |catalog| {
            Ok(MasterdataRequest::RegistrationCentersByHierarchyLevel {
                lang_code: LangCode::parse(catalog, lang_code)?,
                hierarchy_level: HierarchyLevel::parse(catalog, hierarchy_level)?,
                names: Names::parse(catalog, names)?,
            })
        })
        .await
    }

    pub async fn get_registration_center_by_hierarchy_level_and_text_paginated(
        &self,
        ctx: &RequestContext,
        lang_code: &str,
        hierarchy_level: &str,
        name: &str,
        page: PageParams<'_>,
    ) -> MasterdataEnvelope {
        self.run(
            ctx,
            "get_registration_center_by_hierarchy_level_and_text_paginated",
            |catalog| {
                Ok(MasterdataRequest::RegistrationCentersPaginated {
                    lang_code: LangCode::parse(catalog, lang_code)?,
                    hierarchy_level: HierarchyLevel::parse(catalog, hierarchy_level)?,
                    name: require_non_blank(catalog, param::NAME, name)?.to_string(),
                    page: PageRequest::parse(catalog, page)?,
                })
            },
        )
        .await
    }

    pub async fn get_registration_center_working_days(
        &self,
        ctx: &RequestContext,
        registration_center_id: &str,
        lang_code: &str,
    ) -> MasterdataEnvelope {
        self.run(ctx, "get_registration_center_working_days", |catalog| {
            Ok(MasterdataRequest::RegistrationCenterWorkingDays {
                registration_center_id: Code::parse(
                    catalog,
                    param::REGISTRATION_CENTER_ID,
                    registration_center_id,
                )?,
                lang_code: LangCode::parse(catalog, lang_code)?,
            })
        })
        .await
    }

    pub async fn get_latest_id_schema(
        &self,
        ctx: &RequestContext,
        schema_version: &str,
        domain: &str,
        schema_type: &str,
    ) -> MasterdataEnvelope {
        self.run(ctx, "get_latest_id_schema", |catalog| {
            Ok(MasterdataRequest::LatestIdSchema {
                query: SchemaQuery::parse(catalog, schema_version, domain, schema_type)?,
            })
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    async fn run<F>(&self, ctx: &RequestContext, op: &'static str, validate: F) -> MasterdataEnvelope
    where
        F: FnOnce(&ErrorCatalog) -> Result<MasterdataRequest>,
    {
        log_op_start!(op, request_id = ctx.request_id.as_str());
        let start = Instant::now();

        let result = match validate(&self.catalog) {
            Ok(request) => self.call(ctx, op, &request).await.map(empty_if_null),
            Err(err) => Err(err),
        };

        let elapsed = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => log_op_end!(op, duration_ms = elapsed, request_id = ctx.request_id.as_str()),
            Err(err) => {
                self.audit.record(op, ctx, err);
                log_op_error!(op, err, duration_ms = elapsed, request_id = ctx.request_id.as_str());
            }
        }

        ResponseEnvelope::from_result(&self.defaults, result)
    }

    async fn call(
        &self,
        ctx: &RequestContext,
        op: &str,
        request: &MasterdataRequest,
    ) -> Result<Value> {
        match tokio::time::timeout(self.timeout, self.provider.fetch(ctx, request)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(self.timeout_error(op)),
        }
    }

    fn timeout_error(&self, operation: &str) -> ResidentError {
        let timeout_ms = self.timeout.as_millis() as u64;
        ResidentError::with_metadata(
            &self.catalog,
            ErrorKind::ProviderTimeout,
            format!(
                "{} after {} ms",
                self.catalog.default_message(ErrorKind::ProviderTimeout),
                timeout_ms
            ),
            &Metadata::new()
                .with(META_OPERATION, operation)
                .with(META_TIMEOUT_MS, timeout_ms),
        )
    }
}
