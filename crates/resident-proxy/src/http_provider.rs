//! Masterdata provider backed by the masterdata REST service.
//!
//! Downstream responses use the same wrapper as the resident envelope:
//! `{id, version, response, errors: [{errorCode, message}]}`. The payload is
//! passed through untouched; failures are translated into catalog kinds:
//!
//! | downstream outcome          | kind                         |
//! |-----------------------------|------------------------------|
//! | connect/transport failure   | `API_RESOURCE_UNAVAILABLE`   |
//! | client timeout              | `PROVIDER_TIMEOUT`           |
//! | HTTP 404                    | `DATA_NOT_FOUND` / `SCHEMA_NOT_FOUND` |
//! | other non-2xx, bad body     | `API_RESOURCE_UNAVAILABLE`   |
//! | non-empty `errors` list     | `PROVIDER_REJECTED`          |
//!
//! A non-2xx body that still carries the wrapper contributes its first
//! downstream error as `downstream_code`/`downstream_message` metadata.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use resident_core::errors::{ErrorCatalog, ErrorKind, ResidentError, Result};
use resident_core::Metadata;
use resident_core_types::schema::{
    META_DOWNSTREAM_CODE, META_DOWNSTREAM_MESSAGE, META_HTTP_STATUS, META_OPERATION,
};
use resident_core_types::RequestContext;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{ConfigError, ProviderConfig};
use crate::provider::{empty_if_null, MasterdataProvider};
use crate::request::{param, MasterdataRequest};

/// Header carrying the resident request id downstream
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

pub struct HttpMasterdataProvider {
    client: reqwest::Client,
    base_url: Url,
    catalog: Arc<ErrorCatalog>,
}

#[derive(Debug, Deserialize)]
struct DownstreamWrapper {
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<DownstreamError>>,
}

#[derive(Debug, Deserialize)]
struct DownstreamError {
    #[serde(rename = "errorCode")]
    code: String,
    #[serde(default)]
    message: String,
}

impl HttpMasterdataProvider {
    /// # Errors
    ///
    /// Fails when the base url does not parse or cannot carry a path, or the
    /// HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        catalog: Arc<ErrorCatalog>,
    ) -> std::result::Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "cannot carry a path".to_string(),
            });
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            catalog,
        })
    }

    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn from_config(
        config: &ProviderConfig,
        catalog: Arc<ErrorCatalog>,
    ) -> std::result::Result<Self, ConfigError> {
        Self::new(
            &config.base_url,
            Duration::from_millis(config.timeout_ms),
            catalog,
        )
    }

    /// Downstream url for `request`
    pub fn route(&self, request: &MasterdataRequest) -> Url {
        route(&self.base_url, request)
    }

    fn unavailable(&self, op: &str, message: String, metadata: Metadata) -> ResidentError {
        ResidentError::with_metadata(
            &self.catalog,
            ErrorKind::ApiResourceUnavailable,
            message,
            &metadata.with(META_OPERATION, op),
        )
    }

    fn translate_transport(&self, op: &str, err: reqwest::Error) -> ResidentError {
        let kind = if err.is_timeout() {
            ErrorKind::ProviderTimeout
        } else {
            ErrorKind::ApiResourceUnavailable
        };
        let message = self.catalog.default_message(kind).to_string();
        ResidentError::with_cause(
            &self.catalog,
            kind,
            message,
            err,
            &Metadata::new().with(META_OPERATION, op),
        )
    }

    fn translate_status(
        &self,
        request: &MasterdataRequest,
        status: StatusCode,
        body: &[u8],
    ) -> ResidentError {
        let op = request.operation();
        let mut metadata = Metadata::new()
            .with(META_OPERATION, op)
            .with(META_HTTP_STATUS, status.as_u16());
        if let Some(first) = first_downstream_error(body) {
            metadata = with_downstream(metadata, &first);
        }
        if status == StatusCode::NOT_FOUND {
            let kind = match request {
                MasterdataRequest::LatestIdSchema { .. } => ErrorKind::SchemaNotFound,
                _ => ErrorKind::DataNotFound,
            };
            let message = self.catalog.default_message(kind).to_string();
            return ResidentError::with_metadata(&self.catalog, kind, message, &metadata);
        }
        self.unavailable(
            op,
            format!(
                "{} (HTTP {})",
                self.catalog.default_message(ErrorKind::ApiResourceUnavailable),
                status.as_u16()
            ),
            metadata,
        )
    }

    fn decode(&self, op: &str, body: &[u8]) -> Result<Value> {
        let wrapper: DownstreamWrapper = serde_json::from_slice(body).map_err(|e| {
            ResidentError::with_cause(
                &self.catalog,
                ErrorKind::ApiResourceUnavailable,
                "Malformed masterdata response",
                e,
                &Metadata::new().with(META_OPERATION, op),
            )
        })?;

        if let Some(first) = wrapper.errors.as_ref().and_then(|errors| errors.first()) {
            return Err(ResidentError::with_metadata(
                &self.catalog,
                ErrorKind::ProviderRejected,
                self.catalog.default_message(ErrorKind::ProviderRejected).to_string(),
                &with_downstream(Metadata::new().with(META_OPERATION, op), first),
            ));
        }

        Ok(empty_if_null(wrapper.response.unwrap_or(Value::Null)))
    }
}

/// First entry of the downstream `errors` list, if `body` is a wrapper at all
fn first_downstream_error(body: &[u8]) -> Option<DownstreamError> {
    let wrapper: DownstreamWrapper = serde_json::from_slice(body).ok()?;
    wrapper.errors?.into_iter().next()
}

fn with_downstream(metadata: Metadata, error: &DownstreamError) -> Metadata {
    metadata
        .with(META_DOWNSTREAM_CODE, error.code.as_str())
        .with(META_DOWNSTREAM_MESSAGE, error.message.as_str())
}

#[async_trait]
impl MasterdataProvider for HttpMasterdataProvider {
    async fn fetch(&self, ctx: &RequestContext, request: &MasterdataRequest) -> Result<Value> {
        let op = request.operation();
        let url = self.route(request);
        tracing::debug!(op = op, url = %url, request_id = ctx.request_id.as_str(), "masterdata request");

        let response = self
            .client
            .get(url)
            .header(REQUEST_ID_HEADER, ctx.request_id.as_str())
            .send()
            .await
            .map_err(|e| self.translate_transport(op, e))?;

        let status = response.status();
        if !status.is_success() {
            // the status alone decides the kind; an unreadable body only loses detail
            let body = response.bytes().await.unwrap_or_default();
            return Err(self.translate_status(request, status, &body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.translate_transport(op, e))?;
        self.decode(op, &body)
    }
}

/// Masterdata REST route for `request`, relative to `base`
pub fn route(base: &Url, request: &MasterdataRequest) -> Url {
    let mut query: Vec<(&str, String)> = Vec::new();
    let segments: Vec<String> = match request {
        MasterdataRequest::ValidDocuments { lang_code } => {
            vec!["validdocuments".into(), lang_code.to_string()]
        }
        MasterdataRequest::LocationHierarchyLevels { lang_code } => {
            vec!["locationHierarchyLevels".into(), lang_code.to_string()]
        }
        MasterdataRequest::ImmediateChildren {
            location_code,
            lang_code,
        } => vec![
            "locations".into(),
            "immediatechildren".into(),
            location_code.to_string(),
            lang_code.to_string(),
        ],
        MasterdataRequest::LocationDetails {
            location_code,
            lang_code,
        } => vec![
            "locations".into(),
            "info".into(),
            location_code.to_string(),
            lang_code.to_string(),
        ],
        MasterdataRequest::CoordinateSpecificRegistrationCenters {
            lang_code,
            coordinates,
        } => {
            let [longitude, latitude, distance] = coordinates.as_text();
            vec![
                "getcoordinatespecificregistrationcenters".into(),
                lang_code.to_string(),
                longitude.to_string(),
                latitude.to_string(),
                distance.to_string(),
            ]
        }
        MasterdataRequest::ApplicantValidDocument {
            applicant_id,
            languages,
        } => {
            query.push((param::LANGUAGES, languages.joined()));
            vec![
                "applicanttype".into(),
                applicant_id.to_string(),
                "languages".into(),
            ]
        }
        MasterdataRequest::RegistrationCentersByHierarchyLevel {
            lang_code,
            hierarchy_level,
            names,
        } => {
            query.extend(names.as_slice().iter().map(|n| (param::NAME, n.clone())));
            vec![
                "registrationcenters".into(),
                lang_code.to_string(),
                hierarchy_level.value().to_string(),
                "names".into(),
            ]
        }
        MasterdataRequest::RegistrationCentersPaginated {
            lang_code,
            hierarchy_level,
            name,
            page,
        } => {
            query.push((param::PAGE_NUMBER, page.page_number().to_string()));
            query.push((param::PAGE_SIZE, page.page_size().to_string()));
            query.push((param::ORDER_BY, page.order_by_text().to_string()));
            query.push((param::SORT_BY, page.sort_by().to_string()));
            vec![
                "registrationcenters".into(),
                "page".into(),
                lang_code.to_string(),
                hierarchy_level.value().to_string(),
                name.clone(),
            ]
        }
        MasterdataRequest::RegistrationCenterWorkingDays {
            registration_center_id,
            lang_code,
        } => vec![
            "workingdays".into(),
            registration_center_id.to_string(),
            lang_code.to_string(),
        ],
        MasterdataRequest::LatestIdSchema { query: schema } => {
            query.push((param::SCHEMA_VERSION, schema.version_text().to_string()));
            query.push((param::DOMAIN, schema.domain().to_string()));
            query.push((param::TYPE, schema.schema_type().to_string()));
            vec!["idschema".into(), "latest".into()]
        }
    };

    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(&segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}
