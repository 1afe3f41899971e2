//! Validated masterdata request model.
//!
//! Every facade operation turns raw resident input into one
//! [`MasterdataRequest`] before any provider is contacted. The parameter
//! types below can only be built through their `parse` constructors, so a
//! request that reaches a provider is well formed by construction.

use std::fmt;

use resident_core::errors::{ErrorCatalog, Result};
use resident_core::rules::validation::{
    invalid, missing, parse_in_range, parse_number, require_non_blank, require_token,
};

/// Wire names of the resident-facing parameters.
pub mod param {
    pub const LANG_CODE: &str = "langCode";
    pub const LOCATION_CODE: &str = "locationCode";
    pub const LONGITUDE: &str = "longitude";
    pub const LATITUDE: &str = "latitude";
    pub const PROXIMITY_DISTANCE: &str = "proximityDistance";
    pub const APPLICANT_ID: &str = "applicantId";
    pub const LANGUAGES: &str = "languages";
    pub const HIERARCHY_LEVEL: &str = "hierarchyLevel";
    pub const NAME: &str = "name";
    pub const PAGE_NUMBER: &str = "pageNumber";
    pub const PAGE_SIZE: &str = "pageSize";
    pub const ORDER_BY: &str = "orderBy";
    pub const SORT_BY: &str = "sortBy";
    pub const REGISTRATION_CENTER_ID: &str = "registrationCenterId";
    pub const SCHEMA_VERSION: &str = "schemaVersion";
    pub const DOMAIN: &str = "domain";
    pub const TYPE: &str = "type";
}

// ---------------------------------------------------------------------------
// Scalar parameters
// ---------------------------------------------------------------------------

/// Language code such as `eng` or `ara`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangCode(String);

impl LangCode {
    /// # Errors
    ///
    /// `MissingInput` when blank, `InvalidInput` for anything but ASCII letters.
    pub fn parse(catalog: &ErrorCatalog, value: &str) -> Result<Self> {
        Self::parse_named(catalog, param::LANG_CODE, value)
    }

    fn parse_named(catalog: &ErrorCatalog, parameter: &str, value: &str) -> Result<Self> {
        let code = require_non_blank(catalog, parameter, value)?;
        if !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(catalog, parameter, value, "must contain only ASCII letters"));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-token identifier: location code, applicant type, center id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code(String);

impl Code {
    /// # Errors
    ///
    /// `MissingInput` when blank, `InvalidInput` when it contains whitespace.
    pub fn parse(catalog: &ErrorCatalog, parameter: &str, value: &str) -> Result<Self> {
        require_token(catalog, parameter, value).map(|token| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location hierarchy level (0 = country)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyLevel(u16);

impl HierarchyLevel {
    /// # Errors
    ///
    /// `MissingInput` when blank, `InvalidInput` when not a small non-negative integer.
    pub fn parse(catalog: &ErrorCatalog, value: &str) -> Result<Self> {
        parse_number(catalog, param::HIERARCHY_LEVEL, value).map(Self)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Compound parameters
// ---------------------------------------------------------------------------

/// Range-checked decimal that remembers the text it was parsed from.
///
/// Downstream routes carry the resident's trimmed input, not a re-rendered
/// float (`12.97160` stays `12.97160`).
#[derive(Debug, Clone, PartialEq)]
pub struct Decimal {
    value: f64,
    text: String,
}

impl Decimal {
    fn parse(catalog: &ErrorCatalog, parameter: &str, raw: &str, min: f64, max: f64) -> Result<Self> {
        let value = parse_in_range(catalog, parameter, raw, min, max)?;
        Ok(Self {
            value,
            text: raw.trim().to_string(),
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Search point and radius for nearby registration centers
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    longitude: Decimal,
    latitude: Decimal,
    proximity_distance: Decimal,
}

impl Coordinates {
    /// # Errors
    ///
    /// `InvalidInput` when longitude is outside [-180, 180], latitude outside
    /// [-90, 90] or the distance is negative; `MissingInput` for blanks.
    pub fn parse(
        catalog: &ErrorCatalog,
        longitude: &str,
        latitude: &str,
        proximity_distance: &str,
    ) -> Result<Self> {
        Ok(Self {
            longitude: Decimal::parse(catalog, param::LONGITUDE, longitude, -180.0, 180.0)?,
            latitude: Decimal::parse(catalog, param::LATITUDE, latitude, -90.0, 90.0)?,
            proximity_distance: Decimal::parse(
                catalog,
                param::PROXIMITY_DISTANCE,
                proximity_distance,
                0.0,
                f64::MAX,
            )?,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude.value()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude.value()
    }

    pub fn proximity_distance(&self) -> f64 {
        self.proximity_distance.value()
    }

    /// Longitude, latitude and distance as the resident wrote them
    pub fn as_text(&self) -> [&str; 3] {
        [
            self.longitude.as_str(),
            self.latitude.as_str(),
            self.proximity_distance.as_str(),
        ]
    }
}

/// Non-empty list of language codes
///
/// Each raw entry may itself be comma separated (`"eng,ara"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageList(Vec<LangCode>);

impl LanguageList {
    /// # Errors
    ///
    /// `MissingInput` when no language is given, `InvalidInput` when any entry
    /// is not a language code.
    pub fn parse(catalog: &ErrorCatalog, values: &[&str]) -> Result<Self> {
        let codes = values
            .iter()
            .flat_map(|v| v.split(','))
            .filter(|v| !v.trim().is_empty())
            .map(|v| LangCode::parse_named(catalog, param::LANGUAGES, v))
            .collect::<Result<Vec<_>>>()?;
        if codes.is_empty() {
            return Err(missing(catalog, param::LANGUAGES));
        }
        Ok(Self(codes))
    }

    pub fn codes(&self) -> &[LangCode] {
        &self.0
    }

    /// Comma-joined form used on the downstream wire
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(LangCode::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Non-empty list of location names; names may contain spaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names(Vec<String>);

impl Names {
    /// # Errors
    ///
    /// `MissingInput` when no non-blank name is given.
    pub fn parse(catalog: &ErrorCatalog, values: &[&str]) -> Result<Self> {
        let names: Vec<String> = values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(missing(catalog, param::NAME));
        }
        Ok(Self(names))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw pagination input as received from the resident
#[derive(Debug, Clone, Copy)]
pub struct PageParams<'a> {
    pub page_number: &'a str,
    pub page_size: &'a str,
    pub order_by: &'a str,
    pub sort_by: &'a str,
}

/// Validated pagination: zero-based page, positive size
///
/// The order is matched case-insensitively but forwarded in the caller's
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
    order_by: SortOrder,
    order_by_text: String,
    sort_by: String,
}

impl PageRequest {
    /// # Errors
    ///
    /// `MissingInput` for blank fields; `InvalidInput` for a negative or
    /// non-numeric page number, a zero page size, an order other than
    /// asc/desc, or a sort field containing whitespace.
    pub fn parse(catalog: &ErrorCatalog, raw: PageParams<'_>) -> Result<Self> {
        let page_number: u32 = parse_number(catalog, param::PAGE_NUMBER, raw.page_number)?;
        let page_size: u32 = parse_number(catalog, param::PAGE_SIZE, raw.page_size)?;
        if page_size == 0 {
            return Err(invalid(catalog, param::PAGE_SIZE, raw.page_size, "must be at least 1"));
        }
        let order = require_non_blank(catalog, param::ORDER_BY, raw.order_by)?;
        let order_by = if order.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else if order.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            return Err(invalid(catalog, param::ORDER_BY, raw.order_by, "must be asc or desc"));
        };
        let sort_by = require_token(catalog, param::SORT_BY, raw.sort_by)?.to_string();

        Ok(Self {
            page_number,
            page_size,
            order_by,
            order_by_text: order.to_string(),
            sort_by,
        })
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn order_by(&self) -> SortOrder {
        self.order_by
    }

    /// `orderBy` exactly as received, trimmed
    pub fn order_by_text(&self) -> &str {
        &self.order_by_text
    }

    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }
}

/// ID schema selector
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaQuery {
    version: Decimal,
    domain: String,
    schema_type: String,
}

impl SchemaQuery {
    /// # Errors
    ///
    /// `InvalidInput` for a negative or non-numeric version, `MissingInput`
    /// for a blank version, domain or type.
    pub fn parse(catalog: &ErrorCatalog, version: &str, domain: &str, schema_type: &str) -> Result<Self> {
        Ok(Self {
            version: Decimal::parse(catalog, param::SCHEMA_VERSION, version, 0.0, f64::MAX)?,
            domain: require_non_blank(catalog, param::DOMAIN, domain)?.to_string(),
            schema_type: require_non_blank(catalog, param::TYPE, schema_type)?.to_string(),
        })
    }

    pub fn version(&self) -> f64 {
        self.version.value()
    }

    /// Version as the resident wrote it
    pub fn version_text(&self) -> &str {
        self.version.as_str()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn schema_type(&self) -> &str {
        &self.schema_type
    }
}

// ---------------------------------------------------------------------------
// MasterdataRequest
// ---------------------------------------------------------------------------

/// One downstream masterdata lookup, already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum MasterdataRequest {
    /// Document categories and types valid for a language.
    ValidDocuments { lang_code: LangCode },
    /// Location hierarchy levels for a language.
    LocationHierarchyLevels { lang_code: LangCode },
    /// Direct children of a location.
    ImmediateChildren {
        location_code: Code,
        lang_code: LangCode,
    },
    /// A single location's details.
    LocationDetails {
        location_code: Code,
        lang_code: LangCode,
    },
    /// Registration centers around a point.
    CoordinateSpecificRegistrationCenters {
        lang_code: LangCode,
        coordinates: Coordinates,
    },
    /// Documents an applicant type may submit.
    ApplicantValidDocument {
        applicant_id: Code,
        languages: LanguageList,
    },
    /// Registration centers under the named locations at a hierarchy level.
    RegistrationCentersByHierarchyLevel {
        lang_code: LangCode,
        hierarchy_level: HierarchyLevel,
        names: Names,
    },
    /// Paged text search of registration centers at a hierarchy level.
    RegistrationCentersPaginated {
        lang_code: LangCode,
        hierarchy_level: HierarchyLevel,
        name: String,
        page: PageRequest,
    },
    /// Working days of a registration center.
    RegistrationCenterWorkingDays {
        registration_center_id: Code,
        lang_code: LangCode,
    },
    /// Latest published ID schema.
    LatestIdSchema { query: SchemaQuery },
}

impl MasterdataRequest {
    /// Facade operation name, used as the `op` log field and audit key
    pub fn operation(&self) -> &'static str {
        match self {
            MasterdataRequest::ValidDocuments { .. } => "get_valid_document_by_lang_code",
            MasterdataRequest::LocationHierarchyLevels { .. } => {
                "get_location_hierarchy_level_by_lang_code"
            }
            MasterdataRequest::ImmediateChildren { .. } => {
                "get_immediate_children_by_loc_code_and_lang_code"
            }
            MasterdataRequest::LocationDetails { .. } => {
                "get_location_details_by_loc_code_and_lang_code"
            }
            MasterdataRequest::CoordinateSpecificRegistrationCenters { .. } => {
                "get_coordinate_specific_registration_centers"
            }
            MasterdataRequest::ApplicantValidDocument { .. } => "get_applicant_valid_document",
            MasterdataRequest::RegistrationCentersByHierarchyLevel { .. } => {
                "get_registration_centers_by_hierarchy_level"
            }
            MasterdataRequest::RegistrationCentersPaginated { .. } => {
                "get_registration_center_by_hierarchy_level_and_text_paginated"
            }
            MasterdataRequest::RegistrationCenterWorkingDays { .. } => {
                "get_registration_center_working_days"
            }
            MasterdataRequest::LatestIdSchema { .. } => "get_latest_id_schema",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resident_core::errors::ErrorKind;

    fn catalog() -> ErrorCatalog {
        ErrorCatalog::standard()
    }

    #[test]
    fn test_lang_code_rejects_digits() {
        let err = LangCode::parse(&catalog(), "en1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(LangCode::parse(&catalog(), " eng ").unwrap().as_str(), "eng");
    }

    #[test]
    fn test_coordinates_bounds() {
        let c = catalog();
        assert!(Coordinates::parse(&c, "180", "-90", "0").is_ok());
        assert_eq!(
            Coordinates::parse(&c, "180.1", "0", "1").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            Coordinates::parse(&c, "0", "0", "-0.5").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            Coordinates::parse(&c, "0", "", "1").unwrap_err().kind(),
            ErrorKind::MissingInput
        );
    }

    #[test]
    fn test_language_list_splits_commas() {
        let list = LanguageList::parse(&catalog(), &["eng,ara", "fra"]).unwrap();
        assert_eq!(list.joined(), "eng,ara,fra");
        assert_eq!(
            LanguageList::parse(&catalog(), &[" , "]).unwrap_err().kind(),
            ErrorKind::MissingInput
        );
    }

    #[test]
    fn test_page_request_parses_exact_values() {
        let page = PageRequest::parse(
            &catalog(),
            PageParams {
                page_number: "0",
                page_size: "10",
                order_by: "DESC",
                sort_by: "createdDateTime",
            },
        )
        .unwrap();

        assert_eq!(page.page_number(), 0);
        assert_eq!(page.page_size(), 10);
        assert_eq!(page.order_by(), SortOrder::Desc);
        assert_eq!(page.order_by_text(), "DESC");
        assert_eq!(page.sort_by(), "createdDateTime");
    }

    #[test]
    fn test_page_request_rejects_zero_size_and_bad_order() {
        let c = catalog();
        let base = PageParams {
            page_number: "0",
            page_size: "0",
            order_by: "asc",
            sort_by: "name",
        };
        assert_eq!(PageRequest::parse(&c, base).unwrap_err().kind(), ErrorKind::InvalidInput);

        let bad_order = PageParams {
            page_size: "5",
            order_by: "sideways",
            ..base
        };
        let err = PageRequest::parse(&c, bad_order).unwrap_err();
        assert_eq!(err.metadata().and_then(|m| m.get_str("parameter")), Some("orderBy"));
    }

    #[test]
    fn test_schema_query_requires_domain_and_type() {
        let c = catalog();
        assert_eq!(
            SchemaQuery::parse(&c, "0", "", "schema").unwrap_err().kind(),
            ErrorKind::MissingInput
        );
        assert_eq!(
            SchemaQuery::parse(&c, "-1", "registration-client", "schema").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        let q = SchemaQuery::parse(&c, "0.2", "registration-client", "schema").unwrap();
        assert_eq!(q.version(), 0.2);
        let q = SchemaQuery::parse(&c, " 1.0 ", "registration-client", "schema").unwrap();
        assert_eq!(q.version(), 1.0);
        assert_eq!(q.version_text(), "1.0");
    }

    #[test]
    fn test_coordinates_keep_input_text() {
        let coords = Coordinates::parse(&catalog(), "77.59460", " 12.97160", "2000.0").unwrap();
        assert_eq!(coords.latitude(), 12.9716);
        assert_eq!(coords.as_text(), ["77.59460", "12.97160", "2000.0"]);
    }

    #[test]
    fn test_operation_names_are_distinct() {
        use std::collections::HashSet;
        let c = catalog();
        let eng = LangCode::parse(&c, "eng").unwrap();
        let requests = vec![
            MasterdataRequest::ValidDocuments { lang_code: eng.clone() },
            MasterdataRequest::LocationHierarchyLevels { lang_code: eng.clone() },
            MasterdataRequest::LatestIdSchema {
                query: SchemaQuery::parse(&c, "0", "d", "t").unwrap(),
            },
        ];
        let names: HashSet<_> = requests.iter().map(MasterdataRequest::operation).collect();
        assert_eq!(names.len(), requests.len());
    }
}
