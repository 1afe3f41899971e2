use std::str::FromStr;

use resident_core_types::schema::{META_PARAMETER, META_REASON, META_VALUE};

use crate::errors::{ErrorCatalog, ErrorKind, ResidentError, Result};
use crate::model::Metadata;

/// Error for a blank or absent parameter
pub fn missing(catalog: &ErrorCatalog, parameter: &str) -> ResidentError {
    ResidentError::with_metadata(
        catalog,
        ErrorKind::MissingInput,
        format!("{}: {}", catalog.default_message(ErrorKind::MissingInput), parameter),
        &Metadata::new().with(META_PARAMETER, parameter),
    )
}

/// Error for a present but malformed parameter
pub fn invalid(catalog: &ErrorCatalog, parameter: &str, value: &str, reason: &str) -> ResidentError {
    ResidentError::with_metadata(
        catalog,
        ErrorKind::InvalidInput,
        format!("{}: {}", catalog.default_message(ErrorKind::InvalidInput), parameter),
        &Metadata::new()
            .with(META_PARAMETER, parameter)
            .with(META_VALUE, value)
            .with(META_REASON, reason),
    )
}

/// Require a value that is not empty after trimming; returns the trimmed value.
///
/// # Errors
///
/// `MissingInput` when blank.
pub fn require_non_blank<'a>(catalog: &ErrorCatalog, parameter: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(missing(catalog, parameter));
    }
    Ok(trimmed)
}

/// Require a single token: non-blank and free of inner whitespace.
///
/// # Errors
///
/// `MissingInput` when blank, `InvalidInput` when it contains whitespace.
pub fn require_token<'a>(catalog: &ErrorCatalog, parameter: &str, value: &'a str) -> Result<&'a str> {
    let token = require_non_blank(catalog, parameter, value)?;
    if token.chars().any(char::is_whitespace) {
        return Err(invalid(catalog, parameter, value, "must not contain whitespace"));
    }
    Ok(token)
}

/// Parse a numeric parameter.
///
/// # Errors
///
/// `MissingInput` when blank, `InvalidInput` when it does not parse as `T`.
pub fn parse_number<T: FromStr>(catalog: &ErrorCatalog, parameter: &str, value: &str) -> Result<T> {
    let raw = require_non_blank(catalog, parameter, value)?;
    raw.parse::<T>()
        .map_err(|_| invalid(catalog, parameter, value, "not a number"))
}

/// Parse a finite floating point parameter within `[min, max]`.
///
/// # Errors
///
/// `MissingInput` when blank, `InvalidInput` when unparsable, non-finite or
/// out of range.
pub fn parse_in_range(catalog: &ErrorCatalog, parameter: &str, value: &str, min: f64, max: f64) -> Result<f64> {
    let number: f64 = parse_number(catalog, parameter, value)?;
    if !number.is_finite() {
        return Err(invalid(catalog, parameter, value, "must be finite"));
    }
    if number < min || number > max {
        return Err(invalid(
            catalog,
            parameter,
            value,
            &format!("must be between {} and {}", min, max),
        ));
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;

    #[test]
    fn test_blank_is_missing() {
        let catalog = ErrorCatalog::standard();
        let err = require_non_blank(&catalog, "langCode", "   ").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.message(), "Missing Input Parameter: langCode");
        assert_eq!(err.metadata().and_then(|m| m.get_str(META_PARAMETER)), Some("langCode"));
    }

    #[test]
    fn test_token_rejects_inner_whitespace() {
        let catalog = ErrorCatalog::standard();
        let err = require_token(&catalog, "locationCode", "KTA 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.metadata().and_then(|m| m.get_str(META_VALUE)), Some("KTA 1"));
    }

    #[test]
    fn test_token_trims_outer_whitespace() {
        let catalog = ErrorCatalog::standard();
        assert_eq!(require_token(&catalog, "locationCode", " KTA ").unwrap(), "KTA");
    }

    #[test]
    fn test_parse_number_reports_parameter() {
        let catalog = ErrorCatalog::standard();
        let err = parse_number::<u32>(&catalog, "pageNumber", "-1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.message().ends_with("pageNumber"));
    }

    #[test]
    fn test_range_rejects_nan_and_out_of_bounds() {
        let catalog = ErrorCatalog::standard();
        assert!(parse_in_range(&catalog, "latitude", "NaN", -90.0, 90.0).is_err());
        assert!(parse_in_range(&catalog, "latitude", "90.5", -90.0, 90.0).is_err());
        assert_eq!(parse_in_range(&catalog, "latitude", "-90", -90.0, 90.0).unwrap(), -90.0);
    }
}
