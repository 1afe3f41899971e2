//! Property tests for input validation rules.

use proptest::prelude::*;
use resident_core::errors::{ErrorCatalog, ErrorKind};
use resident_core::rules::validation::{parse_in_range, require_non_blank, require_token};

fn blank_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ \t\n]{0,6}").unwrap_or_else(|e| panic!("regex failed: {e}"))
}

fn token_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,12}")
        .unwrap_or_else(|e| panic!("regex failed: {e}"))
}

proptest! {
    #[test]
    fn blank_input_is_always_missing(value in blank_strategy()) {
        let catalog = ErrorCatalog::standard();
        let err = require_non_blank(&catalog, "langCode", &value).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::MissingInput);
        prop_assert_eq!(err.code(), "RES-SER-414");
    }

    #[test]
    fn padded_token_is_trimmed(token in token_strategy(), pad in 0usize..4) {
        let catalog = ErrorCatalog::standard();
        let padded = format!("{}{}{}", " ".repeat(pad), token, " ".repeat(pad));
        prop_assert_eq!(require_token(&catalog, "locationCode", &padded).unwrap(), token.as_str());
    }

    #[test]
    fn split_token_is_invalid(left in token_strategy(), right in token_strategy()) {
        let catalog = ErrorCatalog::standard();
        let value = format!("{left} {right}");
        let err = require_token(&catalog, "locationCode", &value).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn in_range_values_round_trip(latitude in -90.0f64..=90.0) {
        let catalog = ErrorCatalog::standard();
        let parsed = parse_in_range(&catalog, "latitude", &latitude.to_string(), -90.0, 90.0).unwrap();
        prop_assert_eq!(parsed, latitude);
    }

    #[test]
    fn out_of_range_values_are_invalid(excess in 0.001f64..1.0e6, negative in any::<bool>()) {
        let catalog = ErrorCatalog::standard();
        let value = if negative { -180.0 - excess } else { 180.0 + excess };
        let err = parse_in_range(&catalog, "longitude", &value.to_string(), -180.0, 180.0).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidInput);
        prop_assert_eq!(err.metadata().and_then(|m| m.get_str("parameter")), Some("longitude"));
    }
}
