//! Property tests for request parameter validation.

use proptest::prelude::*;
use resident_core::errors::{ErrorCatalog, ErrorKind};
use resident_proxy::request::{Coordinates, LangCode, PageRequest, SortOrder};
use resident_proxy::PageParams;

proptest! {
    #[test]
    fn coordinates_inside_bounds_are_kept(
        lon in -180.0f64..=180.0,
        lat in -90.0f64..=90.0,
        distance in 0.0f64..100_000.0,
    ) {
        let catalog = ErrorCatalog::standard();
        let coords = Coordinates::parse(
            &catalog,
            &lon.to_string(),
            &lat.to_string(),
            &distance.to_string(),
        ).unwrap();
        prop_assert_eq!(coords.longitude(), lon);
        prop_assert_eq!(coords.latitude(), lat);
        prop_assert_eq!(coords.proximity_distance(), distance);
    }

    #[test]
    fn latitude_beyond_pole_is_invalid(excess in 0.0001f64..1000.0) {
        let catalog = ErrorCatalog::standard();
        let err = Coordinates::parse(&catalog, "0", &(90.0 + excess).to_string(), "1").unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidInput);
        prop_assert_eq!(err.metadata().and_then(|m| m.get_str("parameter")), Some("latitude"));
    }

    #[test]
    fn alphabetic_codes_are_language_codes(code in "[a-zA-Z]{2,8}") {
        let catalog = ErrorCatalog::standard();
        let parsed = LangCode::parse(&catalog, &code).unwrap();
        prop_assert_eq!(parsed.as_str(), code.as_str());
    }

    #[test]
    fn codes_with_digits_are_rejected(code in "[a-z]{0,3}[0-9][a-z0-9]{0,3}") {
        let catalog = ErrorCatalog::standard();
        prop_assert_eq!(LangCode::parse(&catalog, &code).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn page_values_survive_validation(
        number in 0u32..10_000,
        size in 1u32..500,
        desc in any::<bool>(),
        sort_by in "[a-zA-Z]{1,20}",
    ) {
        let catalog = ErrorCatalog::standard();
        let number_s = number.to_string();
        let size_s = size.to_string();
        let order = if desc { "desc" } else { "asc" };
        let page = PageRequest::parse(
            &catalog,
            PageParams {
                page_number: &number_s,
                page_size: &size_s,
                order_by: order,
                sort_by: &sort_by,
            },
        ).unwrap();

        prop_assert_eq!(page.page_number(), number);
        prop_assert_eq!(page.page_size(), size);
        prop_assert_eq!(page.order_by(), if desc { SortOrder::Desc } else { SortOrder::Asc });
        prop_assert_eq!(page.sort_by(), sort_by.as_str());
    }
}
