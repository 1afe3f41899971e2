//! Sensitive data marker and masking
//!
//! VIDs and individual ids identify a resident. `Sensitive<T>` keeps them
//! out of `Debug`/`Display` output, and `mask` renders the partial form used
//! in log lines.

use std::fmt;

/// Wrapper for resident-identifying data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use resident_core_types::Sensitive;
///
/// let vid = Sensitive::new("6205860271354160");
/// assert_eq!(format!("{:?}", vid), "***REDACTED***");
/// assert_eq!(vid.expose(), &"6205860271354160");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: PartialEq> PartialEq for Sensitive<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// Number of trailing characters left visible by [`mask`]
pub const VISIBLE_SUFFIX: usize = 4;

/// Mask all but the last four characters of an identifier.
///
/// Values of four characters or fewer are masked entirely.
pub fn mask(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_SUFFIX {
        return "*".repeat(len);
    }
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < len - VISIBLE_SUFFIX { '*' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_debug_redaction() {
        let vid = Sensitive::new("6205860271354160");
        let debug_str = format!("{:?}", vid);
        assert_eq!(debug_str, "***REDACTED***");
        assert!(!debug_str.contains("6205"));
    }

    #[test]
    fn test_sensitive_display_redaction() {
        let vid = Sensitive::new(String::from("6205860271354160"));
        assert_eq!(format!("{}", vid), "***REDACTED***");
    }

    #[test]
    fn test_sensitive_into_inner() {
        let vid = Sensitive::new(String::from("1234"));
        assert_eq!(vid.into_inner(), "1234");
    }

    #[test]
    fn test_sensitive_inside_struct_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Revocation {
            stage: &'static str,
            vid: Sensitive<String>,
        }

        let r = Revocation {
            stage: "status_update",
            vid: Sensitive::new("6205860271354160".to_string()),
        };

        let debug_str = format!("{:?}", r);
        assert!(debug_str.contains("status_update"));
        assert!(debug_str.contains("***REDACTED***"));
        assert!(!debug_str.contains("6205860271354160"));
    }

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask("6205860271354160"), "************4160");
    }

    #[test]
    fn test_mask_short_values_fully() {
        assert_eq!(mask("1234"), "****");
        assert_eq!(mask(""), "");
    }
}
