// Remote record ids are opaque strings assigned by Graylog.
use crate::error::{GraylogError, Result};

/// Check that an id is usable as a single path segment.
///
/// `label` names the resource kind in the error, e.g. `"input"`.
pub fn validate_id(label: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(GraylogError::validation(format!("{label} ID is required")));
    }
    if id.contains(['/', '?', '#']) {
        return Err(GraylogError::validation(format!(
            "{label} ID '{id}' must not contain '/', '?' or '#'"
        )));
    }
    Ok(())
}

/// Check that a required field carries a non-empty value.
pub fn require(label: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(GraylogError::validation(format!(
            "{label} {field} is required"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_empty_id_is_rejected() {
        let err = validate_id("input", "").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: input ID is required");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_path_characters_are_rejected() {
        assert!(validate_id("index set", "abc/def").is_err());
        assert!(validate_id("index set", "abc?x=1").is_err());
        assert!(validate_id("index set", "abc#frag").is_err());
    }

    #[test]
    fn test_valid_id() {
        assert!(validate_id("event definition", "5f1b2c3d4e5f6a7b8c9d0e1f").is_ok());
    }

    #[test]
    fn test_require() {
        assert!(require("input", "title", "syslog-in").is_ok());
        let err = require("input", "type", "").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: input type is required");
    }
}
