//! Component event id validation.

use crate::error::{DaemonError, ValidationErrorKind};

/// Maximum length of a component custom id on the platform.
const MAX_CUSTOM_ID_LENGTH: usize = 100;

/// Validate a component event id.
///
/// An empty id is the "event has no id" load failure. Ids are otherwise
/// opaque strings, capped at the platform's custom-id length.
pub fn validate_custom_id(id: &str) -> Result<(), DaemonError> {
    if id.is_empty() {
        return Err(DaemonError::Validation {
            kind: ValidationErrorKind::MissingEventId,
        });
    }

    if id.len() > MAX_CUSTOM_ID_LENGTH {
        return Err(DaemonError::Validation {
            kind: ValidationErrorKind::InvalidEventId {
                id: id.to_string(),
                message: format!(
                    "must be at most {} characters, got {}",
                    MAX_CUSTOM_ID_LENGTH,
                    id.len()
                ),
            },
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_custom_ids() {
        assert!(validate_custom_id("purge-confirm").is_ok());
        assert!(validate_custom_id("role:select:123").is_ok());
    }

    #[test]
    fn test_empty_id_is_missing_id() {
        let err = validate_custom_id("").unwrap_err();
        assert!(matches!(
            err,
            DaemonError::Validation {
                kind: ValidationErrorKind::MissingEventId
            }
        ));
    }

    #[test]
    fn test_overlong_id_rejected() {
        assert!(validate_custom_id(&"x".repeat(101)).is_err());
    }
}
