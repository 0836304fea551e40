//! Command and option name validation.
//!
//! The platform rejects command registrations whose names fall outside its
//! identifier rules, so the loader enforces them before any remote call.

use crate::error::{DaemonError, ValidationErrorKind};

/// Maximum length of a command or option name.
const MAX_NAME_LENGTH: usize = 32;

/// Maximum number of options a single command may declare.
pub const MAX_COMMAND_OPTIONS: usize = 25;

/// Check a name against the platform identifier rules.
///
/// Names are 1-32 characters of lowercase ASCII alphanumerics, `-` or `_`.
fn name_rule_violation(name: &str) -> Option<String> {
    if name.len() > MAX_NAME_LENGTH {
        return Some(format!(
            "must be at most {} characters, got {}",
            MAX_NAME_LENGTH,
            name.len()
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Some("must contain only lowercase ASCII alphanumerics, '-' or '_'".to_string());
    }

    None
}

/// Validate a command name.
///
/// An empty name is the "command has no name" load failure; a non-empty
/// name must satisfy the platform identifier rules.
///
/// # Example
///
/// ```
/// use slashd::validation::validate_command_name;
///
/// assert!(validate_command_name("ping").is_ok());
/// assert!(validate_command_name("").is_err());
/// assert!(validate_command_name("Ping Pong").is_err());
/// ```
pub fn validate_command_name(name: &str) -> Result<(), DaemonError> {
    if name.is_empty() {
        return Err(DaemonError::Validation {
            kind: ValidationErrorKind::MissingCommandName,
        });
    }

    if let Some(message) = name_rule_violation(name) {
        return Err(DaemonError::Validation {
            kind: ValidationErrorKind::InvalidCommandName {
                name: name.to_string(),
                message,
            },
        });
    }

    Ok(())
}

/// Validate an option name declared by `command`.
pub fn validate_option_name(command: &str, option: &str) -> Result<(), DaemonError> {
    let violation = if option.is_empty() {
        Some("option name cannot be empty".to_string())
    } else {
        name_rule_violation(option)
    };

    if let Some(message) = violation {
        return Err(DaemonError::Validation {
            kind: ValidationErrorKind::InvalidOption {
                command: command.to_string(),
                option: option.to_string(),
                message,
            },
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_command_names() {
        assert!(validate_command_name("ping").is_ok());
        assert!(validate_command_name("purge").is_ok());
        assert!(validate_command_name("mod-log").is_ok());
        assert!(validate_command_name("role_info2").is_ok());
    }

    #[test]
    fn test_empty_name_is_missing_name() {
        let err = validate_command_name("").unwrap_err();
        assert!(matches!(
            err,
            DaemonError::Validation {
                kind: ValidationErrorKind::MissingCommandName
            }
        ));
    }

    #[test]
    fn test_invalid_command_names() {
        assert!(validate_command_name("Ping").is_err());
        assert!(validate_command_name("pi ng").is_err());
        assert!(validate_command_name("ping!").is_err());
        assert!(validate_command_name(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_option_name_carries_command_context() {
        let err = validate_option_name("purge", "Count").unwrap_err();
        match err {
            DaemonError::Validation {
                kind: ValidationErrorKind::InvalidOption { command, option, .. },
            } => {
                assert_eq!(command, "purge");
                assert_eq!(option, "Count");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_option_name_rejected() {
        assert!(validate_option_name("purge", "").is_err());
    }
}
