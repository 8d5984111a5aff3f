//! Input validation for plan records.

use std::fmt;

use crate::models::Plan;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too short.
    TooShort { field: String, min: usize, actual: usize },
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Negative number where only zero or more is allowed.
    Negative(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooShort { field, min, actual } => {
                write!(f, "{} is too short ({} chars, min {})", field, actual, min)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Negative(field) => write!(f, "{} cannot be negative", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Minimum allowed length for plan names.
pub const MIN_PLAN_NAME_LENGTH: usize = 2;

/// Maximum allowed length for plan names.
pub const MAX_PLAN_NAME_LENGTH: usize = 64;

/// Validate a plan name (trimmed, counted in characters).
pub fn validate_plan_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    let len = name.chars().count();

    if len == 0 {
        return Err(ValidationError::Empty("name".to_string()));
    }

    if len < MIN_PLAN_NAME_LENGTH {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_PLAN_NAME_LENGTH,
            actual: len,
        });
    }

    if len > MAX_PLAN_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PLAN_NAME_LENGTH,
            actual: len,
        });
    }

    Ok(())
}

/// Validate a whole plan before it is written.
pub fn validate_plan(plan: &Plan) -> Result<(), ValidationError> {
    validate_plan_name(&plan.name)?;

    for (field, count) in [
        ("users", plan.users),
        ("connections", plan.connections),
        ("queues", plan.queues),
    ] {
        if count < 0 {
            return Err(ValidationError::Negative(field.to_string()));
        }
    }

    if plan.value < 0.0 || plan.value.is_nan() {
        return Err(ValidationError::Negative("value".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(name: &str) -> Plan {
        Plan {
            name: name.to_string(),
            users: 5,
            connections: 2,
            queues: 3,
            value: 99.9,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_plan_name() {
        assert!(validate_plan_name("Basic").is_ok());
        assert!(validate_plan_name("  Pro  ").is_ok());
        assert!(validate_plan_name("Ün").is_ok());

        assert!(matches!(
            validate_plan_name("   "),
            Err(ValidationError::Empty(_))
        ));
        assert!(matches!(
            validate_plan_name("A"),
            Err(ValidationError::TooShort { min: 2, actual: 1, .. })
        ));
        assert!(matches!(
            validate_plan_name(&"x".repeat(65)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_plan_counts() {
        assert!(validate_plan(&plan("Basic")).is_ok());

        let mut bad = plan("Basic");
        bad.queues = -1;
        assert_eq!(
            validate_plan(&bad),
            Err(ValidationError::Negative("queues".to_string()))
        );

        let mut bad = plan("Basic");
        bad.value = -0.5;
        assert_eq!(
            validate_plan(&bad),
            Err(ValidationError::Negative("value".to_string()))
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::TooShort {
            field: "name".to_string(),
            min: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "name is too short (1 chars, min 2)");

        let err = ValidationError::Negative("users".to_string());
        assert_eq!(err.to_string(), "users cannot be negative");
    }
}
