//! Input validation errors shared by all domain models.

use thiserror::Error;

/// Rejected input. Raised before anything reaches storage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("Invalid weekday {0}: expected 0 (Sunday) through 6 (Saturday)")]
    InvalidWeekday(u8),

    #[error("Invalid time {0:?}: expected 24-hour HH:MM")]
    InvalidTime(String),

    #[error("Minimum hours between doses must be positive, got {0}")]
    NonPositiveInterval(f64),

    #[error("Minimum hours between doses must be at most {max}, got {hours}")]
    IntervalTooLong { hours: f64, max: f64 },

    #[error("As-needed medications cannot carry a fixed schedule")]
    PrnWithSchedule,

    #[error("Minimum hours between doses only applies to as-needed medications")]
    IntervalWithoutPrn,

    #[error("{field} must be between 1 and 10, got {value}")]
    LevelOutOfRange { field: &'static str, value: u8 },

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Trim a required text field, rejecting blank input.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

/// Collapse blank optional text to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("title", "  Walk  ").unwrap(), "Walk");
        assert_eq!(
            require_text("title", "   "),
            Err(ValidationError::BlankField("title"))
        );
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some(" ok ".into())), Some("ok".into()));
    }
}
