//! Error and validation types
//!
//! Two tiers: `PlanningError` for structural failures (bad loader input, I/O,
//! projection inputs that cannot be projected) and `ValidationIssue` for the
//! non-fatal findings that travel alongside computed outputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural errors raised by the planning core and its loaders
#[derive(Error, Debug)]
pub enum PlanningError {
    /// A numeric input that must be finite and non-negative was not
    #[error("invalid input for {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    /// A label in a loaded file did not match any known variant
    #[error("unknown {kind}: {value}")]
    UnknownLabel { kind: &'static str, value: String },

    /// An assumptions file referenced a key this crate does not know
    #[error("unknown assumption key: {0}")]
    UnknownAssumption(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("number parse error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

impl PlanningError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        PlanningError::InvalidInput {
            field,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, PlanningError>;

/// Check that a value is finite and not negative
pub fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PlanningError::invalid(field, format!("{} is not finite", value)));
    }
    if value < 0.0 {
        return Err(PlanningError::invalid(field, format!("{} is negative", value)));
    }
    Ok(())
}

/// How serious a validation finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Inputs are inconsistent; the affected output was defaulted or clamped
    Invalid,
    /// Inputs are usable but worth flagging to the advisor
    Warning,
}

/// A non-fatal validation result attached to computed outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Invalid,
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.severity == Severity::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("rate", 0.0).is_ok());
        assert!(ensure_non_negative("rate", 0.05).is_ok());
        assert!(ensure_non_negative("rate", -0.01).is_err());
        assert!(ensure_non_negative("rate", f64::NAN).is_err());
        assert!(ensure_non_negative("rate", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = PlanningError::invalid("present_value", "-5 is negative");
        assert_eq!(err.to_string(), "invalid input for present_value: -5 is negative");

        let err = PlanningError::UnknownLabel { kind: "GoalType", value: "yacht".into() };
        assert_eq!(err.to_string(), "unknown GoalType: yacht");
    }
}
