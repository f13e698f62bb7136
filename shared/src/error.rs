//! Assignment error taxonomy
//!
//! All errors are local and operator-facing; there are no remote calls, so
//! "retry" means the operator adjusts the input and resubmits. `ErrorDetail`
//! is the serializable form handed to UI surfaces (the code drives
//! localization, the message carries technical detail).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssignmentError {
    /// No certified, non-busy therapist is available for the service.
    /// Not retried automatically; the caller blocks the action.
    #[error("no eligible therapist for service {service}")]
    NoEligibleTherapist { service: String },

    /// Chosen therapist cannot perform the requested service
    #[error("therapist {therapist} is not certified for service {service}")]
    CertificationMismatch { therapist: String, service: String },

    /// Scheduled booking lands inside the 60-minute lead window of another
    /// non-completed entry for the same therapist
    #[error(
        "scheduled booking for {therapist} conflicts with an entry starting at {conflict_start}"
    )]
    LeadTimeViolation {
        therapist: String,
        conflict_start: DateTime<Utc>,
    },

    /// Scheduled bookings must be future-dated
    #[error("scheduled time {requested} is not in the future")]
    ScheduledTimeInPast { requested: DateTime<Utc> },

    /// No therapist in the roster is certified for a group member's service,
    /// even ignoring busy/group-exclusivity
    #[error("no therapist is certified for service {service}")]
    InvalidGroupComposition { service: String },

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("entry already completed: {0}")]
    EntryAlreadyCompleted(String),

    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("unknown therapist: {0}")]
    UnknownTherapist(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Error codes (frontend owns localization)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentErrorCode {
    NoEligibleTherapist,
    CertificationMismatch,
    LeadTimeViolation,
    ScheduledTimeInPast,
    InvalidGroupComposition,
    EntryNotFound,
    EntryAlreadyCompleted,
    UnknownService,
    UnknownTherapist,
    InvalidOperation,
}

/// Serializable error detail for operator-facing surfaces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: AssignmentErrorCode,
    pub message: String,
}

impl ErrorDetail {
    pub fn new(code: AssignmentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&AssignmentError> for AssignmentErrorCode {
    fn from(err: &AssignmentError) -> Self {
        match err {
            AssignmentError::NoEligibleTherapist { .. } => Self::NoEligibleTherapist,
            AssignmentError::CertificationMismatch { .. } => Self::CertificationMismatch,
            AssignmentError::LeadTimeViolation { .. } => Self::LeadTimeViolation,
            AssignmentError::ScheduledTimeInPast { .. } => Self::ScheduledTimeInPast,
            AssignmentError::InvalidGroupComposition { .. } => Self::InvalidGroupComposition,
            AssignmentError::EntryNotFound(_) => Self::EntryNotFound,
            AssignmentError::EntryAlreadyCompleted(_) => Self::EntryAlreadyCompleted,
            AssignmentError::UnknownService(_) => Self::UnknownService,
            AssignmentError::UnknownTherapist(_) => Self::UnknownTherapist,
            AssignmentError::InvalidOperation(_) => Self::InvalidOperation,
        }
    }
}

impl From<AssignmentError> for ErrorDetail {
    fn from(err: AssignmentError) -> Self {
        let code = AssignmentErrorCode::from(&err);
        ErrorDetail::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_carries_code_and_message() {
        let err = AssignmentError::NoEligibleTherapist {
            service: "1".to_string(),
        };
        let detail: ErrorDetail = err.into();
        assert_eq!(detail.code, AssignmentErrorCode::NoEligibleTherapist);
        assert!(detail.message.contains("service 1"));
    }

    #[test]
    fn test_code_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&AssignmentErrorCode::LeadTimeViolation).unwrap();
        assert_eq!(json, "\"LEAD_TIME_VIOLATION\"");
    }
}
