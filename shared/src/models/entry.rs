//! Service Entry Model - the central mutable record
//!
//! Entries form an append-only log for the session: they are created by the
//! assignment engine, mutated by end/extend/payment operations, never deleted.

use crate::models::PaymentInfo;
use crate::types::ClockTime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker prepended to the notes of a scheduled booking; stripped on activation
pub const SCHEDULED_NOTE_PREFIX: &str = "Scheduled for ";

/// A single service assignment on the daily board
///
/// Status is derived, not stored:
/// - `is_scheduled == true` => inert future booking (no queue/busy slot)
/// - `end_time == None` => active (occupies the therapist)
/// - `end_time == Some(_)` => completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Unique entry ID
    pub id: String,
    /// Assigned therapist name (immutable after creation)
    pub therapist: String,
    /// Composite service label ("Thai 400")
    pub service: String,
    /// Price including add-ons and extensions
    pub price: f64,
    /// Price before the first extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Service start time (assignment or activation time)
    pub time: ClockTime,
    /// Service end time, set when the manager closes out the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
    /// Extra minutes added via extensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_minutes: Option<u32>,
    /// Display column on the board
    pub column: u32,
    /// Fairness cycle this entry belongs to (assigned once, never changes)
    pub round: u32,
    /// Links entries created in the same group-booking transaction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_number: Option<u32>,
    /// Payment info submitted by the operator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    /// Future booking time; present only while `is_scheduled`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Whether this entry is an inert future booking
    #[serde(default)]
    pub is_scheduled: bool,
    /// Operator notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ServiceEntry {
    /// Active = occupies the therapist's busy slot right now
    pub fn is_active(&self) -> bool {
        !self.is_scheduled && self.end_time.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Not completed: either active or a pending scheduled booking
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Service name portion of the composite label ("Thai 400" -> "Thai")
    pub fn service_name(&self) -> &str {
        self.service.split_whitespace().next().unwrap_or(&self.service)
    }

    /// Extension minutes, defaulting to zero
    pub fn extension(&self) -> u32 {
        self.extended_minutes.unwrap_or(0)
    }

    /// Strip the "Scheduled for ..." marker from the notes, keeping operator text
    pub fn strip_scheduled_marker(&mut self) {
        if let Some(notes) = &self.notes {
            if let Some(rest) = notes.strip_prefix(SCHEDULED_NOTE_PREFIX) {
                let remainder = rest.split_once("; ").map(|(_, tail)| tail.trim());
                self.notes = match remainder {
                    Some(tail) if !tail.is_empty() => Some(tail.to_string()),
                    _ => None,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> ServiceEntry {
        ServiceEntry {
            id: "e1".to_string(),
            therapist: "Lisa".to_string(),
            service: "Thai 400".to_string(),
            price: 400.0,
            original_price: None,
            time: ClockTime::new(10, 0),
            end_time: None,
            extended_minutes: None,
            column: 1,
            round: 1,
            group_number: None,
            payment: None,
            scheduled_time: None,
            is_scheduled: false,
            notes: None,
        }
    }

    #[test]
    fn test_status_predicates() {
        let mut e = entry();
        assert!(e.is_active());
        e.end_time = Some(ClockTime::new(11, 0));
        assert!(e.is_completed());
        assert!(!e.is_active());

        let mut scheduled = entry();
        scheduled.is_scheduled = true;
        assert!(!scheduled.is_active());
        assert!(scheduled.is_open());
    }

    #[test]
    fn test_service_name_from_label() {
        assert_eq!(entry().service_name(), "Thai");
    }

    #[test]
    fn test_strip_scheduled_marker_keeps_operator_text() {
        let mut e = entry();
        e.notes = Some("Scheduled for 2026-08-24 09:00; bring towels".to_string());
        e.strip_scheduled_marker();
        assert_eq!(e.notes.as_deref(), Some("bring towels"));

        let mut bare = entry();
        bare.notes = Some("Scheduled for 2026-08-24 09:00".to_string());
        bare.strip_scheduled_marker();
        assert_eq!(bare.notes, None);
    }
}
