//! End and extend commands for active entries

use chrono::{DateTime, Utc};
use shared::models::ServiceEntry;
use shared::AssignmentError;
use tracing::info;

use super::{ExtensionOutcome, ShopSession};

impl ShopSession {
    /// Close out an active service at the current wall-clock time, freeing
    /// the therapist's busy slot
    pub fn end_service(
        &mut self,
        entry_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ServiceEntry, AssignmentError> {
        let ended_at = self.clock_now(now);
        let entry = self.find_entry_mut(entry_id)?;
        if entry.is_completed() {
            return Err(AssignmentError::EntryAlreadyCompleted(entry_id.to_string()));
        }
        if entry.is_scheduled {
            return Err(AssignmentError::InvalidOperation(format!(
                "entry {entry_id} is a pending scheduled booking"
            )));
        }

        entry.end_time = Some(ended_at);
        let ended = entry.clone();
        info!(
            entry_id = %ended.id,
            therapist = %ended.therapist,
            ended_at = %ended_at,
            "Service ended"
        );
        Ok(ended)
    }

    /// Add minutes to an active service. The added cost is prorated from the
    /// price the entry had before its first extension.
    pub fn extend_service(
        &mut self,
        entry_id: &str,
        minutes: u32,
    ) -> Result<ExtensionOutcome, AssignmentError> {
        if minutes == 0 {
            return Err(AssignmentError::InvalidOperation(
                "extension must add at least one minute".to_string(),
            ));
        }
        let base_duration = {
            let entry = self.find_entry(entry_id)?;
            self.catalog.duration_of(entry.service_name())
        };

        let entry = self.find_entry_mut(entry_id)?;
        if entry.is_completed() {
            return Err(AssignmentError::EntryAlreadyCompleted(entry_id.to_string()));
        }
        if entry.is_scheduled {
            return Err(AssignmentError::InvalidOperation(format!(
                "entry {entry_id} is a pending scheduled booking"
            )));
        }

        let original = entry.original_price.unwrap_or(entry.price);
        if entry.original_price.is_none() {
            entry.original_price = Some(entry.price);
        }
        let added_cost = (original / f64::from(base_duration) * f64::from(minutes)).round();
        entry.price += added_cost;
        entry.extended_minutes = Some(entry.extension() + minutes);

        let extended = entry.clone();
        info!(
            entry_id = %extended.id,
            therapist = %extended.therapist,
            added_minutes = minutes,
            added_cost,
            total_minutes = extended.extension(),
            "Service extended"
        );
        Ok(ExtensionOutcome {
            entry: extended,
            added_minutes: minutes,
            added_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;
    use shared::types::ClockTime;

    fn auto(service_id: &str) -> shared::request::AutoRequest {
        shared::request::AutoRequest {
            service_id: service_id.to_string(),
            addons: Vec::new(),
            payment: None,
            notes: None,
        }
    }

    #[test]
    fn test_end_service_stamps_clock_time() {
        let mut s = session_with(&[("A", &[THAI])]);
        let entry = s.create_auto_entry(auto(THAI), at(10, 0)).unwrap().entry;

        let ended = s.end_service(&entry.id, at(10, 45)).unwrap();
        assert_eq!(ended.end_time, Some(ClockTime::new(10, 45)));
        assert!(ended.is_completed());

        // Ending twice is an error
        let err = s.end_service(&entry.id, at(10, 50)).unwrap_err();
        assert!(matches!(err, AssignmentError::EntryAlreadyCompleted(_)));
    }

    #[test]
    fn test_extension_prorates_from_original_price() {
        // Base 60 min at 400: 30 extra minutes cost round(400/60*30) = 200
        let mut s = session_with(&[("A", &[THAI])]);
        let entry = s.create_auto_entry(auto(THAI), at(10, 0)).unwrap().entry;

        let outcome = s.extend_service(&entry.id, 30).unwrap();
        assert_eq!(outcome.added_cost, 200.0);
        assert_eq!(outcome.entry.price, 600.0);
        assert_eq!(outcome.entry.original_price, Some(400.0));
        assert_eq!(outcome.entry.extended_minutes, Some(30));
    }

    #[test]
    fn test_second_extension_keeps_original_price() {
        let mut s = session_with(&[("A", &[THAI])]);
        let entry = s.create_auto_entry(auto(THAI), at(10, 0)).unwrap().entry;

        s.extend_service(&entry.id, 30).unwrap();
        let outcome = s.extend_service(&entry.id, 15).unwrap();
        // Still prorated from 400, not from the already-extended 600
        assert_eq!(outcome.added_cost, 100.0);
        assert_eq!(outcome.entry.price, 700.0);
        assert_eq!(outcome.entry.original_price, Some(400.0));
        assert_eq!(outcome.entry.extended_minutes, Some(45));
    }

    #[test]
    fn test_extension_pushes_next_available_time() {
        let mut s = session_with(&[("A", &[THAI])]);
        let entry = s.create_auto_entry(auto(THAI), at(10, 0)).unwrap().entry;
        s.extend_service(&entry.id, 30).unwrap();

        // Therapist now occupied until 11:30
        let second = s.create_manual_entry(
            shared::request::ManualRequest {
                service_id: THAI.to_string(),
                therapist: "A".to_string(),
                time: None,
                column: None,
                addons: Vec::new(),
                payment: None,
                notes: None,
            },
            at(10, 5),
        )
        .unwrap();
        assert_eq!(second.entry.time, ClockTime::new(11, 30));
    }

    #[test]
    fn test_zero_minute_extension_rejected() {
        let mut s = session_with(&[("A", &[THAI])]);
        let entry = s.create_auto_entry(auto(THAI), at(10, 0)).unwrap().entry;
        let err = s.extend_service(&entry.id, 0).unwrap_err();
        assert!(matches!(err, AssignmentError::InvalidOperation(_)));
    }
}
