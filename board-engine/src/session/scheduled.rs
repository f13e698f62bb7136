//! Scheduled-booking command
//!
//! Future-dated entries are inert: no queue position, no busy slot, no round
//! accounting until the activation sweep promotes them. Creation enforces
//! certification plus a lead-time rule stricter than plain overlap.

use chrono::{DateTime, TimeZone, Utc};
use shared::models::SCHEDULED_NOTE_PREFIX;
use shared::request::ScheduledRequest;
use shared::types::ClockTime;
use shared::AssignmentError;
use tracing::info;

use super::{CreatedEntry, ShopSession};
use crate::timing;

impl ShopSession {
    pub fn create_scheduled_entry(
        &mut self,
        req: ScheduledRequest,
        now: DateTime<Utc>,
    ) -> Result<CreatedEntry, AssignmentError> {
        let service = self.resolve_service(&req.service_id)?;
        if self.roster.therapist(&req.therapist).is_none() {
            return Err(AssignmentError::UnknownTherapist(req.therapist));
        }
        // No rotation fallback here: a booking names a specific therapist
        if !self.roster.is_certified(&req.therapist, &req.service_id) {
            return Err(AssignmentError::CertificationMismatch {
                therapist: req.therapist,
                service: req.service_id,
            });
        }
        if req.scheduled_at <= now {
            return Err(AssignmentError::ScheduledTimeInPast {
                requested: req.scheduled_at,
            });
        }

        let start = self.clock_now(req.scheduled_at);
        let duration = timing::duration(&self.catalog, &service.name, 0);
        self.check_lead_time(&req.therapist, req.scheduled_at, duration, now)?;

        let local = req.scheduled_at.with_timezone(&self.config.timezone);
        let marker = format!("{SCHEDULED_NOTE_PREFIX}{}", local.format("%Y-%m-%d %H:%M"));
        let notes = match req.notes {
            Some(text) if !text.is_empty() => format!("{marker}; {text}"),
            _ => marker,
        };

        let mut entry = self.new_entry(
            &req.therapist,
            &service,
            req.price.unwrap_or(service.price),
            start,
            self.column_for(&req.therapist),
            self.manual_round_for(&req.therapist),
            req.payment,
            Some(notes),
        );
        entry.is_scheduled = true;
        entry.scheduled_time = Some(req.scheduled_at);
        self.entries.push(entry.clone());

        info!(
            entry_id = %entry.id,
            therapist = %entry.therapist,
            service = %entry.service,
            scheduled_at = %req.scheduled_at,
            "Scheduled booking created"
        );
        Ok(CreatedEntry {
            entry,
            warnings: Vec::new(),
        })
    }

    /// Lead-time rule: the new booking must start at least `lead_time_minutes`
    /// before any other non-completed entry of the same therapist, and must
    /// not end inside that window either. Compared as full instants so a
    /// booking on another day never collides with today's board.
    fn check_lead_time(
        &self,
        therapist: &str,
        scheduled_at: DateTime<Utc>,
        duration: u32,
        now: DateTime<Utc>,
    ) -> Result<(), AssignmentError> {
        let lead = chrono::Duration::minutes(self.config.lead_time_minutes);
        let new_start = scheduled_at;
        let new_end = scheduled_at + chrono::Duration::minutes(i64::from(duration));

        for existing in self.entries.iter().filter(|e| {
            e.therapist == therapist && e.is_open()
        }) {
            // Pending bookings carry their own instant; active entries only
            // have a wall-clock time, which lives on the current business day
            let other_start = match existing.scheduled_time {
                Some(instant) => instant,
                None => self.entry_start_instant(existing.time, now),
            };
            let other_minutes =
                timing::duration(&self.catalog, existing.service_name(), existing.extension());
            let other_end = other_start + chrono::Duration::minutes(i64::from(other_minutes));

            let starts_too_close = new_start >= other_start - lead && new_start < other_end;
            let ends_too_close = new_end > other_start - lead && new_end <= other_start;
            if starts_too_close || ends_too_close {
                return Err(AssignmentError::LeadTimeViolation {
                    therapist: therapist.to_string(),
                    conflict_start: other_start,
                });
            }
        }
        Ok(())
    }

    /// Resolve an entry's wall-clock start to an instant on the reference's
    /// local date
    fn entry_start_instant(&self, time: ClockTime, reference: DateTime<Utc>) -> DateTime<Utc> {
        let local_date = reference.with_timezone(&self.config.timezone).date_naive();
        local_date
            .and_hms_opt(u32::from(time.hour()), u32::from(time.minute()), 0)
            .and_then(|naive| {
                self.config
                    .timezone
                    .from_local_datetime(&naive)
                    .earliest()
            })
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;
    use shared::request::ManualRequest;

    fn scheduled(service_id: &str, therapist: &str, when: DateTime<Utc>) -> ScheduledRequest {
        ScheduledRequest {
            service_id: service_id.to_string(),
            therapist: therapist.to_string(),
            scheduled_at: when,
            price: None,
            payment: None,
            notes: None,
        }
    }

    fn manual_at(service_id: &str, therapist: &str, time: ClockTime) -> ManualRequest {
        ManualRequest {
            service_id: service_id.to_string(),
            therapist: therapist.to_string(),
            time: Some(time),
            column: None,
            addons: Vec::new(),
            payment: None,
            notes: None,
        }
    }

    #[test]
    fn test_scheduled_entry_is_inert() {
        let mut s = session_with(&[("D", &[THAI])]);
        let created = s
            .create_scheduled_entry(scheduled(THAI, "D", at(14, 0)), at(9, 0))
            .unwrap();

        assert!(created.entry.is_scheduled);
        assert_eq!(created.entry.scheduled_time, Some(at(14, 0)));
        assert_eq!(created.entry.time, ClockTime::new(14, 0));
        assert!(created
            .entry
            .notes
            .as_deref()
            .is_some_and(|n| n.starts_with(SCHEDULED_NOTE_PREFIX)));
        // No busy slot, no round accounting
        assert_eq!(s.current_round(), 1);
        assert!(!created.entry.is_active());
    }

    #[test]
    fn test_lead_time_violation_rejected() {
        // D already starts at 14:30; a 14:00 booking lands inside the
        // 60-minute lead window (13:30-14:30) and is rejected
        let mut s = session_with(&[("D", &[THAI])]);
        s.create_manual_entry(manual_at(THAI, "D", ClockTime::new(14, 30)), at(9, 0))
            .unwrap();

        let err = s
            .create_scheduled_entry(scheduled(THAI, "D", at(14, 0)), at(9, 0))
            .unwrap_err();
        assert!(matches!(err, AssignmentError::LeadTimeViolation { .. }));
    }

    #[test]
    fn test_booking_ending_inside_lead_window_rejected() {
        // Existing entry at 15:00; a 13:30-14:30 booking ends at 14:30,
        // inside the hour before 15:00
        let mut s = session_with(&[("D", &[THAI])]);
        s.create_manual_entry(manual_at(THAI, "D", ClockTime::new(15, 0)), at(9, 0))
            .unwrap();

        let err = s
            .create_scheduled_entry(scheduled(THAI, "D", at(13, 30)), at(9, 0))
            .unwrap_err();
        assert!(matches!(err, AssignmentError::LeadTimeViolation { .. }));
    }

    #[test]
    fn test_booking_with_enough_lead_accepted() {
        // Existing entry at 15:00; a 12:00-13:00 booking clears both sides
        let mut s = session_with(&[("D", &[THAI])]);
        s.create_manual_entry(manual_at(THAI, "D", ClockTime::new(15, 0)), at(9, 0))
            .unwrap();

        let created = s
            .create_scheduled_entry(scheduled(THAI, "D", at(12, 0)), at(9, 0))
            .unwrap();
        assert_eq!(created.entry.time, ClockTime::new(12, 0));
    }

    #[test]
    fn test_tomorrow_booking_clears_todays_board() {
        // D works 14:30 today; tomorrow 14:00 is a different day entirely
        let mut s = session_with(&[("D", &[THAI])]);
        s.create_manual_entry(manual_at(THAI, "D", ClockTime::new(14, 30)), at(9, 0))
            .unwrap();

        let created = s
            .create_scheduled_entry(scheduled(THAI, "D", on(24, 14, 0)), at(9, 0))
            .unwrap();
        assert_eq!(created.entry.scheduled_time, Some(on(24, 14, 0)));
    }

    #[test]
    fn test_bookings_on_different_days_do_not_collide() {
        let mut s = session_with(&[("D", &[THAI])]);
        s.create_scheduled_entry(scheduled(THAI, "D", on(24, 14, 0)), at(9, 0))
            .unwrap();

        // Same clock time two days out is fine
        let created = s
            .create_scheduled_entry(scheduled(THAI, "D", on(25, 14, 0)), at(9, 0))
            .unwrap();
        assert_eq!(created.entry.scheduled_time, Some(on(25, 14, 0)));
    }

    #[test]
    fn test_lead_time_applies_between_bookings_on_the_same_day() {
        let mut s = session_with(&[("D", &[THAI])]);
        s.create_scheduled_entry(scheduled(THAI, "D", on(24, 14, 30)), at(9, 0))
            .unwrap();

        let err = s
            .create_scheduled_entry(scheduled(THAI, "D", on(24, 14, 0)), at(9, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            AssignmentError::LeadTimeViolation { conflict_start, .. }
                if conflict_start == on(24, 14, 30)
        ));
    }

    #[test]
    fn test_past_time_rejected() {
        let mut s = session_with(&[("D", &[THAI])]);
        let err = s
            .create_scheduled_entry(scheduled(THAI, "D", at(9, 0)), at(10, 0))
            .unwrap_err();
        assert!(matches!(err, AssignmentError::ScheduledTimeInPast { .. }));
    }

    #[test]
    fn test_uncertified_therapist_rejected() {
        let mut s = session_with(&[("D", &[THAI])]);
        let err = s
            .create_scheduled_entry(scheduled(FOOT, "D", at(14, 0)), at(9, 0))
            .unwrap_err();
        assert!(matches!(err, AssignmentError::CertificationMismatch { .. }));
    }
}
