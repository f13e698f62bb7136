//! Scheduled-booking activation sweep
//!
//! Promotes scheduled entries into active ones once their time arrives.
//! Every pending booking with `scheduled_time <= now` is activated, so
//! bookings missed while the process was down fire retroactively on the
//! next sweep.

use chrono::{DateTime, Utc};
use shared::models::ServiceEntry;
use tracing::{info, warn};

use super::ShopSession;

impl ShopSession {
    /// One activation sweep; returns the entries transitioned this tick
    pub fn tick_scheduled_activation(&mut self, now: DateTime<Utc>) -> Vec<ServiceEntry> {
        let activation_time = self.clock_now(now);
        let grace = chrono::Duration::seconds(self.config.activation_grace_secs);
        let mut activated = Vec::new();

        for entry in &mut self.entries {
            if !entry.is_scheduled || entry.is_completed() {
                continue;
            }
            let Some(scheduled_time) = entry.scheduled_time else {
                continue;
            };
            if scheduled_time > now {
                continue;
            }

            if now - scheduled_time > grace {
                warn!(
                    entry_id = %entry.id,
                    therapist = %entry.therapist,
                    scheduled_time = %scheduled_time,
                    "Activating scheduled booking late"
                );
            }
            entry.time = activation_time;
            entry.is_scheduled = false;
            entry.scheduled_time = None;
            entry.strip_scheduled_marker();
            info!(
                entry_id = %entry.id,
                therapist = %entry.therapist,
                service = %entry.service,
                start = %entry.time,
                "Scheduled booking activated"
            );
            activated.push(entry.clone());
        }
        activated
    }
}

#[cfg(test)]
mod tests {
    use crate::session::testing::*;
    use shared::request::ScheduledRequest;
    use shared::types::ClockTime;

    fn scheduled(therapist: &str, when: chrono::DateTime<chrono::Utc>) -> ScheduledRequest {
        ScheduledRequest {
            service_id: THAI.to_string(),
            therapist: therapist.to_string(),
            scheduled_at: when,
            price: None,
            payment: None,
            notes: Some("bring towels".to_string()),
        }
    }

    #[test]
    fn test_activation_promotes_due_bookings() {
        let mut s = session_with(&[("D", &[THAI])]);
        s.create_scheduled_entry(scheduled("D", at(14, 0)), at(9, 0))
            .unwrap();

        // Not due yet
        assert!(s.tick_scheduled_activation(at(13, 59)).is_empty());

        let activated = s.tick_scheduled_activation(at(14, 0));
        assert_eq!(activated.len(), 1);
        let entry = &activated[0];
        assert!(!entry.is_scheduled);
        assert_eq!(entry.scheduled_time, None);
        assert_eq!(entry.time, ClockTime::new(14, 0));
        // Marker stripped, operator text kept
        assert_eq!(entry.notes.as_deref(), Some("bring towels"));
        assert!(entry.is_active());

        // Idempotent: nothing left to activate
        assert!(s.tick_scheduled_activation(at(14, 1)).is_empty());
    }

    #[test]
    fn test_missed_booking_fires_retroactively() {
        let mut s = session_with(&[("D", &[THAI])]);
        s.create_scheduled_entry(scheduled("D", at(14, 0)), at(9, 0))
            .unwrap();

        // First sweep long after the scheduled time still activates,
        // stamping the actual activation clock time
        let activated = s.tick_scheduled_activation(at(16, 30));
        assert_eq!(activated.len(), 1);
        assert_eq!(activated[0].time, ClockTime::new(16, 30));
    }
}
