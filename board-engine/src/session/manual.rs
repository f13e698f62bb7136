//! Manual-assignment command
//!
//! The operator picks the therapist and optionally the start time. The
//! rotation is not consulted unless the chosen therapist lacks certification,
//! and manual entries never participate in round accounting.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use shared::event::AssignmentWarning;
use shared::request::ManualRequest;
use shared::AssignmentError;
use tracing::{info, warn};

use super::{compose_notes, total_price, CreatedEntry, ShopSession};
use crate::timing;

impl ShopSession {
    pub fn create_manual_entry(
        &mut self,
        req: ManualRequest,
        now: DateTime<Utc>,
    ) -> Result<CreatedEntry, AssignmentError> {
        let service = self.resolve_service(&req.service_id)?;
        if self.roster.therapist(&req.therapist).is_none() {
            return Err(AssignmentError::UnknownTherapist(req.therapist));
        }

        let mut warnings = Vec::new();

        // Certification gate: an uncertified pick falls back to the rotation
        let therapist = if self.roster.is_certified(&req.therapist, &req.service_id) {
            req.therapist.clone()
        } else {
            let substitute = self
                .select_candidate(&req.service_id, &HashSet::new())
                .ok_or_else(|| AssignmentError::NoEligibleTherapist {
                    service: req.service_id.clone(),
                })?;
            warn!(
                requested = %req.therapist,
                assigned = %substitute,
                service = %req.service_id,
                "Requested therapist not certified, rotation substituted"
            );
            warnings.push(AssignmentWarning::TherapistSubstituted {
                requested: req.therapist.clone(),
                assigned: substitute.clone(),
            });
            substitute
        };

        let next_free = timing::next_available_time(
            &self.catalog,
            &self.entries,
            &therapist,
            self.clock_now(now),
        );
        let start = match req.time {
            Some(requested)
                if !self.is_available_at(&therapist, requested, &service.name, 0, None) =>
            {
                warn!(
                    therapist = %therapist,
                    requested = %requested,
                    corrected = %next_free,
                    "Requested start time conflicts, shifted to next free slot"
                );
                warnings.push(AssignmentWarning::TimeAdjusted {
                    therapist: therapist.clone(),
                    requested,
                    corrected: next_free,
                });
                next_free
            }
            Some(requested) => requested,
            None => next_free,
        };

        let entry = self.new_entry(
            &therapist,
            &service,
            total_price(service.price, &req.addons),
            start,
            req.column.unwrap_or_else(|| self.column_for(&therapist)),
            self.manual_round_for(&therapist),
            req.payment,
            compose_notes(req.notes, &req.addons),
        );
        self.entries.push(entry.clone());

        info!(
            entry_id = %entry.id,
            therapist = %therapist,
            service = %entry.service,
            start = %entry.time,
            round = entry.round,
            "Manual entry created"
        );
        Ok(CreatedEntry { entry, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;
    use shared::types::ClockTime;

    fn manual(service_id: &str, therapist: &str) -> ManualRequest {
        ManualRequest {
            service_id: service_id.to_string(),
            therapist: therapist.to_string(),
            time: None,
            column: None,
            addons: Vec::new(),
            payment: None,
            notes: None,
        }
    }

    #[test]
    fn test_conflict_shifts_to_next_free_slot() {
        // C busy 10:00-11:00; requesting 10:30 corrects to 11:00 with warning
        let mut s = session_with(&[("C", &[THAI, FOOT])]);
        let mut first = manual(THAI, "C");
        first.time = Some(ClockTime::new(10, 0));
        s.create_manual_entry(first, at(10, 0)).unwrap();

        let mut second = manual(FOOT, "C");
        second.time = Some(ClockTime::new(10, 30));
        let created = s.create_manual_entry(second, at(10, 30)).unwrap();

        assert_eq!(created.entry.time, ClockTime::new(11, 0));
        assert_eq!(
            created.warnings,
            vec![AssignmentWarning::TimeAdjusted {
                therapist: "C".to_string(),
                requested: ClockTime::new(10, 30),
                corrected: ClockTime::new(11, 0),
            }]
        );
    }

    #[test]
    fn test_uncertified_pick_substitutes_from_rotation() {
        let mut s = session_with(&[("A", &[THAI]), ("B", &[FOOT])]);
        let created = s.create_manual_entry(manual(FOOT, "A"), at(10, 0)).unwrap();

        assert_eq!(created.entry.therapist, "B");
        assert_eq!(
            created.warnings,
            vec![AssignmentWarning::TherapistSubstituted {
                requested: "A".to_string(),
                assigned: "B".to_string(),
            }]
        );
    }

    #[test]
    fn test_manual_entries_skip_round_accounting() {
        let mut s = session_with(&[("A", &[THAI]), ("B", &[THAI])]);
        s.create_manual_entry(manual(THAI, "A"), at(10, 0)).unwrap();
        s.create_manual_entry(manual(THAI, "B"), at(10, 0)).unwrap();

        // Both therapists served, but manual entries never close the round
        assert_eq!(s.current_round(), 1);
        assert_eq!(s.queue().order(), ["A", "B"]);
        assert_eq!(s.queue().cursor(), 0);
    }

    #[test]
    fn test_manual_round_is_next_for_therapist() {
        let mut s = session_with(&[("A", &[THAI])]);
        let first = s.create_manual_entry(manual(THAI, "A"), at(10, 0)).unwrap();
        assert_eq!(first.entry.round, 1);
        s.end_service(&first.entry.id, at(11, 0)).unwrap();

        let second = s.create_manual_entry(manual(THAI, "A"), at(11, 0)).unwrap();
        assert_eq!(second.entry.round, 2);
    }

    #[test]
    fn test_unknown_therapist_rejected() {
        let mut s = session_with(&[("A", &[THAI])]);
        let err = s
            .create_manual_entry(manual(THAI, "Nobody"), at(10, 0))
            .unwrap_err();
        assert!(matches!(err, AssignmentError::UnknownTherapist(_)));
    }
}
