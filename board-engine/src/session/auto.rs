//! Auto-assignment command
//!
//! The rotation decides both the therapist and the start time.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use shared::request::AutoRequest;
use shared::AssignmentError;
use tracing::info;

use super::{compose_notes, total_price, CreatedEntry, ShopSession};
use crate::timing;

impl ShopSession {
    pub fn create_auto_entry(
        &mut self,
        req: AutoRequest,
        now: DateTime<Utc>,
    ) -> Result<CreatedEntry, AssignmentError> {
        let service = self.resolve_service(&req.service_id)?;

        let therapist = self
            .select_candidate(&req.service_id, &HashSet::new())
            .ok_or_else(|| AssignmentError::NoEligibleTherapist {
                service: req.service_id.clone(),
            })?;

        let start = timing::next_available_time(
            &self.catalog,
            &self.entries,
            &therapist,
            self.clock_now(now),
        );
        let entry = self.new_entry(
            &therapist,
            &service,
            total_price(service.price, &req.addons),
            start,
            self.column_for(&therapist),
            self.current_round(),
            req.payment,
            compose_notes(req.notes, &req.addons),
        );

        self.entries.push(entry.clone());
        self.record_and_rotate(&therapist);

        info!(
            entry_id = %entry.id,
            therapist = %therapist,
            service = %entry.service,
            start = %entry.time,
            round = entry.round,
            "Auto entry created"
        );
        Ok(CreatedEntry {
            entry,
            warnings: Vec::new(),
        })
    }
}
