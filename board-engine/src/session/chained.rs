//! Chained-service command
//!
//! Appends a second service for the same therapist, starting exactly when the
//! source entry is due to end. Short chains share the source's round and
//! group; above the combined-duration threshold the new entry opens the
//! therapist's next round and leaves the group.

use chrono::{DateTime, Utc};
use shared::event::AssignmentWarning;
use shared::request::ChainedRequest;
use shared::AssignmentError;
use tracing::{info, warn};

use super::{CreatedEntry, ShopSession};
use crate::timing;

impl ShopSession {
    pub fn add_chained_service(
        &mut self,
        req: ChainedRequest,
        now: DateTime<Utc>,
    ) -> Result<CreatedEntry, AssignmentError> {
        let source = self.find_entry(&req.entry_id)?.clone();
        if source.is_completed() {
            return Err(AssignmentError::EntryAlreadyCompleted(source.id));
        }
        let service = self.resolve_service(&req.service_id)?;
        if !self.roster.is_certified(&source.therapist, &req.service_id) {
            return Err(AssignmentError::CertificationMismatch {
                therapist: source.therapist,
                service: req.service_id,
            });
        }

        let mut warnings = Vec::new();
        let chain_start = timing::entry_end(&self.catalog, &source);
        let start = if self.is_available_at(
            &source.therapist,
            chain_start,
            &service.name,
            0,
            Some(&source.id),
        ) {
            chain_start
        } else {
            let corrected = timing::next_available_time(
                &self.catalog,
                &self.entries,
                &source.therapist,
                self.clock_now(now),
            );
            warn!(
                therapist = %source.therapist,
                requested = %chain_start,
                corrected = %corrected,
                "Chained start conflicts, shifted to next free slot"
            );
            warnings.push(AssignmentWarning::TimeAdjusted {
                therapist: source.therapist.clone(),
                requested: chain_start,
                corrected,
            });
            corrected
        };

        let combined = timing::duration(&self.catalog, source.service_name(), source.extension())
            + timing::duration(&self.catalog, &service.name, 0);
        let over_threshold = combined > self.config.chain_round_threshold_minutes;

        let mut entry = self.new_entry(
            &source.therapist,
            &service,
            service.price,
            start,
            self.column_for(&source.therapist),
            if over_threshold {
                self.manual_round_for(&source.therapist)
            } else {
                source.round
            },
            req.payment,
            req.notes,
        );
        entry.group_number = if over_threshold {
            None
        } else {
            source.group_number
        };
        self.entries.push(entry.clone());

        info!(
            entry_id = %entry.id,
            source_entry_id = %source.id,
            therapist = %entry.therapist,
            service = %entry.service,
            start = %entry.time,
            combined_minutes = combined,
            new_round = over_threshold,
            "Chained service added"
        );
        Ok(CreatedEntry { entry, warnings })
    }
}
