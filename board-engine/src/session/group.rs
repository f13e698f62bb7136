//! Group-booking command
//!
//! Several customers served simultaneously in one transaction. Members are
//! resolved in submission order against the evolving board state, with an
//! in-flight exclusion set so no therapist is assigned twice within the
//! group. When nobody eligible remains for a member, the last-resort
//! fallback assigns any certified therapist anyway (availability over
//! fairness) and flags the exception to the operator.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use shared::event::AssignmentWarning;
use shared::request::GroupRequest;
use shared::AssignmentError;
use tracing::{info, warn};

use super::{CreatedGroup, ShopSession};
use crate::timing;

impl ShopSession {
    pub fn create_group_entries(
        &mut self,
        req: GroupRequest,
        now: DateTime<Utc>,
    ) -> Result<CreatedGroup, AssignmentError> {
        if req.members.is_empty() {
            return Err(AssignmentError::InvalidOperation(
                "group booking needs at least one member".to_string(),
            ));
        }

        // Validate the whole group before touching any state: every service
        // must resolve and have at least one certified eligible therapist,
        // so a later member cannot fail a half-applied transaction.
        let eligible = self.eligible_therapists();
        for member in &req.members {
            self.resolve_service(&member.service_id)?;
            let anyone_certified = eligible
                .iter()
                .any(|name| self.roster.is_certified(name, &member.service_id));
            if !anyone_certified {
                return Err(AssignmentError::InvalidGroupComposition {
                    service: member.service_id.clone(),
                });
            }
        }

        let group_number = self.next_group_number;
        let mut in_group: HashSet<String> = HashSet::new();
        let mut entries = Vec::with_capacity(req.members.len());
        let mut warnings = Vec::new();

        for member in &req.members {
            let service = self.resolve_service(&member.service_id)?;

            let therapist = match self.select_candidate(&member.service_id, &in_group) {
                Some(name) => name,
                None => {
                    // Last resort: any certified therapist, busy or already
                    // in this group. Never leaves a group member unassigned.
                    let fallback = self
                        .eligible_therapists()
                        .into_iter()
                        .find(|name| self.roster.is_certified(name, &member.service_id))
                        .ok_or_else(|| AssignmentError::InvalidGroupComposition {
                            service: member.service_id.clone(),
                        })?;
                    warn!(
                        therapist = %fallback,
                        service = %member.service_id,
                        group_number,
                        "Group fallback: assigning despite busy/group exclusivity"
                    );
                    warnings.push(AssignmentWarning::GroupFallback {
                        therapist: fallback.clone(),
                    });
                    fallback
                }
            };

            let start = timing::next_available_time(
                &self.catalog,
                &self.entries,
                &therapist,
                self.clock_now(now),
            );
            let mut entry = self.new_entry(
                &therapist,
                &service,
                service.price,
                start,
                self.column_for(&therapist),
                self.current_round(),
                req.payment.clone(),
                req.notes.clone(),
            );
            entry.group_number = Some(group_number);
            self.entries.push(entry.clone());

            // Bookkeeping runs member by member: a mid-group round rollover
            // changes the state the remaining members resolve against
            self.record_and_rotate(&therapist);
            in_group.insert(therapist);
            entries.push(entry);
        }

        self.next_group_number += 1;
        info!(
            group_number,
            members = entries.len(),
            therapists = ?entries.iter().map(|e| e.therapist.as_str()).collect::<Vec<_>>(),
            "Group booking created"
        );
        Ok(CreatedGroup {
            group_number,
            entries,
            warnings,
        })
    }
}
