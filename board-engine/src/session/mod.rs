//! Shop session aggregate
//!
//! All board state for one business day lives here: the append-only entry
//! list, the fairness queue, and the round tracker. Every operator command is
//! a synchronous read-compute-write transaction against this aggregate; the
//! `BoardManager` facade provides the locking and event broadcast around it.

mod activation;
mod auto;
mod chained;
mod group;
mod lifecycle;
mod manual;
mod scheduled;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::event::{AssignmentWarning, BoardSnapshot};
use shared::models::{PaymentInfo, ServiceCatalogEntry, ServiceEntry};
use shared::request::Addon;
use shared::types::ClockTime;
use shared::AssignmentError;
use uuid::Uuid;

use crate::catalog::ServiceCatalog;
use crate::config::EngineConfig;
use crate::queue::FairnessQueue;
use crate::roster::RosterProvider;
use crate::rounds::RoundTracker;
use crate::timing;

/// Result of a single entry-creation command
#[derive(Debug, Clone)]
pub struct CreatedEntry {
    pub entry: ServiceEntry,
    /// Recoverable deviations applied while resolving the request
    pub warnings: Vec<AssignmentWarning>,
}

/// Result of a group-booking transaction
#[derive(Debug, Clone)]
pub struct CreatedGroup {
    pub group_number: u32,
    pub entries: Vec<ServiceEntry>,
    pub warnings: Vec<AssignmentWarning>,
}

/// Result of a service extension
#[derive(Debug, Clone)]
pub struct ExtensionOutcome {
    pub entry: ServiceEntry,
    pub added_minutes: u32,
    pub added_cost: f64,
}

/// In-memory board state for one shop session
pub struct ShopSession {
    config: EngineConfig,
    catalog: ServiceCatalog,
    roster: Arc<dyn RosterProvider>,
    entries: Vec<ServiceEntry>,
    queue: FairnessQueue,
    rounds: RoundTracker,
    next_group_number: u32,
}

impl ShopSession {
    pub fn new(
        config: EngineConfig,
        catalog: ServiceCatalog,
        roster: Arc<dyn RosterProvider>,
    ) -> Self {
        let mut session = Self {
            config,
            catalog,
            roster,
            entries: Vec::new(),
            queue: FairnessQueue::new(),
            rounds: RoundTracker::new(),
            next_group_number: 1,
        };
        session.resync_queue();
        session
    }

    // ===== Read surface =====

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn entries(&self) -> &[ServiceEntry] {
        &self.entries
    }

    pub fn queue(&self) -> &FairnessQueue {
        &self.queue
    }

    pub fn current_round(&self) -> u32 {
        self.rounds.current_round()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            entries: self.entries.clone(),
            therapist_queue: self.queue.order().to_vec(),
            next_therapist_index: self.queue.cursor(),
            current_round: self.rounds.current_round(),
        }
    }

    /// Clocked-in therapists with at least one certification, in roster order
    pub fn eligible_therapists(&self) -> Vec<String> {
        self.roster
            .list_clocked_in()
            .into_iter()
            .filter(|name| {
                self.roster
                    .therapist(name)
                    .map(|t| !t.certified_services.is_empty())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Therapists occupied by an active entry right now
    fn busy_set(&self) -> HashSet<String> {
        self.entries
            .iter()
            .filter(|e| e.is_active())
            .map(|e| e.therapist.clone())
            .collect()
    }

    /// Whether `therapist` is free for `[start, start+duration)`, ignoring
    /// completed entries and `exclude_entry_id`
    fn is_available_at(
        &self,
        therapist: &str,
        start: ClockTime,
        service_name: &str,
        extended_minutes: u32,
        exclude_entry_id: Option<&str>,
    ) -> bool {
        let end = timing::end_time(&self.catalog, start, service_name, extended_minutes);
        !self.entries.iter().any(|e| {
            e.therapist == therapist
                && e.is_open()
                && exclude_entry_id != Some(e.id.as_str())
                && timing::overlaps(start, end, e.time, timing::entry_end(&self.catalog, e))
        })
    }

    // ===== Queue and round maintenance =====

    /// Reconcile queue membership with the eligible roster (clock-in/out)
    pub fn resync_queue(&mut self) {
        let eligible = self.eligible_therapists();
        self.queue.resync(&eligible);
        tracing::debug!(
            queue = ?self.queue.order(),
            cursor = self.queue.cursor(),
            "Fairness queue resynced"
        );
    }

    /// Rotation selection for auto-assigned work: certified, not busy, not in
    /// `excluded`, preferring the cursor target if fresh this round, then the
    /// first fresh candidate in queue order, then the first candidate.
    fn select_candidate(&self, service_id: &str, excluded: &HashSet<String>) -> Option<String> {
        let busy = self.busy_set();
        let candidates: Vec<&str> = self
            .queue
            .order()
            .iter()
            .map(String::as_str)
            .filter(|name| {
                self.roster.is_certified(name, service_id)
                    && !busy.contains(*name)
                    && !excluded.contains(*name)
            })
            .collect();
        if candidates.is_empty() {
            return None;
        }

        if let Some(target) = self.queue.cursor_target() {
            if candidates.contains(&target) && self.rounds.is_fresh(target) {
                return Some(target.to_string());
            }
        }
        candidates
            .iter()
            .find(|name| self.rounds.is_fresh(name))
            .or(candidates.first())
            .map(|name| name.to_string())
    }

    /// Post-creation rotation bookkeeping for an auto-assigned entry. Round
    /// closing takes precedence over the normal advance: completing the round
    /// resets the queue to the roster instead.
    fn record_and_rotate(&mut self, therapist: &str) {
        if !self.queue.contains(therapist) {
            return;
        }
        if self.queue.cursor_target() != Some(therapist) {
            self.queue.promote_to_front(therapist);
        }
        let eligible = self.eligible_therapists();
        if self.rounds.record_assignment(therapist, &eligible) {
            let closed = self.rounds.current_round();
            self.rounds.close_round();
            self.queue.reset_to_roster(eligible);
            tracing::info!(
                round = closed,
                next_round = self.rounds.current_round(),
                "Round completed, queue reset to roster"
            );
        } else {
            self.queue.advance_after_assignment(therapist);
        }
    }

    /// Round for a manually-timed entry: next round number for this
    /// therapist, or the current round if they have no entries yet
    fn manual_round_for(&self, therapist: &str) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.therapist == therapist)
            .map(|e| e.round)
            .max()
            .map(|max| max + 1)
            .unwrap_or_else(|| self.rounds.current_round())
    }

    /// Next display column for a therapist (1-based)
    fn column_for(&self, therapist: &str) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.therapist == therapist)
            .map(|e| e.column)
            .max()
            .map(|max| max + 1)
            .unwrap_or(1)
    }

    // ===== Construction helpers =====

    fn resolve_service(&self, service_id: &str) -> Result<ServiceCatalogEntry, AssignmentError> {
        self.catalog
            .get(service_id)
            .cloned()
            .ok_or_else(|| AssignmentError::UnknownService(service_id.to_string()))
    }

    fn clock_now(&self, now: DateTime<Utc>) -> ClockTime {
        timing::clock_time(now, self.config.timezone)
    }

    fn new_entry(
        &self,
        therapist: &str,
        service: &ServiceCatalogEntry,
        price: f64,
        time: ClockTime,
        column: u32,
        round: u32,
        payment: Option<PaymentInfo>,
        notes: Option<String>,
    ) -> ServiceEntry {
        ServiceEntry {
            id: Uuid::new_v4().to_string(),
            therapist: therapist.to_string(),
            service: service.label(),
            price,
            original_price: None,
            time,
            end_time: None,
            extended_minutes: None,
            column,
            round,
            group_number: None,
            payment,
            scheduled_time: None,
            is_scheduled: false,
            notes,
        }
    }

    fn find_entry(&self, entry_id: &str) -> Result<&ServiceEntry, AssignmentError> {
        self.entries
            .iter()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| AssignmentError::EntryNotFound(entry_id.to_string()))
    }

    fn find_entry_mut(&mut self, entry_id: &str) -> Result<&mut ServiceEntry, AssignmentError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| AssignmentError::EntryNotFound(entry_id.to_string()))
    }
}

/// Fold priced add-ons into the operator notes ("notes; Add-ons: Hot Oil")
fn compose_notes(notes: Option<String>, addons: &[Addon]) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(n) = notes {
        if !n.is_empty() {
            parts.push(n);
        }
    }
    if !addons.is_empty() {
        let names: Vec<&str> = addons.iter().map(|a| a.name.as_str()).collect();
        parts.push(format!("Add-ons: {}", names.join(", ")));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

/// Base price plus add-on prices
fn total_price(base: f64, addons: &[Addon]) -> f64 {
    base + addons.iter().map(|a| a.price).sum::<f64>()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for the session command tests

    use super::*;
    use crate::roster::InMemoryRoster;
    use shared::models::Therapist;

    pub const THAI: &str = "1";
    pub const FOOT: &str = "2";
    pub const HERBAL: &str = "3";

    pub fn catalog() -> ServiceCatalog {
        let mut herbal = ServiceCatalogEntry::new(HERBAL, "Herbal", 600.0);
        herbal.duration_minutes = 90;
        ServiceCatalog::new(vec![
            ServiceCatalogEntry::new(THAI, "Thai", 400.0),
            ServiceCatalogEntry::new(FOOT, "Foot", 300.0),
            herbal,
        ])
    }

    /// Roster of (name, certified service ids); everyone starts clocked in
    pub fn session_with(roster: &[(&str, &[&str])]) -> ShopSession {
        let therapists = roster
            .iter()
            .map(|(name, services)| {
                Therapist::new(
                    *name,
                    services.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        let provider = InMemoryRoster::new(therapists);
        for (name, _) in roster {
            provider.clock_in(name);
        }
        ShopSession::new(EngineConfig::default(), catalog(), Arc::new(provider))
    }

    /// A clock time on a fixed date, expressed in the session's business
    /// timezone
    pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        on(23, hour, minute)
    }

    /// Same, on an explicit day of the fixture month
    pub fn on(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        use chrono::TimeZone;
        chrono_tz::Asia::Bangkok
            .with_ymd_and_hms(2026, 8, day, hour, minute, 0)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now)
    }
}
