//! Board manager - the operator-facing API surface
//!
//! Wraps the session aggregate behind a single write lock so every command
//! runs as one atomic transaction, and broadcasts a `BoardEvent` after each
//! successful mutation. Display consumers subscribe to the event stream or
//! poll the full snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::event::{AssignmentWarning, BoardEvent, BoardEventPayload, BoardSnapshot};
use shared::models::ServiceEntry;
use shared::request::{
    AutoRequest, ChainedRequest, EntryRequest, GroupRequest, ManualRequest, ScheduledRequest,
};
use shared::AssignmentError;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::catalog::ServiceCatalog;
use crate::config::EngineConfig;
use crate::roster::RosterProvider;
use crate::session::{CreatedEntry, CreatedGroup, ShopSession};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Result of a dispatched tagged request: the entries created by whichever
/// mode it resolved to, plus any recoverable deviations applied on the way
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub entries: Vec<ServiceEntry>,
    pub warnings: Vec<AssignmentWarning>,
}

impl From<CreatedEntry> for SubmitOutcome {
    fn from(created: CreatedEntry) -> Self {
        Self {
            entries: vec![created.entry],
            warnings: created.warnings,
        }
    }
}

impl From<CreatedGroup> for SubmitOutcome {
    fn from(created: CreatedGroup) -> Self {
        Self {
            entries: created.entries,
            warnings: created.warnings,
        }
    }
}

pub struct BoardManager {
    session: RwLock<ShopSession>,
    event_tx: broadcast::Sender<BoardEvent>,
    sequence: AtomicU64,
}

impl BoardManager {
    pub fn new(
        config: EngineConfig,
        catalog: ServiceCatalog,
        roster: Arc<dyn RosterProvider>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            session: RwLock::new(ShopSession::new(config, catalog, roster)),
            event_tx,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.event_tx.subscribe()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.session.read().snapshot()
    }

    pub fn config(&self) -> EngineConfig {
        self.session.read().config().clone()
    }

    // ===== Entry creation =====

    /// Dispatch a tagged request from a transport layer
    pub fn submit(&self, request: EntryRequest) -> Result<SubmitOutcome, AssignmentError> {
        match request {
            EntryRequest::Auto(req) => self.create_auto_entry(req).map(SubmitOutcome::from),
            EntryRequest::Manual(req) => self.create_manual_entry(req).map(SubmitOutcome::from),
            EntryRequest::Group(req) => self.create_group_entries(req).map(SubmitOutcome::from),
            EntryRequest::Scheduled(req) => {
                self.create_scheduled_entry(req).map(SubmitOutcome::from)
            }
            EntryRequest::Chained(req) => self.add_chained_service(req).map(SubmitOutcome::from),
        }
    }

    pub fn create_auto_entry(&self, req: AutoRequest) -> Result<CreatedEntry, AssignmentError> {
        let mut session = self.session.write();
        let before = session.current_round();
        let created = session.create_auto_entry(req, Utc::now())?;
        let after = session.current_round();
        self.publish(BoardEventPayload::EntryCreated {
            entry: created.entry.clone(),
            warnings: created.warnings.clone(),
        });
        self.publish_closed_rounds(before..after);
        Ok(created)
    }

    pub fn create_manual_entry(
        &self,
        req: ManualRequest,
    ) -> Result<CreatedEntry, AssignmentError> {
        let mut session = self.session.write();
        let created = session.create_manual_entry(req, Utc::now())?;
        self.publish(BoardEventPayload::EntryCreated {
            entry: created.entry.clone(),
            warnings: created.warnings.clone(),
        });
        Ok(created)
    }

    pub fn create_group_entries(
        &self,
        req: GroupRequest,
    ) -> Result<CreatedGroup, AssignmentError> {
        let mut session = self.session.write();
        let before = session.current_round();
        let created = session.create_group_entries(req, Utc::now())?;
        let after = session.current_round();
        self.publish(BoardEventPayload::GroupCreated {
            group_number: created.group_number,
            entries: created.entries.clone(),
            warnings: created.warnings.clone(),
        });
        self.publish_closed_rounds(before..after);
        Ok(created)
    }

    pub fn create_scheduled_entry(
        &self,
        req: ScheduledRequest,
    ) -> Result<CreatedEntry, AssignmentError> {
        let mut session = self.session.write();
        let created = session.create_scheduled_entry(req, Utc::now())?;
        self.publish(BoardEventPayload::ScheduledCreated {
            entry: created.entry.clone(),
        });
        Ok(created)
    }

    pub fn add_chained_service(
        &self,
        req: ChainedRequest,
    ) -> Result<CreatedEntry, AssignmentError> {
        let source_entry_id = req.entry_id.clone();
        let mut session = self.session.write();
        let created = session.add_chained_service(req, Utc::now())?;
        self.publish(BoardEventPayload::ServiceChained {
            source_entry_id,
            entry: created.entry.clone(),
            warnings: created.warnings.clone(),
        });
        Ok(created)
    }

    // ===== Lifecycle =====

    pub fn end_service(&self, entry_id: &str) -> Result<ServiceEntry, AssignmentError> {
        let mut session = self.session.write();
        let ended = session.end_service(entry_id, Utc::now())?;
        self.publish(BoardEventPayload::ServiceEnded {
            entry: ended.clone(),
        });
        Ok(ended)
    }

    pub fn extend_service(
        &self,
        entry_id: &str,
        minutes: u32,
    ) -> Result<ServiceEntry, AssignmentError> {
        let mut session = self.session.write();
        let outcome = session.extend_service(entry_id, minutes)?;
        self.publish(BoardEventPayload::ServiceExtended {
            entry: outcome.entry.clone(),
            added_minutes: outcome.added_minutes,
            added_cost: outcome.added_cost,
        });
        Ok(outcome.entry)
    }

    // ===== Background / collaborator notifications =====

    /// Activation sweep entry point, driven by the `ActivationScheduler`
    pub fn tick_scheduled_activation(&self, now: DateTime<Utc>) -> Vec<ServiceEntry> {
        let mut session = self.session.write();
        let activated = session.tick_scheduled_activation(now);
        if !activated.is_empty() {
            self.publish(BoardEventPayload::ScheduledActivated {
                entries: activated.clone(),
            });
        }
        activated
    }

    /// Roster change notification (clock-in/out): resync the fairness queue
    pub fn resync_roster(&self) {
        let mut session = self.session.write();
        session.resync_queue();
        let q = session.queue();
        self.publish(BoardEventPayload::QueueResynced {
            queue: q.order().to_vec(),
            next_index: q.cursor(),
        });
    }

    // ===== Event plumbing =====

    /// Called with the session write lock held: sequence numbers are assigned
    /// and events sent inside the transaction, so the broadcast order always
    /// matches mutation order under concurrent commands
    fn publish(&self, payload: BoardEventPayload) {
        let event = BoardEvent {
            event_id: Uuid::new_v4().to_string(),
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            timestamp: Utc::now().timestamp_millis(),
            payload,
        };
        // A send error only means nobody is subscribed right now
        let _ = self.event_tx.send(event);
    }

    fn publish_closed_rounds(&self, rounds: std::ops::Range<u32>) {
        for round in rounds {
            self.publish(BoardEventPayload::RoundClosed { round });
        }
    }
}
