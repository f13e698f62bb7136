//! Broadcast events and board snapshots
//!
//! The engine publishes one event after each successful mutation; display
//! consumers either follow the event stream or poll the full snapshot.
//! Transport (WebSocket, SSE, same-process channel) is a collaborator
//! decision, not part of the core.

use crate::models::ServiceEntry;
use crate::types::ClockTime;
use serde::{Deserialize, Serialize};

/// Event envelope broadcast to display consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEvent {
    /// Event unique ID
    pub event_id: String,
    /// Session-scoped sequence number (for ordering)
    pub sequence: u64,
    /// Unix milliseconds
    pub timestamp: i64,
    /// Event payload
    pub payload: BoardEventPayload,
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardEventPayload {
    EntryCreated {
        entry: ServiceEntry,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        warnings: Vec<AssignmentWarning>,
    },
    GroupCreated {
        group_number: u32,
        entries: Vec<ServiceEntry>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        warnings: Vec<AssignmentWarning>,
    },
    ScheduledCreated {
        entry: ServiceEntry,
    },
    ScheduledActivated {
        entries: Vec<ServiceEntry>,
    },
    ServiceEnded {
        entry: ServiceEntry,
    },
    ServiceExtended {
        entry: ServiceEntry,
        added_minutes: u32,
        added_cost: f64,
    },
    ServiceChained {
        source_entry_id: String,
        entry: ServiceEntry,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        warnings: Vec<AssignmentWarning>,
    },
    RoundClosed {
        /// Round that just completed
        round: u32,
    },
    QueueResynced {
        queue: Vec<String>,
        next_index: usize,
    },
}

/// Recoverable deviation surfaced alongside a successful result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentWarning {
    /// Requested start time conflicted and was shifted to the next free slot
    TimeAdjusted {
        therapist: String,
        requested: ClockTime,
        corrected: ClockTime,
    },
    /// Manually chosen therapist lacked certification; rotation substituted
    TherapistSubstituted { requested: String, assigned: String },
    /// Group last-resort: therapist assigned despite being busy or already
    /// serving this group (availability over fairness)
    GroupFallback { therapist: String },
}

/// Verbatim board state for display consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub entries: Vec<ServiceEntry>,
    pub therapist_queue: Vec<String>,
    pub next_therapist_index: usize,
    pub current_round: u32,
}
