//! Roster provider - who is clocked in and what they may perform
//!
//! The roster is owned by the kiosk/therapist-management collaborator; the
//! engine consumes it through `RosterProvider` and resyncs the fairness queue
//! whenever the caller signals a clock-in/out change.

use parking_lot::RwLock;
use shared::models::Therapist;
use std::collections::HashSet;

/// Read contract the engine needs from the roster collaborator
pub trait RosterProvider: Send + Sync {
    /// Names of therapists currently clocked in, in roster order
    fn list_clocked_in(&self) -> Vec<String>;

    /// Full therapist record, if known
    fn therapist(&self, name: &str) -> Option<Therapist>;

    /// All known therapists, in roster order
    fn list_all(&self) -> Vec<Therapist>;

    fn is_certified(&self, name: &str, service_id: &str) -> bool {
        self.therapist(name)
            .map(|t| t.is_certified(service_id))
            .unwrap_or(false)
    }
}

/// In-memory roster with kiosk-style clock-in/out
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    inner: RwLock<RosterInner>,
}

#[derive(Debug, Default)]
struct RosterInner {
    therapists: Vec<Therapist>,
    clocked_in: HashSet<String>,
}

impl InMemoryRoster {
    pub fn new(therapists: Vec<Therapist>) -> Self {
        Self {
            inner: RwLock::new(RosterInner {
                therapists,
                clocked_in: HashSet::new(),
            }),
        }
    }

    pub fn clock_in(&self, name: &str) {
        let mut inner = self.inner.write();
        if inner.therapists.iter().any(|t| t.name == name) {
            inner.clocked_in.insert(name.to_string());
            tracing::info!(therapist = %name, "Therapist clocked in");
        } else {
            tracing::warn!(therapist = %name, "Clock-in for unknown therapist ignored");
        }
    }

    pub fn clock_out(&self, name: &str) {
        let mut inner = self.inner.write();
        if inner.clocked_in.remove(name) {
            tracing::info!(therapist = %name, "Therapist clocked out");
        }
    }
}

impl RosterProvider for InMemoryRoster {
    fn list_clocked_in(&self) -> Vec<String> {
        let inner = self.inner.read();
        inner
            .therapists
            .iter()
            .filter(|t| inner.clocked_in.contains(&t.name))
            .map(|t| t.name.clone())
            .collect()
    }

    fn therapist(&self, name: &str) -> Option<Therapist> {
        self.inner
            .read()
            .therapists
            .iter()
            .find(|t| t.name == name)
            .cloned()
    }

    fn list_all(&self) -> Vec<Therapist> {
        self.inner.read().therapists.clone()
    }
}
