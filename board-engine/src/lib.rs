//! Round-robin assignment engine for the daily service board
//!
//! This crate implements the manager-side core of the shop: deciding which
//! on-duty therapist receives each new service request while keeping the
//! rotation fair across an unbounded stream of entries.
//!
//! # Architecture
//!
//! ```text
//! Operator request → BoardManager → ShopSession (single write lock)
//!                         │              ├─ FairnessQueue (rotation + cursor)
//!                         │              ├─ RoundTracker  (fairness cycles)
//!                         │              ├─ timing        (durations/conflicts)
//!                         │              └─ RosterProvider / ServiceCatalog
//!                         └─ broadcast BoardEvent → display consumers
//! ```
//!
//! Every operator action runs as one synchronous read-compute-write
//! transaction against the session aggregate; the only background activity is
//! the scheduled-booking activation sweep.

pub mod activator;
pub mod catalog;
pub mod config;
pub mod manager;
pub mod queue;
pub mod roster;
pub mod rounds;
pub mod session;
pub mod timing;

// Re-exports
pub use activator::ActivationScheduler;
pub use catalog::ServiceCatalog;
pub use config::EngineConfig;
pub use manager::{BoardManager, SubmitOutcome};
pub use queue::FairnessQueue;
pub use roster::{InMemoryRoster, RosterProvider};
pub use rounds::RoundTracker;
pub use session::{CreatedEntry, CreatedGroup, ExtensionOutcome, ShopSession};
