//! Shared types for the assignment board
//!
//! Common types used by the engine and any transport layer: the service-entry
//! data model, operator request variants, broadcast events, error types, and
//! clock-time arithmetic.

pub mod error;
pub mod event;
pub mod models;
pub mod request;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AssignmentError, AssignmentErrorCode, ErrorDetail};
pub use event::{AssignmentWarning, BoardEvent, BoardEventPayload, BoardSnapshot};
pub use request::{
    Addon, AutoRequest, ChainedRequest, EntryRequest, GroupRequest, ManualRequest,
    ScheduledRequest, ServiceRequest,
};
pub use types::ClockTime;
