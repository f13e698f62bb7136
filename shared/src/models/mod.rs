//! Domain models for the assignment board

pub mod entry;
pub mod payment;
pub mod service;
pub mod therapist;

// Re-exports
pub use entry::{ServiceEntry, SCHEDULED_NOTE_PREFIX};
pub use payment::PaymentInfo;
pub use service::ServiceCatalogEntry;
pub use therapist::Therapist;
