//! Operator request variants
//!
//! Each entry-creation path has its own validated request shape; the engine
//! dispatches on the variant instead of inspecting loose payloads.

use crate::models::PaymentInfo;
use crate::types::ClockTime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priced add-on selected alongside a service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Addon {
    pub name: String,
    pub price: f64,
}

/// One member of a group booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Requested service ID
    pub service_id: String,
}

/// Auto mode: therapist and start time resolved by the rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoRequest {
    pub service_id: String,
    #[serde(default)]
    pub addons: Vec<Addon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Manual mode: operator picks the therapist and optionally the start time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualRequest {
    pub service_id: String,
    /// Explicitly chosen therapist
    pub therapist: String,
    /// Requested start time; defaults to the therapist's next free slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    /// Pinned board column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(default)]
    pub addons: Vec<Addon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Group booking: several customers served simultaneously
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRequest {
    /// Member requests, resolved in submission order
    pub members: Vec<ServiceRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Future-dated booking, inert until activated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledRequest {
    pub service_id: String,
    pub therapist: String,
    /// When the service should begin
    pub scheduled_at: DateTime<Utc>,
    /// Operator price override (defaults to the catalog price)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Additional service chained onto an existing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainedRequest {
    /// Entry the new service is appended to
    pub entry_id: String,
    pub service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Tagged union over all entry-creation modes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryRequest {
    Auto(AutoRequest),
    Manual(ManualRequest),
    Group(GroupRequest),
    Scheduled(ScheduledRequest),
    Chained(ChainedRequest),
}
