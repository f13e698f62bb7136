//! Therapist Model

use serde::{Deserialize, Serialize};

/// Therapist record - identity plus the services they may perform
///
/// Clock-in state is owned by the roster collaborator, not this record;
/// the certification set is immutable for the duration of a shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Therapist {
    /// Display name (unique within the shop)
    pub name: String,
    /// Service IDs this therapist is certified for
    #[serde(default)]
    pub certified_services: Vec<String>,
    /// Commission percentage (0-100), used by reporting collaborators
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
}

fn default_commission_rate() -> f64 {
    50.0
}

impl Therapist {
    pub fn new(name: impl Into<String>, certified_services: Vec<String>) -> Self {
        Self {
            name: name.into(),
            certified_services,
            commission_rate: default_commission_rate(),
        }
    }

    pub fn is_certified(&self, service_id: &str) -> bool {
        self.certified_services.iter().any(|s| s == service_id)
    }
}
