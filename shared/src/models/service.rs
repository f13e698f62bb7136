//! Service Catalog Model

use serde::{Deserialize, Serialize};

/// Fallback duration when the catalog does not specify one
pub const DEFAULT_SERVICE_DURATION_MINUTES: u32 = 60;

/// Catalog entry - static reference data owned by the services collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    /// Service ID
    pub id: String,
    /// Display name ("Thai", "Foot", ...)
    pub name: String,
    /// Base price
    pub price: f64,
    /// Base duration in minutes
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
}

fn default_duration() -> u32 {
    DEFAULT_SERVICE_DURATION_MINUTES
}

impl ServiceCatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            duration_minutes: DEFAULT_SERVICE_DURATION_MINUTES,
        }
    }

    /// Composite display label ("Thai 400")
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.price as i64)
    }
}
