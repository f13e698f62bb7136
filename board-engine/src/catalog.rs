//! Service catalog lookup
//!
//! Static reference data owned by the services-management collaborator; the
//! engine only reads it.

use shared::models::service::DEFAULT_SERVICE_DURATION_MINUTES;
use shared::models::ServiceCatalogEntry;

/// Read-only view over the shop's service list
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: Vec<ServiceCatalogEntry>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<ServiceCatalogEntry>) -> Self {
        Self { services }
    }

    pub fn get(&self, service_id: &str) -> Option<&ServiceCatalogEntry> {
        self.services.iter().find(|s| s.id == service_id)
    }

    /// Resolve by display name ("Thai 400" labels store the name first)
    pub fn by_name(&self, name: &str) -> Option<&ServiceCatalogEntry> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Base duration for a service name; unknown services fall back to 60
    pub fn duration_of(&self, service_name: &str) -> u32 {
        self.by_name(service_name)
            .map(|s| s.duration_minutes)
            .unwrap_or(DEFAULT_SERVICE_DURATION_MINUTES)
    }

    pub fn services(&self) -> &[ServiceCatalogEntry] {
        &self.services
    }
}
