use std::sync::Arc;

use crate::db::{
    repositories::{LeaseRepository, PropertyRepository, TenantRepository},
    RentalStore,
};

/// Per-process context: the storage backend and the repositories over it.
/// Built once by the entry point and shared by every invocation.
#[derive(Clone)]
pub struct AppState {
    pub properties: PropertyRepository,
    pub tenants: TenantRepository,
    pub leases: LeaseRepository,
}

impl AppState {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self {
            properties: PropertyRepository::new(store.clone()),
            tenants: TenantRepository::new(store.clone()),
            leases: LeaseRepository::new(store),
        }
    }
}
