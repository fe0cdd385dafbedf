mod lease_repository;
mod property_repository;
mod tenant_repository;

pub use lease_repository::LeaseRepository;
pub use property_repository::PropertyRepository;
pub use tenant_repository::TenantRepository;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
