//! Storage seam between the entity repositories and the database.
//!
//! Repositories own validation and merge semantics; a [`RentalStore`] only
//! reads and writes whole rows. Each method is one independent unit of work.
//! `PgRentalStore` runs them as serializable Postgres transactions and
//! `MemoryRentalStore` keeps rows in process.

use futures_util::future::BoxFuture;

use super::{
    error::DatabaseError,
    models::{Lease, NewLease, NewProperty, NewTenant, Property, Tenant},
};

pub type StoreFuture<'a, T> = BoxFuture<'a, Result<T, DatabaseError>>;

pub trait RentalStore: Send + Sync + 'static {
    /// All properties, newest `created_at` first.
    fn list_properties(&self) -> StoreFuture<'_, Vec<Property>>;

    fn find_property(&self, property_id: String) -> StoreFuture<'_, Option<Property>>;

    /// Writes a new row stamped with the current server time.
    fn insert_property(&self, property_id: String, fields: NewProperty) -> StoreFuture<'_, ()>;

    /// Rewrites the row verbatim, including `created_at`.
    fn replace_property(&self, property: Property) -> StoreFuture<'_, ()>;

    /// Succeeds whether or not the row existed.
    fn delete_property(&self, property_id: String) -> StoreFuture<'_, ()>;

    /// Overwrites `status` of an existing property. Unknown ids are a no-op.
    fn set_property_status(&self, property_id: String, status: String) -> StoreFuture<'_, ()>;

    fn list_tenants(&self) -> StoreFuture<'_, Vec<Tenant>>;

    fn find_tenant(&self, tenant_id: String) -> StoreFuture<'_, Option<Tenant>>;

    fn insert_tenant(&self, tenant_id: String, fields: NewTenant) -> StoreFuture<'_, ()>;

    fn replace_tenant(&self, tenant: Tenant) -> StoreFuture<'_, ()>;

    fn delete_tenant(&self, tenant_id: String) -> StoreFuture<'_, ()>;

    fn list_leases(&self) -> StoreFuture<'_, Vec<Lease>>;

    fn insert_lease(&self, lease_id: String, fields: NewLease) -> StoreFuture<'_, ()>;

    fn delete_lease(&self, lease_id: String) -> StoreFuture<'_, ()>;
}
