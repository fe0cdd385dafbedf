//! In-process [`RentalStore`] with the same row semantics as Postgres.
//!
//! Backs the test suites.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};

use futures_util::FutureExt;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{
    error::DatabaseError,
    models::{Lease, NewLease, NewProperty, NewTenant, Property, Tenant},
    store::{RentalStore, StoreFuture},
};

/// Row plus its insertion sequence, which breaks `created_at` ties.
type Table<T> = HashMap<String, (u64, T)>;

#[derive(Default)]
pub struct MemoryRentalStore {
    properties: RwLock<Table<Property>>,
    tenants: RwLock<Table<Tenant>>,
    leases: RwLock<Table<Lease>>,
    sequence: AtomicU64,
    fail_next_status_update: AtomicBool,
}

fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}

fn newest_first<T: Clone>(table: &Table<T>, created_at: impl Fn(&T) -> OffsetDateTime) -> Vec<T> {
    let mut rows: Vec<&(u64, T)> = table.values().collect();
    rows.sort_by(|(seq_a, a), (seq_b, b)| {
        created_at(b)
            .cmp(&created_at(a))
            .then_with(|| seq_b.cmp(seq_a))
    });
    rows.into_iter().map(|(_, row)| row.clone()).collect()
}

impl MemoryRentalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next [`RentalStore::set_property_status`] call fail, as a
    /// backend error would.
    pub fn fail_next_status_update(&self) {
        self.fail_next_status_update.store(true, Ordering::SeqCst);
    }

    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst)
    }

    /// Keeps the original sequence of an existing row.
    fn seq_for<T>(&self, table: &Table<T>, id: &str) -> u64 {
        table
            .get(id)
            .map(|(seq, _)| *seq)
            .unwrap_or_else(|| self.next_seq())
    }
}

impl RentalStore for MemoryRentalStore {
    fn list_properties(&self) -> StoreFuture<'_, Vec<Property>> {
        async move {
            let table = self.properties.read().await;
            Ok(newest_first(&*table, |p| p.created_at))
        }
        .boxed()
    }

    fn find_property(&self, property_id: String) -> StoreFuture<'_, Option<Property>> {
        async move {
            let table = self.properties.read().await;
            Ok(table.get(&property_id).map(|(_, p)| p.clone()))
        }
        .boxed()
    }

    fn insert_property(&self, property_id: String, fields: NewProperty) -> StoreFuture<'_, ()> {
        async move {
            let mut table = self.properties.write().await;
            let seq = self.seq_for(&*table, &property_id);
            let property = fields.into_property(property_id.clone(), now());
            table.insert(property_id, (seq, property));
            Ok(())
        }
        .boxed()
    }

    fn replace_property(&self, property: Property) -> StoreFuture<'_, ()> {
        async move {
            let mut table = self.properties.write().await;
            let seq = self.seq_for(&*table, &property.property_id);
            table.insert(property.property_id.clone(), (seq, property));
            Ok(())
        }
        .boxed()
    }

    fn delete_property(&self, property_id: String) -> StoreFuture<'_, ()> {
        async move {
            self.properties.write().await.remove(&property_id);
            Ok(())
        }
        .boxed()
    }

    fn set_property_status(&self, property_id: String, status: String) -> StoreFuture<'_, ()> {
        async move {
            if self.fail_next_status_update.swap(false, Ordering::SeqCst) {
                return Err(DatabaseError::TransactionError(
                    "status update rejected by backend".to_string(),
                ));
            }
            let mut table = self.properties.write().await;
            if let Some((_, property)) = table.get_mut(&property_id) {
                property.status = status;
            }
            Ok(())
        }
        .boxed()
    }

    fn list_tenants(&self) -> StoreFuture<'_, Vec<Tenant>> {
        async move {
            let table = self.tenants.read().await;
            Ok(newest_first(&*table, |t| t.created_at))
        }
        .boxed()
    }

    fn find_tenant(&self, tenant_id: String) -> StoreFuture<'_, Option<Tenant>> {
        async move {
            let table = self.tenants.read().await;
            Ok(table.get(&tenant_id).map(|(_, t)| t.clone()))
        }
        .boxed()
    }

    fn insert_tenant(&self, tenant_id: String, fields: NewTenant) -> StoreFuture<'_, ()> {
        async move {
            let mut table = self.tenants.write().await;
            let seq = self.seq_for(&*table, &tenant_id);
            let tenant = fields.into_tenant(tenant_id.clone(), now());
            table.insert(tenant_id, (seq, tenant));
            Ok(())
        }
        .boxed()
    }

    fn replace_tenant(&self, tenant: Tenant) -> StoreFuture<'_, ()> {
        async move {
            let mut table = self.tenants.write().await;
            let seq = self.seq_for(&*table, &tenant.tenant_id);
            table.insert(tenant.tenant_id.clone(), (seq, tenant));
            Ok(())
        }
        .boxed()
    }

    fn delete_tenant(&self, tenant_id: String) -> StoreFuture<'_, ()> {
        async move {
            self.tenants.write().await.remove(&tenant_id);
            Ok(())
        }
        .boxed()
    }

    fn list_leases(&self) -> StoreFuture<'_, Vec<Lease>> {
        async move {
            let table = self.leases.read().await;
            Ok(newest_first(&*table, |l| l.created_at))
        }
        .boxed()
    }

    fn insert_lease(&self, lease_id: String, fields: NewLease) -> StoreFuture<'_, ()> {
        async move {
            let mut table = self.leases.write().await;
            let seq = self.seq_for(&*table, &lease_id);
            let lease = fields.into_lease(lease_id.clone(), now());
            table.insert(lease_id, (seq, lease));
            Ok(())
        }
        .boxed()
    }

    fn delete_lease(&self, lease_id: String) -> StoreFuture<'_, ()> {
        async move {
            self.leases.write().await.remove(&lease_id);
            Ok(())
        }
        .boxed()
    }
}
