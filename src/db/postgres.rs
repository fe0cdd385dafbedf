use futures_util::FutureExt;
use sqlx::PgPool;

use super::{
    executor::{QueryExecutor, RetryPolicy},
    models::{Lease, NewLease, NewProperty, NewTenant, Property, Tenant},
    store::{RentalStore, StoreFuture},
};

#[derive(Clone)]
pub struct PgRentalStore {
    executor: QueryExecutor,
}

impl PgRentalStore {
    pub fn new(pool: PgPool, policy: RetryPolicy) -> Self {
        Self {
            executor: QueryExecutor::new(pool, policy),
        }
    }
}

impl RentalStore for PgRentalStore {
    fn list_properties(&self) -> StoreFuture<'_, Vec<Property>> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query_as::<_, Property>(
                        r#"
                        SELECT property_id, address, status, notes, created_at
                        FROM properties
                        ORDER BY created_at DESC
                        "#,
                    )
                    .fetch_all(conn)
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn find_property(&self, property_id: String) -> StoreFuture<'_, Option<Property>> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query_as::<_, Property>(
                        r#"
                        SELECT property_id, address, status, notes, created_at
                        FROM properties
                        WHERE property_id = $1
                        "#,
                    )
                    .bind(property_id.clone())
                    .fetch_optional(conn)
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn insert_property(&self, property_id: String, fields: NewProperty) -> StoreFuture<'_, ()> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query(
                        r#"
                        INSERT INTO properties (property_id, address, status, notes, created_at)
                        VALUES ($1, $2, $3, $4, date_trunc('second', NOW()))
                        "#,
                    )
                    .bind(property_id.clone())
                    .bind(fields.address.clone())
                    .bind(fields.status.clone())
                    .bind(fields.notes.clone())
                    .execute(conn)
                    .map(|res| res.map(|_| ()))
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn replace_property(&self, property: Property) -> StoreFuture<'_, ()> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query(
                        r#"
                        INSERT INTO properties (property_id, address, status, notes, created_at)
                        VALUES ($1, $2, $3, $4, $5)
                        ON CONFLICT (property_id) DO UPDATE
                        SET address = EXCLUDED.address,
                            status = EXCLUDED.status,
                            notes = EXCLUDED.notes,
                            created_at = EXCLUDED.created_at
                        "#,
                    )
                    .bind(property.property_id.clone())
                    .bind(property.address.clone())
                    .bind(property.status.clone())
                    .bind(property.notes.clone())
                    .bind(property.created_at)
                    .execute(conn)
                    .map(|res| res.map(|_| ()))
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn delete_property(&self, property_id: String) -> StoreFuture<'_, ()> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query("DELETE FROM properties WHERE property_id = $1")
                        .bind(property_id.clone())
                        .execute(conn)
                        .map(|res| res.map(|_| ()))
                        .boxed()
                })
                .await
        }
        .boxed()
    }

    fn set_property_status(&self, property_id: String, status: String) -> StoreFuture<'_, ()> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query("UPDATE properties SET status = $2 WHERE property_id = $1")
                        .bind(property_id.clone())
                        .bind(status.clone())
                        .execute(conn)
                        .map(|res| res.map(|_| ()))
                        .boxed()
                })
                .await
        }
        .boxed()
    }

    fn list_tenants(&self) -> StoreFuture<'_, Vec<Tenant>> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query_as::<_, Tenant>(
                        r#"
                        SELECT tenant_id, full_name, phone, email, created_at
                        FROM tenants
                        ORDER BY created_at DESC
                        "#,
                    )
                    .fetch_all(conn)
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn find_tenant(&self, tenant_id: String) -> StoreFuture<'_, Option<Tenant>> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query_as::<_, Tenant>(
                        r#"
                        SELECT tenant_id, full_name, phone, email, created_at
                        FROM tenants
                        WHERE tenant_id = $1
                        "#,
                    )
                    .bind(tenant_id.clone())
                    .fetch_optional(conn)
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn insert_tenant(&self, tenant_id: String, fields: NewTenant) -> StoreFuture<'_, ()> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query(
                        r#"
                        INSERT INTO tenants (tenant_id, full_name, phone, email, created_at)
                        VALUES ($1, $2, $3, $4, date_trunc('second', NOW()))
                        "#,
                    )
                    .bind(tenant_id.clone())
                    .bind(fields.full_name.clone())
                    .bind(fields.phone.clone())
                    .bind(fields.email.clone())
                    .execute(conn)
                    .map(|res| res.map(|_| ()))
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn replace_tenant(&self, tenant: Tenant) -> StoreFuture<'_, ()> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query(
                        r#"
                        INSERT INTO tenants (tenant_id, full_name, phone, email, created_at)
                        VALUES ($1, $2, $3, $4, $5)
                        ON CONFLICT (tenant_id) DO UPDATE
                        SET full_name = EXCLUDED.full_name,
                            phone = EXCLUDED.phone,
                            email = EXCLUDED.email,
                            created_at = EXCLUDED.created_at
                        "#,
                    )
                    .bind(tenant.tenant_id.clone())
                    .bind(tenant.full_name.clone())
                    .bind(tenant.phone.clone())
                    .bind(tenant.email.clone())
                    .bind(tenant.created_at)
                    .execute(conn)
                    .map(|res| res.map(|_| ()))
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn delete_tenant(&self, tenant_id: String) -> StoreFuture<'_, ()> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query("DELETE FROM tenants WHERE tenant_id = $1")
                        .bind(tenant_id.clone())
                        .execute(conn)
                        .map(|res| res.map(|_| ()))
                        .boxed()
                })
                .await
        }
        .boxed()
    }

    fn list_leases(&self) -> StoreFuture<'_, Vec<Lease>> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query_as::<_, Lease>(
                        r#"
                        SELECT lease_id, property_id, tenant_id, start_date, end_date, created_at
                        FROM leases
                        ORDER BY created_at DESC
                        "#,
                    )
                    .fetch_all(conn)
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn insert_lease(&self, lease_id: String, fields: NewLease) -> StoreFuture<'_, ()> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query(
                        r#"
                        INSERT INTO leases (lease_id, property_id, tenant_id, start_date, end_date, created_at)
                        VALUES ($1, $2, $3, $4, $5, date_trunc('second', NOW()))
                        "#,
                    )
                    .bind(lease_id.clone())
                    .bind(fields.property_id.clone())
                    .bind(fields.tenant_id.clone())
                    .bind(fields.start_date)
                    .bind(fields.end_date)
                    .execute(conn)
                    .map(|res| res.map(|_| ()))
                    .boxed()
                })
                .await
        }
        .boxed()
    }

    fn delete_lease(&self, lease_id: String) -> StoreFuture<'_, ()> {
        async move {
            self.executor
                .run(|conn| {
                    sqlx::query("DELETE FROM leases WHERE lease_id = $1")
                        .bind(lease_id.clone())
                        .execute(conn)
                        .map(|res| res.map(|_| ()))
                        .boxed()
                })
                .await
        }
        .boxed()
    }
}
