use std::sync::Arc;

use tracing::debug;
use validator::Validate;

use crate::{
    db::{
        models::{CreateTenantRequest, NewTenant, Tenant, UpdateTenantRequest},
        store::RentalStore,
    },
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct TenantRepository {
    store: Arc<dyn RentalStore>,
}

impl TenantRepository {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Tenant>> {
        Ok(self.store.list_tenants().await?)
    }

    pub async fn get(&self, tenant_id: &str) -> AppResult<Tenant> {
        self.store
            .find_tenant(tenant_id.to_string())
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, req: CreateTenantRequest) -> AppResult<String> {
        let fields = NewTenant::from(req);
        fields.validate()?;

        let tenant_id = super::new_id();
        self.store.insert_tenant(tenant_id.clone(), fields).await?;
        debug!(%tenant_id, "Tenant created");
        Ok(tenant_id)
    }

    pub async fn update(&self, tenant_id: &str, changes: UpdateTenantRequest) -> AppResult<()> {
        let current = self.get(tenant_id).await?;
        let fields = NewTenant::merged(&current, changes);
        fields.validate()?;

        let tenant = fields.into_tenant(current.tenant_id, current.created_at);
        self.store.replace_tenant(tenant).await?;
        debug!(%tenant_id, "Tenant updated");
        Ok(())
    }

    pub async fn delete(&self, tenant_id: &str) -> AppResult<String> {
        self.store.delete_tenant(tenant_id.to_string()).await?;
        Ok(tenant_id.to_string())
    }
}
