use std::sync::Arc;

use tracing::debug;
use validator::Validate;

use crate::{
    db::{
        models::{CreatePropertyRequest, NewProperty, Property, UpdatePropertyRequest},
        store::RentalStore,
    },
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct PropertyRepository {
    store: Arc<dyn RentalStore>,
}

impl PropertyRepository {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Property>> {
        Ok(self.store.list_properties().await?)
    }

    pub async fn get(&self, property_id: &str) -> AppResult<Property> {
        self.store
            .find_property(property_id.to_string())
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Returns the generated `property_id`.
    pub async fn create(&self, req: CreatePropertyRequest) -> AppResult<String> {
        let fields = NewProperty::from(req);
        fields.validate()?;

        let property_id = super::new_id();
        self.store.insert_property(property_id.clone(), fields).await?;
        debug!(%property_id, "Property created");
        Ok(property_id)
    }

    pub async fn update(&self, property_id: &str, changes: UpdatePropertyRequest) -> AppResult<()> {
        let current = self.get(property_id).await?;
        let fields = NewProperty::merged(&current, changes);
        fields.validate()?;

        let property = fields.into_property(current.property_id, current.created_at);
        self.store.replace_property(property).await?;
        debug!(%property_id, "Property updated");
        Ok(())
    }

    /// Unconditional; returns the id whether or not a row was removed.
    pub async fn delete(&self, property_id: &str) -> AppResult<String> {
        self.store.delete_property(property_id.to_string()).await?;
        Ok(property_id.to_string())
    }
}
