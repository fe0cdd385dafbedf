use std::sync::Arc;

use tracing::{debug, warn};
use validator::Validate;

use crate::{
    db::{
        models::{CreateLeaseRequest, Lease, LeaseDraft, RENTED_STATUS},
        store::RentalStore,
    },
    error::AppResult,
};

#[derive(Clone)]
pub struct LeaseRepository {
    store: Arc<dyn RentalStore>,
}

impl LeaseRepository {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Lease>> {
        Ok(self.store.list_leases().await?)
    }

    /// Stores the lease, then marks the referenced property `RENTED`.
    ///
    /// The two writes are separate transactions. If the status update fails
    /// the lease stays committed and the error is returned to the caller;
    /// nothing is rolled back. Neither reference is checked for existence.
    pub async fn create(&self, req: CreateLeaseRequest) -> AppResult<String> {
        let draft = LeaseDraft::from(req);
        draft.validate()?;
        let fields = draft.into_new_lease()?;

        let lease_id = super::new_id();
        let property_id = fields.property_id.clone();
        self.store.insert_lease(lease_id.clone(), fields).await?;
        debug!(%lease_id, %property_id, "Lease created");

        if let Err(e) = self
            .store
            .set_property_status(property_id.clone(), RENTED_STATUS.to_string())
            .await
        {
            warn!(%lease_id, %property_id, error = %e, "Lease stored but property status update failed");
            return Err(e.into());
        }
        Ok(lease_id)
    }

    /// Leaves the property's status untouched.
    pub async fn delete(&self, lease_id: &str) -> AppResult<String> {
        self.store.delete_lease(lease_id.to_string()).await?;
        Ok(lease_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{
            memory::MemoryRentalStore,
            models::CreatePropertyRequest,
            repositories::PropertyRepository,
        },
        error::AppError,
    };

    fn lease_for(property_id: &str) -> CreateLeaseRequest {
        CreateLeaseRequest {
            property_id: Some(property_id.to_string()),
            tenant_id: Some("t-1".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        }
    }

    #[tokio::test]
    async fn creating_a_lease_rents_the_property() {
        let store = Arc::new(MemoryRentalStore::new());
        let properties = PropertyRepository::new(store.clone());
        let leases = LeaseRepository::new(store);

        let property_id = properties
            .create(CreatePropertyRequest {
                address: Some("3 Quay St".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        leases.create(lease_for(&property_id)).await.unwrap();

        assert_eq!(properties.get(&property_id).await.unwrap().status, "RENTED");
    }

    #[tokio::test]
    async fn failed_status_update_leaves_lease_in_place() {
        let store = Arc::new(MemoryRentalStore::new());
        let properties = PropertyRepository::new(store.clone());
        let leases = LeaseRepository::new(store.clone());

        let property_id = properties
            .create(CreatePropertyRequest {
                address: Some("4 Quay St".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        store.fail_next_status_update();
        let err = leases.create(lease_for(&property_id)).await.unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(leases.list().await.unwrap().len(), 1);
        assert_eq!(properties.get(&property_id).await.unwrap().status, "AVAILABLE");
    }

    #[tokio::test]
    async fn deleting_a_lease_does_not_revert_status() {
        let store = Arc::new(MemoryRentalStore::new());
        let properties = PropertyRepository::new(store.clone());
        let leases = LeaseRepository::new(store);

        let property_id = properties
            .create(CreatePropertyRequest {
                address: Some("5 Quay St".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let lease_id = leases.create(lease_for(&property_id)).await.unwrap();

        leases.delete(&lease_id).await.unwrap();

        assert!(leases.list().await.unwrap().is_empty());
        assert_eq!(properties.get(&property_id).await.unwrap().status, "RENTED");
    }

    #[tokio::test]
    async fn dangling_references_are_accepted() {
        let leases = LeaseRepository::new(Arc::new(MemoryRentalStore::new()));
        let lease_id = leases.create(lease_for("no-such-property")).await.unwrap();

        let stored = leases.list().await.unwrap();
        assert_eq!(stored[0].lease_id, lease_id);
        assert_eq!(stored[0].property_id, "no-such-property");
    }

    #[tokio::test]
    async fn bad_date_is_a_client_error() {
        let leases = LeaseRepository::new(Arc::new(MemoryRentalStore::new()));
        let err = leases
            .create(CreateLeaseRequest {
                end_date: Some("not-a-date".to_string()),
                ..lease_for("p-1")
            })
            .await
            .unwrap_err();

        match err {
            AppError::Validation(message) => {
                assert_eq!(message, "Invalid date format for end_date. Expected YYYY-MM-DD")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(leases.list().await.unwrap().is_empty());
    }
}
