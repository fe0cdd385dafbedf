use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

pub const DEFAULT_PROPERTY_STATUS: &str = "AVAILABLE";
pub const RENTED_STATUS: &str = "RENTED";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Property {
    pub property_id: String,
    pub address: String,
    pub status: String,
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Body of `POST /properties`.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePropertyRequest {
    pub address: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Body of `PUT /properties/{id}`. Absent (or `null`) fields keep their
/// stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePropertyRequest {
    pub address: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Normalized property fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewProperty {
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    pub status: String,
    pub notes: String,
}

pub fn normalize_status(status: &str) -> String {
    status.trim().to_uppercase()
}

impl From<CreatePropertyRequest> for NewProperty {
    fn from(req: CreatePropertyRequest) -> Self {
        Self {
            address: req.address.unwrap_or_default().trim().to_string(),
            status: normalize_status(req.status.as_deref().unwrap_or(DEFAULT_PROPERTY_STATUS)),
            notes: req.notes.unwrap_or_default(),
        }
    }
}

impl NewProperty {
    /// Overlays `changes` on the stored row.
    pub fn merged(current: &Property, changes: UpdatePropertyRequest) -> Self {
        Self {
            address: changes
                .address
                .map(|a| a.trim().to_string())
                .unwrap_or_else(|| current.address.clone()),
            status: changes
                .status
                .map(|s| normalize_status(&s))
                .unwrap_or_else(|| current.status.clone()),
            notes: changes.notes.unwrap_or_else(|| current.notes.clone()),
        }
    }

    pub fn into_property(self, property_id: String, created_at: OffsetDateTime) -> Property {
        Property {
            property_id,
            address: self.address,
            status: self.status,
            notes: self.notes,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn stored() -> Property {
        Property {
            property_id: "p-1".to_string(),
            address: "1 Main St".to_string(),
            status: "AVAILABLE".to_string(),
            notes: "corner unit".to_string(),
            created_at: datetime!(2024-01-01 10:00:00 UTC),
        }
    }

    #[test]
    fn create_defaults_status_and_notes() {
        let new = NewProperty::from(CreatePropertyRequest {
            address: Some("  1 Main St ".to_string()),
            ..Default::default()
        });

        assert_eq!(new.address, "1 Main St");
        assert_eq!(new.status, "AVAILABLE");
        assert_eq!(new.notes, "");
        assert!(new.validate().is_ok());
    }

    #[test]
    fn create_upper_cases_any_status() {
        let new = NewProperty::from(CreatePropertyRequest {
            address: Some("1 Main St".to_string()),
            status: Some(" under repair ".to_string()),
            notes: None,
        });

        assert_eq!(new.status, "UNDER REPAIR");
    }

    #[test]
    fn blank_address_fails_validation() {
        let new = NewProperty::from(CreatePropertyRequest {
            address: Some("   ".to_string()),
            ..Default::default()
        });

        assert!(new.validate().is_err());
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let merged = NewProperty::merged(
            &stored(),
            UpdatePropertyRequest {
                status: Some("rented".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(merged.address, "1 Main St");
        assert_eq!(merged.status, "RENTED");
        assert_eq!(merged.notes, "corner unit");
    }
}
