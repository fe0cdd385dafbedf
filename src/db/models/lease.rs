use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Lease {
    pub lease_id: String,
    pub property_id: String,
    pub tenant_id: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateLeaseRequest {
    pub property_id: Option<String>,
    pub tenant_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Trimmed lease input before date parsing.
#[derive(Debug, Clone, Validate)]
pub struct LeaseDraft {
    #[validate(length(min = 1, message = "property_id is required"))]
    pub property_id: String,
    #[validate(length(min = 1, message = "tenant_id is required"))]
    pub tenant_id: String,
    #[validate(length(min = 1, message = "start_date is required"))]
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLease {
    pub property_id: String,
    pub tenant_id: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

impl From<CreateLeaseRequest> for LeaseDraft {
    fn from(req: CreateLeaseRequest) -> Self {
        let trim = |v: Option<String>| v.unwrap_or_default().trim().to_string();
        Self {
            property_id: trim(req.property_id),
            tenant_id: trim(req.tenant_id),
            start_date: trim(req.start_date),
            end_date: trim(req.end_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid date format for {field}. Expected YYYY-MM-DD")]
pub struct InvalidDate {
    pub field: &'static str,
}

pub fn parse_date(field: &'static str, raw: &str) -> Result<Date, InvalidDate> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|_| InvalidDate { field })
}

impl LeaseDraft {
    /// Parses the dates. A blank `end_date` means open-ended.
    pub fn into_new_lease(self) -> Result<NewLease, InvalidDate> {
        let start_date = parse_date("start_date", &self.start_date)?;
        let end_date = if self.end_date.is_empty() {
            None
        } else {
            Some(parse_date("end_date", &self.end_date)?)
        };

        Ok(NewLease {
            property_id: self.property_id,
            tenant_id: self.tenant_id,
            start_date,
            end_date,
        })
    }
}

impl NewLease {
    pub fn into_lease(self, lease_id: String, created_at: OffsetDateTime) -> Lease {
        Lease {
            lease_id,
            property_id: self.property_id,
            tenant_id: self.tenant_id,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at,
        }
    }
}
