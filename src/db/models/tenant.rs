use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Tenant {
    pub tenant_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTenantRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTenantRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewTenant {
    #[validate(length(min = 1, message = "full_name is required"))]
    pub full_name: String,
    pub phone: String,
    pub email: String,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl From<CreateTenantRequest> for NewTenant {
    fn from(req: CreateTenantRequest) -> Self {
        Self {
            full_name: trimmed(req.full_name).unwrap_or_default(),
            phone: trimmed(req.phone).unwrap_or_default(),
            email: trimmed(req.email).unwrap_or_default(),
        }
    }
}

impl NewTenant {
    pub fn merged(current: &Tenant, changes: UpdateTenantRequest) -> Self {
        Self {
            full_name: trimmed(changes.full_name).unwrap_or_else(|| current.full_name.clone()),
            phone: trimmed(changes.phone).unwrap_or_else(|| current.phone.clone()),
            email: trimmed(changes.email).unwrap_or_else(|| current.email.clone()),
        }
    }

    pub fn into_tenant(self, tenant_id: String, created_at: OffsetDateTime) -> Tenant {
        Tenant {
            tenant_id,
            full_name: self.full_name,
            phone: self.phone,
            email: self.email,
            created_at,
        }
    }
}
