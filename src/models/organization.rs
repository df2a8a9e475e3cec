use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    /// Identity in the external auth provider.
    pub auth_id: String,
    pub email: String,
    pub org_name: String,
    /// Unapproved organizations exist but are shown as pending by clients.
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub auth_id: String,
    pub email: String,
    pub org_name: String,
    pub is_approved: bool,
}

/// Partial profile update; `None` fields are left untouched. Approval is
/// changed through moderation, not here.
#[derive(Debug, Clone, Default)]
pub struct OrganizationPatch {
    pub email: Option<String>,
    pub org_name: Option<String>,
}
