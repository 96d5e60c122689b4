use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::app_users;

/// Role value that force-enables every feature.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = app_users)]
pub struct AppUserEntity {
    pub id: Uuid,
    pub display_name: Option<String>,
    /// Free-text plan identifier: canonical slug, legacy name or nothing.
    pub plan: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl AppUserEntity {
    pub fn is_admin(&self) -> bool {
        self.role.trim().eq_ignore_ascii_case(ADMIN_ROLE)
    }
}
