use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{domain::value_objects::plans::ResourceLimits, infra::db::postgres::schema::plans};

/// Catalog entry. Accounts reference it by name or slug, never embed it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub price_minor: i64,
    pub rank: i32,
    pub is_active: bool,
    pub limits: ResourceLimits,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw row used for Diesel queries. Limits stay as JSON and are parsed into ResourceLimits.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub price_minor: i64,
    pub rank: i32,
    pub is_active: bool,
    pub limits: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let limits = ResourceLimits::from_stored_json(&value.limits);

        Self {
            id: value.id,
            name: value.name,
            slug: value.slug,
            price_minor: value.price_minor,
            rank: value.rank,
            is_active: value.is_active,
            limits,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct InsertPlanEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub price_minor: i64,
    pub rank: i32,
    pub is_active: bool,
    pub limits: serde_json::Value,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = plans)]
pub struct UpdatePlanEntity {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub price_minor: Option<i64>,
    pub rank: Option<i32>,
    pub is_active: Option<bool>,
    pub limits: Option<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}
