use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    entities::plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity},
    value_objects::{
        enums::{plan_levels::PlanLevel, resource_types::ResourceType},
        plan_resolver,
    },
};

/// Wire value for "no cap".
pub const UNLIMITED_SENTINEL: i64 = -1;

/// Marker accepted in place of `-1` on administrative input.
pub const UNLIMITED_MARKER: &str = "unlimited";

/// Limits granted to accounts whose plan has no catalog entry. Resources not
/// listed here (flyers, integrations, campaigns) are not granted at all.
pub const FREE_DEFAULT_PRODUCTS: i64 = 20;
pub const FREE_DEFAULT_CUSTOMERS: i64 = 100;
pub const FREE_DEFAULT_STORAGE_MB: i64 = 100;

pub const FREE_DEFAULT_LIMITS: [(ResourceType, Limit); 3] = [
    (ResourceType::Products, Limit::Capped(FREE_DEFAULT_PRODUCTS)),
    (ResourceType::Customers, Limit::Capped(FREE_DEFAULT_CUSTOMERS)),
    (ResourceType::Storage, Limit::Capped(FREE_DEFAULT_STORAGE_MB)),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanValidationError {
    #[error("invalid limit for {resource}: {value}")]
    InvalidLimit { resource: String, value: String },
    #[error("plan name must not be blank")]
    BlankName,
    #[error("price must be non-negative, got {0}")]
    NegativePrice(i64),
    #[error("rank must be non-negative, got {0}")]
    NegativeRank(i32),
}

/// Cap on one resource. `Unlimited` is its own value and never takes part in
/// arithmetic.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(into = "i64")]
pub enum Limit {
    Unlimited,
    Capped(i64),
}

impl Limit {
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            UNLIMITED_SENTINEL => Some(Limit::Unlimited),
            v if v >= 0 => Some(Limit::Capped(v)),
            _ => None,
        }
    }

    /// Accepts integers >= -1 and the `"unlimited"` marker.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().and_then(Self::from_i64),
            serde_json::Value::String(s) if s.trim().eq_ignore_ascii_case(UNLIMITED_MARKER) => {
                Some(Limit::Unlimited)
            }
            _ => None,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            Limit::Unlimited => UNLIMITED_SENTINEL,
            Limit::Capped(v) => *v,
        }
    }
}

impl From<Limit> for i64 {
    fn from(value: Limit) -> Self {
        value.as_i64()
    }
}

/// Resource-limit table of a plan.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ResourceLimits(BTreeMap<ResourceType, Limit>);

impl ResourceLimits {
    pub fn new(entries: impl IntoIterator<Item = (ResourceType, Limit)>) -> Self {
        Self(entries.into_iter().collect())
    }

    pub fn free_defaults() -> Self {
        Self::new(FREE_DEFAULT_LIMITS)
    }

    pub fn get(&self, resource: ResourceType) -> Option<Limit> {
        self.0.get(&resource).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, Limit)> + '_ {
        self.0.iter().map(|(resource, limit)| (*resource, *limit))
    }

    /// Strict parse for administrative writes: every key must name a known
    /// resource and every value must be a legal limit.
    pub fn parse(raw: &BTreeMap<String, serde_json::Value>) -> Result<Self, PlanValidationError> {
        let mut limits = BTreeMap::new();
        for (key, value) in raw {
            let (resource, limit) = parse_entry(key, value)?;
            limits.insert(resource, limit);
        }
        Ok(Self(limits))
    }

    /// Merges a patch into the table. A `null` value removes the entry.
    pub fn apply_patch(
        &self,
        patch: &BTreeMap<String, serde_json::Value>,
    ) -> Result<Self, PlanValidationError> {
        let mut limits = self.0.clone();
        for (key, value) in patch {
            if value.is_null() {
                let resource = ResourceType::from_str(key).ok_or_else(|| invalid(key, value))?;
                limits.remove(&resource);
                continue;
            }
            let (resource, limit) = parse_entry(key, value)?;
            limits.insert(resource, limit);
        }
        Ok(Self(limits))
    }

    /// Lenient parse for stored rows. Bad entries are dropped so a single
    /// corrupt value cannot wipe the whole table.
    pub fn from_stored_json(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            warn!(stored = %value, "plans: stored limits are not an object; treating as empty");
            return Self::default();
        };

        let mut limits = BTreeMap::new();
        for (key, raw) in object {
            match parse_entry(key, raw) {
                Ok((resource, limit)) => {
                    limits.insert(resource, limit);
                }
                Err(err) => warn!(error = %err, "plans: skipping stored limit entry"),
            }
        }
        Self(limits)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .0
            .iter()
            .map(|(resource, limit)| (resource.to_string(), serde_json::Value::from(limit.as_i64())))
            .collect();
        serde_json::Value::Object(object)
    }
}

fn parse_entry(
    key: &str,
    value: &serde_json::Value,
) -> Result<(ResourceType, Limit), PlanValidationError> {
    let resource = ResourceType::from_str(key).ok_or_else(|| invalid(key, value))?;
    let limit = Limit::from_json(value).ok_or_else(|| invalid(key, value))?;
    Ok((resource, limit))
}

fn invalid(key: &str, value: &serde_json::Value) -> PlanValidationError {
    PlanValidationError::InvalidLimit {
        resource: key.to_string(),
        value: value.to_string(),
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertPlanModel {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub price_minor: i64,
    pub rank: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub limits: BTreeMap<String, serde_json::Value>,
}

impl InsertPlanModel {
    pub fn into_insert_entity(self) -> Result<InsertPlanEntity, PlanValidationError> {
        let name = normalize_name(&self.name)?;
        validate_price(self.price_minor)?;
        validate_rank(self.rank)?;
        let limits = ResourceLimits::parse(&self.limits)?;

        Ok(InsertPlanEntity {
            id: Uuid::new_v4(),
            name,
            slug: normalize_slug(self.slug.as_deref()),
            price_minor: self.price_minor,
            rank: self.rank,
            is_active: self.is_active,
            limits: limits.to_json(),
        })
    }
}

/// Partial update of a catalog entry. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanModel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub price_minor: Option<i64>,
    #[serde(default)]
    pub rank: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub limits: Option<BTreeMap<String, serde_json::Value>>,
}

impl UpdatePlanModel {
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }

    pub fn into_changeset(
        self,
        current: &PlanEntity,
    ) -> Result<UpdatePlanEntity, PlanValidationError> {
        let name = self.name.as_deref().map(normalize_name).transpose()?;
        if let Some(price) = self.price_minor {
            validate_price(price)?;
        }
        if let Some(rank) = self.rank {
            validate_rank(rank)?;
        }
        let limits = self
            .limits
            .as_ref()
            .map(|patch| current.limits.apply_patch(patch))
            .transpose()?;

        Ok(UpdatePlanEntity {
            name,
            slug: self.slug.as_deref().and_then(|s| normalize_slug(Some(s))),
            price_minor: self.price_minor,
            rank: self.rank,
            is_active: self.is_active,
            limits: limits.map(|l| l.to_json()),
            updated_at: Utc::now(),
        })
    }
}

fn normalize_name(name: &str) -> Result<String, PlanValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlanValidationError::BlankName);
    }
    Ok(name.to_string())
}

fn normalize_slug(slug: Option<&str>) -> Option<String> {
    slug.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

fn validate_price(price_minor: i64) -> Result<(), PlanValidationError> {
    if price_minor < 0 {
        return Err(PlanValidationError::NegativePrice(price_minor));
    }
    Ok(())
}

fn validate_rank(rank: i32) -> Result<(), PlanValidationError> {
    if rank < 0 {
        return Err(PlanValidationError::NegativeRank(rank));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanDto {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub level: PlanLevel,
    pub price_minor: i64,
    pub rank: i32,
    pub is_active: bool,
    pub limits: ResourceLimits,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        let level = plan_resolver::level_for_plan(&value);
        Self {
            id: value.id,
            name: value.name,
            slug: value.slug,
            level,
            price_minor: value.price_minor,
            rank: value.rank,
            is_active: value.is_active,
            limits: value.limits,
            updated_at: value.updated_at,
        }
    }
}
