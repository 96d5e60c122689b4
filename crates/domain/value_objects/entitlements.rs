use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{app_users::AppUserEntity, plans::PlanEntity},
    value_objects::{
        enums::{feature_keys::FeatureKey, plan_levels::PlanLevel, resource_types::ResourceType},
        feature_matrix, plan_resolver,
        usage::{self, ResourceCounters, UsageSnapshot},
    },
};

/// What the engine needs to know about an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: Uuid,
    pub plan: Option<String>,
    pub is_admin: bool,
}

impl From<&AppUserEntity> for AccountRef {
    fn from(value: &AppUserEntity) -> Self {
        Self {
            id: value.id,
            plan: value.plan.clone(),
            is_admin: value.is_admin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entitlements {
    pub level: PlanLevel,
    pub features: BTreeSet<FeatureKey>,
    pub usage: BTreeMap<ResourceType, UsageSnapshot>,
}

impl Entitlements {
    pub fn has_feature(&self, feature: FeatureKey) -> bool {
        self.features.contains(&feature)
    }
}

/// Features and quota state for one account. `plan` is the catalog entry the
/// account's identifier points at, if any.
pub fn get_entitlements(
    account: &AccountRef,
    plan: Option<&PlanEntity>,
    counters: &ResourceCounters,
) -> Entitlements {
    let level = plan_resolver::resolve_level_with_plan(account.plan.as_deref(), plan);

    let features = FeatureKey::ALL
        .into_iter()
        .filter(|feature| feature_matrix::has_feature_for_account(account, plan, *feature))
        .collect();

    let limits = usage::limits_for_plan(plan);
    let usage = usage::evaluate_usage(&limits, counters);

    Entitlements {
        level,
        features,
        usage,
    }
}
