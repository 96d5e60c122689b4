use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::{
    entities::plans::PlanEntity,
    value_objects::{
        enums::resource_types::ResourceType,
        plans::{Limit, ResourceLimits},
    },
};

/// Live count of owned records per resource type, supplied by the caller.
pub type ResourceCounters = BTreeMap<ResourceType, i64>;

/// Percentage at which a capped resource starts warning.
pub const WARNING_THRESHOLD_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuotaStatus {
    Unlimited,
    Ok,
    Warning,
    Reached,
    Exceeded,
}

/// Consumption of one resource at query time. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct UsageSnapshot {
    pub used: i64,
    pub limit: Limit,
    /// `None` when the limit is unlimited or zero. Not capped at 100.
    pub percentage: Option<f64>,
}

impl UsageSnapshot {
    pub fn new(used: i64, limit: Limit) -> Self {
        let percentage = match limit {
            Limit::Unlimited | Limit::Capped(0) => None,
            Limit::Capped(cap) => Some(((used as f64 * 100.0) / cap as f64).max(0.0)),
        };
        Self {
            used,
            limit,
            percentage,
        }
    }

    /// Slots left before the cap. `None` for unlimited resources.
    pub fn remaining(&self) -> Option<i64> {
        match self.limit {
            Limit::Unlimited => None,
            Limit::Capped(cap) => Some((cap - self.used).max(0)),
        }
    }

    pub fn is_over_quota(&self) -> bool {
        match self.limit {
            Limit::Unlimited => false,
            Limit::Capped(cap) => self.used > cap,
        }
    }

    pub fn status(&self) -> QuotaStatus {
        match (self.limit, self.percentage) {
            (Limit::Unlimited, _) => QuotaStatus::Unlimited,
            (Limit::Capped(_), _) if self.is_over_quota() => QuotaStatus::Exceeded,
            (Limit::Capped(_), None) => QuotaStatus::Reached,
            (Limit::Capped(_), Some(p)) if p >= 100.0 => QuotaStatus::Reached,
            (Limit::Capped(_), Some(p)) if p >= WARNING_THRESHOLD_PERCENT => QuotaStatus::Warning,
            (Limit::Capped(_), Some(_)) => QuotaStatus::Ok,
        }
    }
}

/// One resource's quota state, with the status derived from the snapshot so
/// callers can gate creation without redoing the arithmetic.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct QuotaCheck {
    pub resource: ResourceType,
    #[serde(flatten)]
    pub snapshot: UsageSnapshot,
    pub remaining: Option<i64>,
    pub over_quota: bool,
    pub status: QuotaStatus,
}

impl QuotaCheck {
    pub fn new(resource: ResourceType, snapshot: UsageSnapshot) -> Self {
        Self {
            resource,
            snapshot,
            remaining: snapshot.remaining(),
            over_quota: snapshot.is_over_quota(),
            status: snapshot.status(),
        }
    }

    /// True when one more record would still fit under the cap.
    pub fn can_create(&self) -> bool {
        matches!(
            self.status,
            QuotaStatus::Unlimited | QuotaStatus::Ok | QuotaStatus::Warning
        )
    }
}

/// Limit table that applies to an account: its catalog entry's, or the free
/// defaults when it has none.
pub fn limits_for_plan(plan: Option<&PlanEntity>) -> ResourceLimits {
    match plan {
        Some(plan) => plan.limits.clone(),
        None => ResourceLimits::free_defaults(),
    }
}

/// Snapshot of one resource. A resource the table does not mention gets a
/// limit of zero; negative counts are clamped.
pub fn evaluate_resource(
    limits: &ResourceLimits,
    resource: ResourceType,
    raw_used: i64,
) -> UsageSnapshot {
    let used = if raw_used < 0 {
        warn!(%resource, raw_used, "usage: negative counter clamped to zero");
        0
    } else {
        raw_used
    };
    let limit = limits.get(resource).unwrap_or(Limit::Capped(0));

    UsageSnapshot::new(used, limit)
}

/// Builds one snapshot per resource in the limit table or the counters.
pub fn evaluate_usage(
    limits: &ResourceLimits,
    counters: &ResourceCounters,
) -> BTreeMap<ResourceType, UsageSnapshot> {
    let resources = limits
        .iter()
        .map(|(resource, _)| resource)
        .chain(counters.keys().copied());

    let mut usage = BTreeMap::new();
    for resource in resources {
        if usage.contains_key(&resource) {
            continue;
        }
        let raw_used = counters.get(&resource).copied().unwrap_or(0);
        usage.insert(resource, evaluate_resource(limits, resource, raw_used));
    }
    usage
}
