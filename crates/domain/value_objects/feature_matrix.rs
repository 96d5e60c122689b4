//! Which features each plan level unlocks.
//!
//! Every level lists its full feature set explicitly. `verify_monotonic` checks
//! that a higher level never loses a feature a lower one has; the backend runs
//! it before serving traffic.

use thiserror::Error;

use crate::domain::{
    entities::plans::PlanEntity,
    value_objects::{
        entitlements::AccountRef,
        enums::{feature_keys::FeatureKey, plan_levels::PlanLevel},
        plan_resolver,
    },
};

use FeatureKey::*;

const FREE_FEATURES: &[FeatureKey] = &[Showcase, Products];

const START_FEATURES: &[FeatureKey] = &[Showcase, Products, Flyers, Sales, Notifications];

const PRO_FEATURES: &[FeatureKey] = &[
    Showcase,
    Products,
    Flyers,
    Sales,
    Notifications,
    HotPromos,
    Analytics,
    Campaigns,
    CustomerCrm,
];

const BUSINESS_FEATURES: &[FeatureKey] = &[
    Showcase,
    Products,
    Flyers,
    Sales,
    Notifications,
    HotPromos,
    Analytics,
    Campaigns,
    CustomerCrm,
    AiAssistant,
    ProximityCustomers,
    Integrations,
];

const ENTERPRISE_FEATURES: &[FeatureKey] = &[
    Showcase,
    Products,
    Flyers,
    Sales,
    Notifications,
    HotPromos,
    Analytics,
    Campaigns,
    CustomerCrm,
    AiAssistant,
    ProximityCustomers,
    Integrations,
    VisualSignage,
];

const PREMIUM_FEATURES: &[FeatureKey] = &[
    Showcase,
    Products,
    Flyers,
    Sales,
    Notifications,
    HotPromos,
    Analytics,
    Campaigns,
    CustomerCrm,
    AiAssistant,
    ProximityCustomers,
    Integrations,
    VisualSignage,
    PrioritySupport,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("feature {feature} is enabled at {lower} but missing at {higher}")]
    NotMonotonic {
        feature: FeatureKey,
        lower: PlanLevel,
        higher: PlanLevel,
    },
}

pub fn features_for(level: PlanLevel) -> &'static [FeatureKey] {
    match level {
        PlanLevel::Free => FREE_FEATURES,
        PlanLevel::Start => START_FEATURES,
        PlanLevel::Pro => PRO_FEATURES,
        PlanLevel::Business => BUSINESS_FEATURES,
        PlanLevel::Enterprise => ENTERPRISE_FEATURES,
        PlanLevel::Premium => PREMIUM_FEATURES,
    }
}

pub fn has_feature(level: PlanLevel, feature: FeatureKey) -> bool {
    features_for(level).contains(&feature)
}

/// Account-level gate. `plan` is the catalog entry the account's identifier
/// points at, if any. Administrators bypass the matrix entirely.
pub fn has_feature_for_account(
    account: &AccountRef,
    plan: Option<&PlanEntity>,
    feature: FeatureKey,
) -> bool {
    if account.is_admin {
        return true;
    }
    let level = plan_resolver::resolve_level_with_plan(account.plan.as_deref(), plan);
    has_feature(level, feature)
}

/// Lowest level that unlocks `feature`, for upgrade prompts.
pub fn minimum_level_for(feature: FeatureKey) -> Option<PlanLevel> {
    PlanLevel::ALL
        .into_iter()
        .find(|level| has_feature(*level, feature))
}

pub fn verify_monotonic() -> Result<(), MatrixError> {
    for higher in PlanLevel::ALL {
        let Some(lower) = higher.previous() else {
            continue;
        };
        if let Some(feature) = features_for(lower)
            .iter()
            .find(|feature| !has_feature(higher, **feature))
        {
            return Err(MatrixError::NotMonotonic {
                feature: *feature,
                lower,
                higher,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::plans::ResourceLimits;
    use chrono::Utc;
    use uuid::Uuid;

    fn account(plan: Option<&str>, is_admin: bool) -> AccountRef {
        AccountRef {
            id: Uuid::new_v4(),
            plan: plan.map(str::to_string),
            is_admin,
        }
    }

    #[test]
    fn matrix_is_monotonic() {
        assert_eq!(verify_monotonic(), Ok(()));
    }

    #[test]
    fn every_lower_set_is_a_subset_of_every_higher_set() {
        for (i, lower) in PlanLevel::ALL.iter().enumerate() {
            for higher in &PlanLevel::ALL[i..] {
                for feature in features_for(*lower) {
                    assert!(
                        has_feature(*higher, *feature),
                        "{feature} at {lower} but not at {higher}"
                    );
                }
            }
        }
    }

    #[test]
    fn every_feature_is_reachable_and_premium_has_all() {
        for feature in FeatureKey::ALL {
            assert!(minimum_level_for(feature).is_some(), "{feature} unreachable");
            assert!(has_feature(PlanLevel::Premium, feature));
        }
    }

    #[test]
    fn pro_unlocks_analytics_but_free_lacks_hot_promos() {
        assert!(has_feature(PlanLevel::Pro, Analytics));
        assert!(!has_feature(PlanLevel::Free, HotPromos));
        assert_eq!(minimum_level_for(HotPromos), Some(PlanLevel::Pro));
    }

    #[test]
    fn administrator_override_enables_everything_on_free() {
        let admin = account(None, true);
        for feature in FeatureKey::ALL {
            assert!(has_feature_for_account(&admin, None, feature));
        }
    }

    #[test]
    fn account_gate_resolves_legacy_alias() {
        assert!(has_feature_for_account(&account(Some("profissional"), false), None, Analytics));
        assert!(!has_feature_for_account(&account(Some("unknown"), false), None, Flyers));
    }

    #[test]
    fn account_gate_uses_catalog_entry_for_unaliased_names() {
        let at = Utc::now();
        let gold = PlanEntity {
            id: Uuid::new_v4(),
            name: "Gold".to_string(),
            slug: None,
            price_minor: 19990,
            rank: 3,
            is_active: true,
            limits: ResourceLimits::default(),
            created_at: at,
            updated_at: at,
        };
        let account = account(Some("Gold"), false);

        assert!(has_feature_for_account(&account, Some(&gold), Integrations));
        assert!(!has_feature_for_account(&account, None, Integrations));
    }
}
