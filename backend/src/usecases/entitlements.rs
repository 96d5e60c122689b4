use std::sync::Arc;

use axum::http::StatusCode;
use crates::domain::{
    entities::plans::PlanEntity,
    repositories::{
        app_users::AppUserRepository, plans::PlanRepository,
        resource_counters::ResourceCounterRepository,
    },
    value_objects::{
        entitlements::{self, AccountRef, Entitlements},
        enums::{feature_keys::FeatureKey, resource_types::ResourceType},
        feature_matrix, plan_resolver,
        usage::{self, QuotaCheck, ResourceCounters},
    },
};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("account not found")]
    AccountNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EntitlementError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntitlementError::AccountNotFound => StatusCode::NOT_FOUND,
            EntitlementError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, EntitlementError>;

/// Gathers the account, its catalog plan and live counters, then hands them to
/// the pure entitlement computation.
pub struct EntitlementUseCase<U, P, C>
where
    U: AppUserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: ResourceCounterRepository + Send + Sync + 'static,
{
    app_user_repo: Arc<U>,
    plan_repo: Arc<P>,
    counter_repo: Arc<C>,
}

impl<U, P, C> EntitlementUseCase<U, P, C>
where
    U: AppUserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: ResourceCounterRepository + Send + Sync + 'static,
{
    pub fn new(app_user_repo: Arc<U>, plan_repo: Arc<P>, counter_repo: Arc<C>) -> Self {
        Self {
            app_user_repo,
            plan_repo,
            counter_repo,
        }
    }

    pub async fn get_entitlements(&self, user_id: Uuid) -> UseCaseResult<Entitlements> {
        let account = self.load_account(user_id).await?;
        let plan = self.find_catalog_plan(&account).await;
        let counters = self.collect_counters(user_id).await?;

        let result = entitlements::get_entitlements(&account, plan.as_ref(), &counters);
        info!(
            %user_id,
            level = %result.level,
            feature_count = result.features.len(),
            "entitlements: computed"
        );
        Ok(result)
    }

    /// Feature check without counting resources.
    pub async fn check_feature(&self, user_id: Uuid, feature: FeatureKey) -> UseCaseResult<bool> {
        let account = self.load_account(user_id).await?;
        if account.is_admin {
            return Ok(true);
        }

        let plan = self.find_catalog_plan(&account).await;
        let enabled = feature_matrix::has_feature_for_account(&account, plan.as_ref(), feature);
        debug!(%user_id, %feature, enabled, "entitlements: feature checked");
        Ok(enabled)
    }

    /// Quota state of a single resource, counting only that resource.
    pub async fn check_quota(
        &self,
        user_id: Uuid,
        resource_type: ResourceType,
    ) -> UseCaseResult<QuotaCheck> {
        let account = self.load_account(user_id).await?;
        let plan = self.find_catalog_plan(&account).await;
        let used = self.count_resource(user_id, resource_type).await?;

        let limits = usage::limits_for_plan(plan.as_ref());
        let check = QuotaCheck::new(
            resource_type,
            usage::evaluate_resource(&limits, resource_type, used),
        );
        debug!(%user_id, %resource_type, status = ?check.status, "entitlements: quota checked");
        Ok(check)
    }

    async fn load_account(&self, user_id: Uuid) -> UseCaseResult<AccountRef> {
        let user = self
            .app_user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "entitlements: failed to load account");
                EntitlementError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "entitlements: account not found");
                EntitlementError::AccountNotFound
            })?;

        Ok(AccountRef::from(&user))
    }

    /// Looks the plan up by the raw identifier, then by the canonical slug of
    /// the level it resolves to. Lookup failures degrade to "no catalog plan",
    /// which means free defaults.
    async fn find_catalog_plan(&self, account: &AccountRef) -> Option<PlanEntity> {
        let raw = account
            .plan
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty());
        let canonical = plan_resolver::resolve_level(raw).as_str();

        let mut candidates = Vec::with_capacity(2);
        if let Some(raw) = raw {
            candidates.push(raw);
        }
        if !raw.is_some_and(|raw| raw.eq_ignore_ascii_case(canonical)) {
            candidates.push(canonical);
        }

        for identifier in candidates {
            match self.plan_repo.find_by_identifier(identifier).await {
                Ok(Some(plan)) => return Some(plan),
                Ok(None) => continue,
                Err(err) => {
                    error!(
                        user_id = %account.id,
                        identifier,
                        db_error = ?err,
                        "entitlements: plan lookup failed; using free defaults"
                    );
                    return None;
                }
            }
        }

        debug!(user_id = %account.id, "entitlements: no catalog plan for account");
        None
    }

    async fn collect_counters(&self, user_id: Uuid) -> UseCaseResult<ResourceCounters> {
        let mut counters = ResourceCounters::new();
        for resource_type in ResourceType::ALL {
            let count = self.count_resource(user_id, resource_type).await?;
            counters.insert(resource_type, count);
        }
        Ok(counters)
    }

    async fn count_resource(&self, user_id: Uuid, resource_type: ResourceType) -> UseCaseResult<i64> {
        self.counter_repo
            .count_owned(user_id, resource_type)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %resource_type,
                    db_error = ?err,
                    "entitlements: failed to count resources"
                );
                EntitlementError::Internal(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crates::domain::{
        entities::app_users::AppUserEntity,
        repositories::{
            app_users::MockAppUserRepository, plans::MockPlanRepository,
            resource_counters::MockResourceCounterRepository,
        },
        value_objects::{
            enums::plan_levels::PlanLevel,
            plans::{Limit, ResourceLimits},
            usage::{QuotaStatus, UsageSnapshot},
        },
    };
    use mockall::predicate::eq;

    fn app_user(user_id: Uuid, plan: Option<&str>, role: &str) -> AppUserEntity {
        AppUserEntity {
            id: user_id,
            display_name: Some("Mercado Central".to_string()),
            plan: plan.map(str::to_string),
            role: role.to_string(),
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    fn pro_plan() -> PlanEntity {
        let now = Utc::now();
        PlanEntity {
            id: Uuid::new_v4(),
            name: "Pro".to_string(),
            slug: Some("pro".to_string()),
            price_minor: 9990,
            rank: 2,
            is_active: true,
            limits: ResourceLimits::new([(ResourceType::Flyers, Limit::Capped(50))]),
            created_at: now,
            updated_at: now,
        }
    }

    fn user_repo(user: Option<AppUserEntity>) -> MockAppUserRepository {
        let mut repo = MockAppUserRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(user) })
        });
        repo
    }

    fn counter_repo(flyers: i64) -> MockResourceCounterRepository {
        let mut repo = MockResourceCounterRepository::new();
        repo.expect_count_owned().returning(move |_, resource_type| {
            let count = if resource_type == ResourceType::Flyers { flyers } else { 0 };
            Box::pin(async move { Ok(count) })
        });
        repo
    }

    #[tokio::test]
    async fn pro_account_gets_pro_features_and_usage() {
        let user_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        let plan = pro_plan();

        plan_repo
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "pro")
            .times(1)
            .returning(move |_| {
                let plan = plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(Some(app_user(user_id, Some("pro"), "authenticated")))),
            Arc::new(plan_repo),
            Arc::new(counter_repo(5)),
        );
        let result = usecase.get_entitlements(user_id).await.unwrap();

        assert_eq!(result.level, PlanLevel::Pro);
        assert!(result.has_feature(FeatureKey::Analytics));
        assert_eq!(
            result.usage[&ResourceType::Flyers],
            UsageSnapshot {
                used: 5,
                limit: Limit::Capped(50),
                percentage: Some(10.0),
            }
        );
    }

    #[tokio::test]
    async fn legacy_alias_falls_back_to_canonical_catalog_entry() {
        let user_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        let plan = pro_plan();

        plan_repo
            .expect_find_by_identifier()
            .with(eq("Profissional"))
            .times(1)
            .returning(|_| Box::pin(async { Ok(None) }));
        plan_repo
            .expect_find_by_identifier()
            .with(eq("pro"))
            .times(1)
            .returning(move |_| {
                let plan = plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(Some(app_user(
                user_id,
                Some("Profissional"),
                "authenticated",
            )))),
            Arc::new(plan_repo),
            Arc::new(counter_repo(5)),
        );
        let result = usecase.get_entitlements(user_id).await.unwrap();

        assert_eq!(result.level, PlanLevel::Pro);
        assert_eq!(result.usage[&ResourceType::Flyers].percentage, Some(10.0));
    }

    #[tokio::test]
    async fn plan_lookup_failure_degrades_to_free_defaults() {
        let user_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();

        plan_repo
            .expect_find_by_identifier()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("connection reset")) }));

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(Some(app_user(user_id, None, "authenticated")))),
            Arc::new(plan_repo),
            Arc::new(counter_repo(3)),
        );
        let result = usecase.get_entitlements(user_id).await.unwrap();

        assert_eq!(result.level, PlanLevel::Free);
        assert!(!result.has_feature(FeatureKey::HotPromos));
        assert_eq!(
            result.usage[&ResourceType::Flyers],
            UsageSnapshot {
                used: 3,
                limit: Limit::Capped(0),
                percentage: None,
            }
        );
        assert_eq!(
            result.usage[&ResourceType::Products].limit,
            Limit::Capped(crates::domain::value_objects::plans::FREE_DEFAULT_PRODUCTS)
        );
    }

    #[tokio::test]
    async fn missing_account_is_reported() {
        let mut counters = MockResourceCounterRepository::new();
        counters.expect_count_owned().never();

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(None)),
            Arc::new(MockPlanRepository::new()),
            Arc::new(counters),
        );
        let err = usecase.get_entitlements(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, EntitlementError::AccountNotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn counter_failure_is_an_internal_error() {
        let user_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_identifier()
            .returning(|_| Box::pin(async { Ok(None) }));
        let mut counters = MockResourceCounterRepository::new();
        counters
            .expect_count_owned()
            .returning(|_, _| Box::pin(async { Err(anyhow::anyhow!("timeout")) }));

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(Some(app_user(user_id, Some("pro"), "authenticated")))),
            Arc::new(plan_repo),
            Arc::new(counters),
        );
        let err = usecase.get_entitlements(user_id).await.unwrap_err();

        assert!(matches!(err, EntitlementError::Internal(_)));
    }

    #[tokio::test]
    async fn admin_feature_check_skips_plan_lookup() {
        let user_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        plan_repo.expect_find_by_identifier().never();

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(Some(app_user(user_id, None, "admin")))),
            Arc::new(plan_repo),
            Arc::new(MockResourceCounterRepository::new()),
        );

        assert!(
            usecase
                .check_feature(user_id, FeatureKey::PrioritySupport)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn free_account_feature_check_fails_closed() {
        let user_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_identifier()
            .with(eq("free"))
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(Some(app_user(user_id, Some("  "), "authenticated")))),
            Arc::new(plan_repo),
            Arc::new(MockResourceCounterRepository::new()),
        );

        assert!(
            !usecase
                .check_feature(user_id, FeatureKey::Analytics)
                .await
                .unwrap()
        );
        assert!(
            usecase
                .check_feature(user_id, FeatureKey::Showcase)
                .await
                .unwrap()
        );
    }

    fn catalog_plan(name: &str, slug: Option<&str>, rank: i32, is_active: bool) -> PlanEntity {
        PlanEntity {
            name: name.to_string(),
            slug: slug.map(str::to_string),
            rank,
            is_active,
            ..pro_plan()
        }
    }

    #[tokio::test]
    async fn catalog_only_name_resolves_through_its_entry() {
        let user_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        let gold = catalog_plan("Gold", None, 3, true);

        plan_repo
            .expect_find_by_identifier()
            .with(eq("Gold"))
            .times(2)
            .returning(move |_| {
                let plan = gold.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(Some(app_user(user_id, Some("Gold"), "authenticated")))),
            Arc::new(plan_repo),
            Arc::new(counter_repo(5)),
        );

        let result = usecase.get_entitlements(user_id).await.unwrap();
        assert_eq!(result.level, PlanLevel::Business);
        assert!(result.has_feature(FeatureKey::Integrations));
        assert_eq!(result.usage[&ResourceType::Flyers].percentage, Some(10.0));

        let enabled = usecase
            .check_feature(user_id, FeatureKey::Integrations)
            .await
            .unwrap();
        assert_eq!(enabled, result.has_feature(FeatureKey::Integrations));
    }

    #[tokio::test]
    async fn deactivated_plan_keeps_serving_existing_accounts() {
        let user_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        let retired = catalog_plan("Pro Antigo", Some("pro-antigo"), 2, false);

        plan_repo
            .expect_find_by_identifier()
            .with(eq("pro-antigo"))
            .times(1)
            .returning(move |_| {
                let plan = retired.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });
        plan_repo.expect_list_active_plans().never();

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(Some(app_user(user_id, Some("pro-antigo"), "authenticated")))),
            Arc::new(plan_repo),
            Arc::new(counter_repo(5)),
        );
        let result = usecase.get_entitlements(user_id).await.unwrap();

        assert_eq!(result.level, PlanLevel::Pro);
        assert!(result.has_feature(FeatureKey::Analytics));
        assert_eq!(
            result.usage[&ResourceType::Flyers],
            UsageSnapshot {
                used: 5,
                limit: Limit::Capped(50),
                percentage: Some(10.0),
            }
        );
    }

    #[tokio::test]
    async fn quota_check_counts_only_the_requested_resource() {
        let user_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        let plan = pro_plan();
        plan_repo
            .expect_find_by_identifier()
            .with(eq("pro"))
            .returning(move |_| {
                let plan = plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let mut counters = MockResourceCounterRepository::new();
        counters
            .expect_count_owned()
            .with(eq(user_id), eq(ResourceType::Flyers))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(45) }));

        let usecase = EntitlementUseCase::new(
            Arc::new(user_repo(Some(app_user(user_id, Some("pro"), "authenticated")))),
            Arc::new(plan_repo),
            Arc::new(counters),
        );
        let check = usecase
            .check_quota(user_id, ResourceType::Flyers)
            .await
            .unwrap();

        assert_eq!(check.status, QuotaStatus::Warning);
        assert_eq!(check.remaining, Some(5));
        assert!(check.can_create());
    }
}
