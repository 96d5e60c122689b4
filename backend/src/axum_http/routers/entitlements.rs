use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    usecases::entitlements::EntitlementUseCase,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use crates::{
    domain::{
        repositories::{
            app_users::AppUserRepository, plans::PlanRepository,
            resource_counters::ResourceCounterRepository,
        },
        value_objects::{
            entitlements::Entitlements,
            enums::{feature_keys::FeatureKey, plan_levels::PlanLevel, resource_types::ResourceType},
            feature_matrix,
            usage::QuotaCheck,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            app_users::AppUserPostgres, plans::PlanPostgres,
            resource_counters::ResourceCounterPostgres,
        },
    },
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct FeatureCheckResponse {
    pub feature: String,
    pub enabled: bool,
    /// Lowest level unlocking the feature, for upgrade prompts.
    pub minimum_level: Option<PlanLevel>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let app_user_repository = AppUserPostgres::new(Arc::clone(&db_pool));
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let counter_repository = ResourceCounterPostgres::new(Arc::clone(&db_pool));

    let usecase = EntitlementUseCase::new(
        Arc::new(app_user_repository),
        Arc::new(plan_repository),
        Arc::new(counter_repository),
    );

    Router::new()
        .route("/", get(get_entitlements))
        .route("/features/:feature", get(check_feature))
        .route("/quotas/:resource", get(check_quota))
        .with_state(Arc::new(usecase))
}

pub async fn get_entitlements<U, P, C>(
    State(usecase): State<Arc<EntitlementUseCase<U, P, C>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<Entitlements>, AppError>
where
    U: AppUserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: ResourceCounterRepository + Send + Sync + 'static,
{
    info!(%user_id, "entitlements: snapshot requested");
    let entitlements = usecase.get_entitlements(user_id).await?;
    Ok(Json(entitlements))
}

pub async fn check_feature<U, P, C>(
    State(usecase): State<Arc<EntitlementUseCase<U, P, C>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(feature): Path<String>,
) -> Result<Json<FeatureCheckResponse>, AppError>
where
    U: AppUserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: ResourceCounterRepository + Send + Sync + 'static,
{
    let Some(feature_key) = FeatureKey::from_str(&feature) else {
        warn!(%user_id, feature, "entitlements: unknown feature key; failing closed");
        return Ok(Json(FeatureCheckResponse {
            feature,
            enabled: false,
            minimum_level: None,
        }));
    };

    let enabled = usecase.check_feature(user_id, feature_key).await?;
    Ok(Json(FeatureCheckResponse {
        feature: feature_key.to_string(),
        enabled,
        minimum_level: feature_matrix::minimum_level_for(feature_key),
    }))
}

pub async fn check_quota<U, P, C>(
    State(usecase): State<Arc<EntitlementUseCase<U, P, C>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(resource): Path<String>,
) -> Result<Json<QuotaCheck>, AppError>
where
    U: AppUserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: ResourceCounterRepository + Send + Sync + 'static,
{
    let resource_type = parse_resource(&resource)?;
    let check = usecase.check_quota(user_id, resource_type).await?;
    Ok(Json(check))
}

fn parse_resource(raw: &str) -> Result<ResourceType, AppError> {
    ResourceType::from_str(raw)
        .ok_or_else(|| AppError::BadRequest(format!("unknown resource type: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn resource_path_accepts_aliases_and_rejects_unknown() {
        assert_eq!(parse_resource("produtos").unwrap(), ResourceType::Products);

        let err = parse_resource("widgets").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Bad request: unknown resource type: widgets");
    }
}
