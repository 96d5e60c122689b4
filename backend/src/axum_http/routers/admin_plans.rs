use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    usecases::plan_catalog::PlanCatalogUseCase,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
};
use crates::{
    domain::{
        repositories::plans::PlanRepository,
        value_objects::plans::{InsertPlanModel, PlanDto, UpdatePlanModel},
    },
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::plans::PlanPostgres},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Catalog writes. The role check here only produces the `authorized` flag;
/// the use case refuses to write without it.
pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let usecase = PlanCatalogUseCase::new(Arc::new(plan_repository));

    Router::new()
        .route("/", post(create_plan))
        .route("/:plan_id", patch(update_plan))
        .route("/:plan_id/deactivate", post(deactivate_plan))
        .with_state(Arc::new(usecase))
}

pub async fn create_plan<P>(
    State(usecase): State<Arc<PlanCatalogUseCase<P>>>,
    auth: AuthUser,
    Json(insert_plan_model): Json<InsertPlanModel>,
) -> Result<(StatusCode, Json<PlanDto>), AppError>
where
    P: PlanRepository + Send + Sync + 'static,
{
    info!(user_id = %auth.user_id, name = %insert_plan_model.name, "admin_plans: create requested");
    let plan = usecase
        .create_plan(auth.is_admin(), insert_plan_model)
        .await?;
    Ok((StatusCode::CREATED, Json(plan.into())))
}

pub async fn update_plan<P>(
    State(usecase): State<Arc<PlanCatalogUseCase<P>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(update_plan_model): Json<UpdatePlanModel>,
) -> Result<Json<PlanDto>, AppError>
where
    P: PlanRepository + Send + Sync + 'static,
{
    info!(user_id = %auth.user_id, %plan_id, "admin_plans: update requested");
    let plan = usecase
        .update_plan(auth.is_admin(), plan_id, update_plan_model)
        .await?;
    Ok(Json(plan.into()))
}

pub async fn deactivate_plan<P>(
    State(usecase): State<Arc<PlanCatalogUseCase<P>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PlanDto>, AppError>
where
    P: PlanRepository + Send + Sync + 'static,
{
    info!(user_id = %auth.user_id, %plan_id, "admin_plans: deactivate requested");
    let plan = usecase.deactivate_plan(auth.is_admin(), plan_id).await?;
    Ok(Json(plan.into()))
}
