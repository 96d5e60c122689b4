use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    usecases::plan_catalog::PlanCatalogUseCase,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use crates::{
    domain::{repositories::plans::PlanRepository, value_objects::plans::PlanDto},
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::plans::PlanPostgres},
};
use std::sync::Arc;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let usecase = PlanCatalogUseCase::new(Arc::new(plan_repository));

    Router::new()
        .route("/", get(list_plans))
        .route("/:identifier", get(get_plan))
        .with_state(Arc::new(usecase))
}

pub async fn list_plans<P>(
    State(usecase): State<Arc<PlanCatalogUseCase<P>>>,
    _auth: AuthUser,
) -> Result<Json<Vec<PlanDto>>, AppError>
where
    P: PlanRepository + Send + Sync + 'static,
{
    let plans = usecase.list_active_plans().await?;
    Ok(Json(plans.into_iter().map(PlanDto::from).collect()))
}

pub async fn get_plan<P>(
    State(usecase): State<Arc<PlanCatalogUseCase<P>>>,
    _auth: AuthUser,
    Path(identifier): Path<String>,
) -> Result<Json<PlanDto>, AppError>
where
    P: PlanRepository + Send + Sync + 'static,
{
    let plan = usecase.get_plan_by_identifier(&identifier).await?;
    Ok(Json(plan.into()))
}
