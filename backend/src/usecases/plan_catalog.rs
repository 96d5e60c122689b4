use std::sync::Arc;

use axum::http::StatusCode;
use crates::domain::{
    entities::plans::PlanEntity,
    repositories::plans::{PlanRepository, PlanStoreError},
    value_objects::plans::{InsertPlanModel, PlanValidationError, UpdatePlanModel},
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PlanCatalogError {
    #[error("caller is not authorized to modify the plan catalog")]
    Unauthorized,
    #[error("a plan named {0} already exists")]
    DuplicateName(String),
    #[error("{0}")]
    InvalidLimit(String),
    #[error("{0}")]
    InvalidPlan(String),
    #[error("plan not found")]
    PlanNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlanCatalogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlanCatalogError::Unauthorized => StatusCode::FORBIDDEN,
            PlanCatalogError::DuplicateName(_) => StatusCode::CONFLICT,
            PlanCatalogError::InvalidLimit(_) | PlanCatalogError::InvalidPlan(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PlanCatalogError::PlanNotFound => StatusCode::NOT_FOUND,
            PlanCatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps store failures, recognising unique-constraint collisions.
    fn from_store(err: anyhow::Error) -> Self {
        match err.downcast_ref::<PlanStoreError>() {
            Some(PlanStoreError::NameTaken(name)) => PlanCatalogError::DuplicateName(name.clone()),
            None => PlanCatalogError::Internal(err),
        }
    }
}

impl From<PlanValidationError> for PlanCatalogError {
    fn from(value: PlanValidationError) -> Self {
        match value {
            PlanValidationError::InvalidLimit { .. } => {
                PlanCatalogError::InvalidLimit(value.to_string())
            }
            other => PlanCatalogError::InvalidPlan(other.to_string()),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PlanCatalogError>;

pub struct PlanCatalogUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
}

impl<P> PlanCatalogUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>) -> Self {
        Self { plan_repo }
    }

    pub async fn list_active_plans(&self) -> UseCaseResult<Vec<PlanEntity>> {
        let plans = self.plan_repo.list_active_plans().await.map_err(|err| {
            error!(db_error = ?err, "plan_catalog: failed to list active plans");
            PlanCatalogError::Internal(err)
        })?;
        info!(plan_count = plans.len(), "plan_catalog: active plans loaded");
        Ok(plans)
    }

    /// Resolves a uuid, name or slug. Inactive plans are still returned.
    pub async fn get_plan_by_identifier(&self, identifier: &str) -> UseCaseResult<PlanEntity> {
        let found = match Uuid::parse_str(identifier.trim()) {
            Ok(plan_id) => self.plan_repo.find_by_id(plan_id).await,
            Err(_) => self.plan_repo.find_by_identifier(identifier).await,
        }
        .map_err(|err| {
            error!(identifier, db_error = ?err, "plan_catalog: failed to look up plan");
            PlanCatalogError::Internal(err)
        })?;

        found.ok_or_else(|| {
            info!(identifier, "plan_catalog: plan not found");
            PlanCatalogError::PlanNotFound
        })
    }

    pub async fn create_plan(
        &self,
        authorized: bool,
        insert_plan_model: InsertPlanModel,
    ) -> UseCaseResult<PlanEntity> {
        if !authorized {
            warn!(
                name = %insert_plan_model.name,
                "plan_catalog: unauthorized create refused"
            );
            return Err(PlanCatalogError::Unauthorized);
        }

        let insert_plan_entity = insert_plan_model.into_insert_entity().map_err(|err| {
            warn!(error = %err, "plan_catalog: create rejected by validation");
            PlanCatalogError::from(err)
        })?;

        self.ensure_identifier_free(&insert_plan_entity.name, None)
            .await?;
        if let Some(slug) = insert_plan_entity.slug.as_deref() {
            self.ensure_identifier_free(slug, None).await?;
        }

        let plan = self
            .plan_repo
            .insert_plan(insert_plan_entity)
            .await
            .map_err(PlanCatalogError::from_store)?;

        info!(plan_id = %plan.id, name = %plan.name, "plan_catalog: plan created");
        Ok(plan)
    }

    pub async fn update_plan(
        &self,
        authorized: bool,
        plan_id: Uuid,
        update_plan_model: UpdatePlanModel,
    ) -> UseCaseResult<PlanEntity> {
        if !authorized {
            warn!(%plan_id, "plan_catalog: unauthorized update refused");
            return Err(PlanCatalogError::Unauthorized);
        }

        let current = self
            .plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(PlanCatalogError::Internal)?
            .ok_or(PlanCatalogError::PlanNotFound)?;

        let changeset = update_plan_model.into_changeset(&current).map_err(|err| {
            warn!(%plan_id, error = %err, "plan_catalog: update rejected by validation");
            PlanCatalogError::from(err)
        })?;

        if let Some(name) = changeset.name.as_deref() {
            self.ensure_identifier_free(name, Some(plan_id)).await?;
        }
        if let Some(slug) = changeset.slug.as_deref() {
            self.ensure_identifier_free(slug, Some(plan_id)).await?;
        }

        let plan = self
            .plan_repo
            .update_plan(plan_id, changeset)
            .await
            .map_err(PlanCatalogError::from_store)?;

        info!(%plan_id, is_active = plan.is_active, "plan_catalog: plan updated");
        Ok(plan)
    }

    /// Retires a plan. It leaves the active listing but keeps resolving for
    /// accounts already on it.
    pub async fn deactivate_plan(&self, authorized: bool, plan_id: Uuid) -> UseCaseResult<PlanEntity> {
        self.update_plan(authorized, plan_id, UpdatePlanModel::deactivate())
            .await
    }

    async fn ensure_identifier_free(
        &self,
        identifier: &str,
        owner: Option<Uuid>,
    ) -> UseCaseResult<()> {
        let existing = self
            .plan_repo
            .find_by_identifier(identifier)
            .await
            .map_err(PlanCatalogError::Internal)?;

        match existing {
            Some(plan) if Some(plan.id) != owner => {
                warn!(
                    identifier,
                    existing_plan_id = %plan.id,
                    "plan_catalog: identifier already taken"
                );
                Err(PlanCatalogError::DuplicateName(identifier.to_string()))
            }
            _ => Ok(()),
        }
    }
}
