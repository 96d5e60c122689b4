use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity};

/// Raised by stores (wrapped in `anyhow::Error`) when a write collides with
/// an existing plan's name or slug.
#[derive(Debug, Error)]
pub enum PlanStoreError {
    #[error("plan name or slug already taken: {0}")]
    NameTaken(String),
}

/// Plan catalog store. Lookups by identifier include inactive plans so that
/// accounts already on a retired plan keep resolving it.
#[async_trait]
#[automock]
pub trait PlanRepository {
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;
    /// Case-insensitive match on name or slug.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<PlanEntity>>;
    /// Active plans ordered by rank, then name.
    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>>;
    async fn insert_plan(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity>;
    async fn update_plan(
        &self,
        plan_id: Uuid,
        update_plan_entity: UpdatePlanEntity,
    ) -> Result<PlanEntity>;
}
