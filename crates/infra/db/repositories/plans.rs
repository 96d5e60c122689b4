use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    RunQueryDsl, insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    sql_types::Text,
    update,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain;
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::plans};
use domain::{
    entities::plans::{InsertPlanEntity, PlanEntity, PlanRow, UpdatePlanEntity},
    repositories::plans::{PlanRepository, PlanStoreError},
};

diesel::define_sql_function!(fn lower(x: Text) -> Text);

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn map_write_error(err: DieselError, name: &str) -> anyhow::Error {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PlanStoreError::NameTaken(name.to_string()).into()
        }
        other => other.into(),
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = plans::table
            .filter(plans::id.eq(plan_id))
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let identifier = identifier.trim().to_lowercase();

        // No is_active filter: retired plans must keep resolving.
        let row = plans::table
            .filter(
                lower(plans::name)
                    .eq(&identifier)
                    .or(plans::slug.eq(&identifier)),
            )
            .order((plans::is_active.desc(), plans::rank.asc()))
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = plans::table
            .filter(plans::is_active.eq(true))
            .order((plans::rank.asc(), plans::name.asc()))
            .select(PlanRow::as_select())
            .load::<PlanRow>(&mut conn)?;

        Ok(rows.into_iter().map(PlanEntity::from).collect())
    }

    async fn insert_plan(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(plans::table)
            .values(&insert_plan_entity)
            .returning(PlanRow::as_returning())
            .get_result::<PlanRow>(&mut conn)
            .map_err(|err| map_write_error(err, &insert_plan_entity.name))?;

        Ok(row.into())
    }

    async fn update_plan(
        &self,
        plan_id: Uuid,
        update_plan_entity: UpdatePlanEntity,
    ) -> Result<PlanEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let name = update_plan_entity.name.clone().unwrap_or_default();

        let row = update(plans::table.filter(plans::id.eq(plan_id)))
            .set(&update_plan_entity)
            .returning(PlanRow::as_returning())
            .get_result::<PlanRow>(&mut conn)
            .map_err(|err| map_write_error(err, &name))?;

        Ok(row.into())
    }
}
