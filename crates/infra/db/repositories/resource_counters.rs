use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::sum, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain;
use crate::infra::db::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{campaigns, customers, flyers, integrations, media_files, products},
};
use domain::{
    repositories::resource_counters::ResourceCounterRepository,
    value_objects::enums::resource_types::ResourceType,
};

const KIB_PER_MIB: i64 = 1024;

/// Rounds up so any stored byte counts against the quota.
fn kib_to_mib(kib: i64) -> i64 {
    (kib.max(0) + KIB_PER_MIB - 1) / KIB_PER_MIB
}

pub struct ResourceCounterPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ResourceCounterPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ResourceCounterRepository for ResourceCounterPostgres {
    async fn count_owned(&self, user_id: Uuid, resource_type: ResourceType) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = match resource_type {
            ResourceType::Flyers => flyers::table
                .filter(flyers::user_id.eq(user_id))
                .filter(flyers::deleted_at.is_null())
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceType::Products => products::table
                .filter(products::user_id.eq(user_id))
                .filter(products::deleted_at.is_null())
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceType::Customers => customers::table
                .filter(customers::user_id.eq(user_id))
                .filter(customers::deleted_at.is_null())
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceType::Integrations => integrations::table
                .filter(integrations::user_id.eq(user_id))
                .filter(integrations::deleted_at.is_null())
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceType::Campaigns => campaigns::table
                .filter(campaigns::user_id.eq(user_id))
                .filter(campaigns::deleted_at.is_null())
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceType::Storage => {
                let total_kib = media_files::table
                    .filter(media_files::user_id.eq(user_id))
                    .filter(media_files::deleted_at.is_null())
                    .select(sum(media_files::size_kb))
                    .get_result::<Option<i64>>(&mut conn)?;
                kib_to_mib(total_kib.unwrap_or(0))
            }
        };

        Ok(count)
    }
}
