use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::value_objects::enums::resource_types::ResourceType;

/// Counts live (non-deleted) records an account owns. No records is `0`.
#[async_trait]
#[automock]
pub trait ResourceCounterRepository {
    async fn count_owned(&self, user_id: Uuid, resource_type: ResourceType) -> Result<i64>;
}
