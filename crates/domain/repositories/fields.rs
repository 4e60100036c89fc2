use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::fields::FieldEntity;

#[async_trait]
#[automock]
pub trait FieldRepository {
    async fn list_fields(&self) -> Result<Vec<FieldEntity>>;

    async fn find_by_id(&self, field_id: i64) -> Result<Option<FieldEntity>>;
}
