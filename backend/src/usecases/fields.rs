use std::sync::Arc;

use anyhow::Result;
use crates::domain::{entities::fields::FieldEntity, repositories::fields::FieldRepository};
use tracing::{debug, error};

pub struct FieldUseCase<F>
where
    F: FieldRepository + Send + Sync + 'static,
{
    field_repo: Arc<F>,
}

impl<F> FieldUseCase<F>
where
    F: FieldRepository + Send + Sync + 'static,
{
    pub fn new(field_repo: Arc<F>) -> Self {
        Self { field_repo }
    }

    pub async fn list_fields(&self) -> Result<Vec<FieldEntity>> {
        let fields = self.field_repo.list_fields().await.map_err(|err| {
            error!(db_error = ?err, "fields: failed to list fields");
            err
        })?;

        debug!(count = fields.len(), "fields: listed");
        Ok(fields)
    }
}
