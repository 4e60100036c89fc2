use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::fields},
};
use domain::{entities::fields::FieldEntity, repositories::fields::FieldRepository};

pub struct FieldPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl FieldPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl FieldRepository for FieldPostgres {
    async fn list_fields(&self) -> Result<Vec<FieldEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = fields::table
            .select(FieldEntity::as_select())
            .order(fields::id.asc())
            .load::<FieldEntity>(&mut conn)?;

        Ok(rows)
    }

    async fn find_by_id(&self, field_id: i64) -> Result<Option<FieldEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = fields::table
            .filter(fields::id.eq(field_id))
            .select(FieldEntity::as_select())
            .first::<FieldEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }
}
