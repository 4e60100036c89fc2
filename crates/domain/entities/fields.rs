use diesel::prelude::*;
use serde::Serialize;

use crate::infra::db::postgres::schema::fields;

#[derive(Debug, Clone, PartialEq, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = fields)]
pub struct FieldEntity {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub price_per_hour: f64,
}
