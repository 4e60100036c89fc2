use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::users;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string. Never leaves the use case layer.
    pub password: String,
    pub role: String,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct InsertUserEntity {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Profile changeset. `None` for `password` keeps the stored hash, while
/// `username` and `phone` are always written, clearing them when absent.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users, treat_none_as_null = false)]
pub struct UpdateUserEntity {
    pub name: String,
    pub username: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub password: Option<String>,
}
