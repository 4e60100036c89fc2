use serde::{Deserialize, Serialize};

use crate::domain::{entities::users::UserEntity, value_objects::enums::user_roles::UserRole};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserModel {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileModel {
    /// Absent keeps the stored name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(default, rename = "newPassword")]
    pub new_password: Option<String>,
}

/// User record as returned to clients, without the password hash.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserProfileDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub username: Option<String>,
    pub phone: Option<String>,
}

impl From<UserEntity> for UserProfileDto {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: UserRole::from_str(&value.role),
            username: value.username,
            phone: value.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user: UserProfileDto,
}
