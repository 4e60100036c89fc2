use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crates::domain::{
    entities::users::{InsertUserEntity, UpdateUserEntity},
    repositories::users::{InsertUserOutcome, UserRepository},
    value_objects::{
        enums::user_roles::UserRole,
        users::{LoginModel, LoginResponse, RegisterUserModel, UpdateProfileModel, UserProfileDto},
    },
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    auth::{
        AuthError, TokenKeys,
        password::{burn_verification, hash_password, verify_password},
    },
    axum_http::error_responses::error_response,
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),
    #[error("Email sudah terdaftar")]
    DuplicateEmail,
    #[error("Email atau password salah")]
    InvalidCredentials,
    #[error("Current password required")]
    CurrentPasswordRequired,
    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    Token(#[from] AuthError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::Validation(_) | UserError::CurrentPasswordRequired => {
                StatusCode::BAD_REQUEST
            }
            UserError::DuplicateEmail => StatusCode::CONFLICT,
            UserError::InvalidCredentials | UserError::CurrentPasswordIncorrect => {
                StatusCode::UNAUTHORIZED
            }
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::Token(err) => err.status_code(),
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string(), None)
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UserError>;

pub struct UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    token_keys: Arc<TokenKeys>,
}

impl<U> UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, token_keys: Arc<TokenKeys>) -> Self {
        Self {
            user_repo,
            token_keys,
        }
    }

    pub async fn register(&self, model: RegisterUserModel, role: UserRole) -> UseCaseResult<i64> {
        let name = model.name.trim().to_string();
        let email = model.email.trim().to_string();

        if name.is_empty() {
            return Err(UserError::Validation("name is required".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(UserError::Validation("a valid email is required".to_string()));
        }
        if model.password.is_empty() {
            return Err(UserError::Validation("password is required".to_string()));
        }

        let password = hash_password(model.password).await?;

        let outcome = self
            .user_repo
            .insert(InsertUserEntity {
                name,
                email,
                password,
                role: role.to_string(),
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, %role, "users: failed to insert user");
                UserError::Internal(err)
            })?;

        match outcome {
            InsertUserOutcome::Inserted(user_id) => {
                info!(user_id, %role, "users: registered");
                Ok(user_id)
            }
            InsertUserOutcome::DuplicateEmail => {
                warn!(%role, "users: registration rejected, email already used");
                Err(UserError::DuplicateEmail)
            }
        }
    }

    pub async fn login(&self, model: LoginModel) -> UseCaseResult<LoginResponse> {
        let user = self
            .user_repo
            .find_by_email(model.email.trim().to_string())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to look up user for login");
                UserError::Internal(err)
            })?;

        let Some(user) = user else {
            burn_verification(model.password).await;
            info!("users: login rejected");
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(model.password, user.password.clone()).await? {
            info!(user_id = user.id, "users: login rejected");
            return Err(UserError::InvalidCredentials);
        }

        let token = self.token_keys.issue(&user)?;
        info!(user_id = user.id, "users: login succeeded");

        Ok(LoginResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: UserRole::from_str(&user.role),
            token,
        })
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        model: UpdateProfileModel,
    ) -> UseCaseResult<UserProfileDto> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "users: failed to load user for profile update");
                UserError::Internal(err)
            })?
            .ok_or(UserError::UserNotFound)?;

        let name = match model.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(UserError::Validation("name must not be blank".to_string()));
                }
                name
            }
            None => user.name.clone(),
        };

        let password = match model.new_password.filter(|p| !p.is_empty()) {
            Some(new_password) => {
                let current = model
                    .current_password
                    .filter(|p| !p.is_empty())
                    .ok_or(UserError::CurrentPasswordRequired)?;

                if !verify_password(current, user.password.clone()).await? {
                    warn!(user_id, "users: profile update rejected, wrong current password");
                    return Err(UserError::CurrentPasswordIncorrect);
                }

                Some(hash_password(new_password).await?)
            }
            None => None,
        };

        let password_changed = password.is_some();
        let updated = self
            .user_repo
            .update_profile(
                user_id,
                UpdateUserEntity {
                    name,
                    username: Some(model.username),
                    phone: Some(model.phone),
                    password,
                },
            )
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "users: failed to update profile");
                UserError::Internal(err)
            })?;

        info!(user_id, password_changed, "users: profile updated");
        Ok(UserProfileDto::from(updated))
    }
}
