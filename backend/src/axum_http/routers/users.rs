use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use crates::{
    domain::{
        repositories::users::UserRepository,
        value_objects::{
            enums::user_roles::UserRole,
            users::{
                LoginModel, MessageResponse, ProfileUpdatedResponse, RegisterUserModel,
                UpdateProfileModel,
            },
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::users::UserPostgres,
    },
};

use crate::{auth::TokenKeys, usecases::users::UserUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>, token_keys: Arc<TokenKeys>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let user_usecase = UserUseCase::new(Arc::new(user_repository), token_keys);

    router(Arc::new(user_usecase))
}

pub fn router<U>(user_usecase: Arc<UserUseCase<U>>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(register::<U>))
        .route("/register-admin", post(register_admin::<U>))
        .route("/login", post(login::<U>))
        .route("/user/:id", put(update_profile::<U>))
        .with_state(user_usecase)
}

pub async fn register<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Json(register_user_model): Json<RegisterUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match user_usecase
        .register(register_user_model, UserRole::User)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse::new("User registered successfully!")),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn register_admin<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Json(register_user_model): Json<RegisterUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match user_usecase
        .register(register_user_model, UserRole::Admin)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse::new("Admin registered successfully!")),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn login<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Json(login_model): Json<LoginModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match user_usecase.login(login_model).await {
        Ok(login_response) => (StatusCode::OK, Json(login_response)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_profile<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    Path(user_id): Path<i64>,
    Json(update_profile_model): Json<UpdateProfileModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match user_usecase
        .update_profile(user_id, update_profile_model)
        .await
    {
        Ok(user) => (
            StatusCode::OK,
            Json(ProfileUpdatedResponse {
                message: "Profile updated successfully".to_string(),
                user,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
