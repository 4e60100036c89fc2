pub mod password;

use std::sync::Arc;

use axum::{
    Json, RequestPartsExt, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::Utc;
use crates::domain::{entities::users::UserEntity, value_objects::enums::user_roles::UserRole};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::axum_http::error_responses::ErrorResponse;

/// Payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Login dulu!")]
    MissingToken,
    #[error("Token invalid")]
    InvalidToken,
    #[error("Hanya admin!")]
    Forbidden,
    #[error("token keys are not configured")]
    MissingKeys,
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::MissingKeys | AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AuthError::MissingKeys | AuthError::Signing(_) => {
                error!(error = %self, "auth: server side token failure");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse::new(status, message))).into_response()
    }
}

/// HS256 keys plus token lifetime, shared through a request extension.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: u64,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    pub fn issue(&self, user: &UserEntity) -> Result<String, AuthError> {
        let now = Utc::now().timestamp().max(0) as usize;
        let claims = SessionClaims {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: UserRole::from_str(&user.role),
            iat: now,
            exp: now + self.ttl_seconds as usize,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "auth: token rejected");
                AuthError::InvalidToken
            })
    }
}

/// Identity decoded from a valid bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.id,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// An [`AuthUser`] whose role is admin.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let keys = parts
            .extensions
            .get::<Arc<TokenKeys>>()
            .cloned()
            .ok_or(AuthError::MissingKeys)?;

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| {
                if rejection.is_missing() {
                    AuthError::MissingToken
                } else {
                    AuthError::InvalidToken
                }
            })?;

        let claims = keys.verify(bearer.token())?;

        Ok(AuthUser::from(claims))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Admin {
            debug!(user_id = user.id, "auth: non-admin rejected from admin route");
            return Err(AuthError::Forbidden);
        }

        Ok(AdminUser(user))
    }
}
