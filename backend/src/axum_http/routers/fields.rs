use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use crates::{
    domain::repositories::fields::FieldRepository,
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::fields::FieldPostgres,
    },
};

use crate::{axum_http::error_responses::AppError, usecases::fields::FieldUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let field_repository = FieldPostgres::new(Arc::clone(&db_pool));
    let field_usecase = FieldUseCase::new(Arc::new(field_repository));

    router(Arc::new(field_usecase))
}

pub fn router<F>(field_usecase: Arc<FieldUseCase<F>>) -> Router
where
    F: FieldRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/fields", get(list_fields::<F>))
        .with_state(field_usecase)
}

pub async fn list_fields<F>(State(field_usecase): State<Arc<FieldUseCase<F>>>) -> impl IntoResponse
where
    F: FieldRepository + Send + Sync + 'static,
{
    match field_usecase.list_fields().await {
        Ok(fields) => (StatusCode::OK, Json(fields)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use crates::domain::{entities::fields::FieldEntity, repositories::fields::MockFieldRepository};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_fields(field_repo: MockFieldRepository) -> (StatusCode, Value) {
        let response = router(Arc::new(FieldUseCase::new(Arc::new(field_repo))))
            .oneshot(Request::builder().uri("/fields").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn fields_serialize_type_column() {
        let mut field_repo = MockFieldRepository::new();
        field_repo.expect_list_fields().returning(|| {
            Box::pin(async {
                Ok(vec![FieldEntity {
                    id: 1,
                    name: "Lapangan A".to_string(),
                    type_: "futsal".to_string(),
                    price_per_hour: 100_000.0,
                }])
            })
        });

        let (status, body) = get_fields(field_repo).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["type"], "futsal");
        assert_eq!(body[0]["price_per_hour"], 100_000.0);
    }

    #[tokio::test]
    async fn storage_error_hides_details() {
        let mut field_repo = MockFieldRepository::new();
        field_repo
            .expect_list_fields()
            .returning(|| Box::pin(async { Err(anyhow::anyhow!("password authentication failed")) }));

        let (status, body) = get_fields(field_repo).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
