use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use crates::{
    domain::{
        repositories::bookings::BookingRepository,
        value_objects::bookings::UpdateBookingStatusModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::bookings::BookingPostgres,
    },
};

use crate::{auth::AdminUser, usecases::admin_bookings::AdminBookingUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let booking_repository = BookingPostgres::new(Arc::clone(&db_pool));
    let admin_booking_usecase = AdminBookingUseCase::new(Arc::new(booking_repository));

    router(Arc::new(admin_booking_usecase))
}

pub fn router<B>(admin_booking_usecase: Arc<AdminBookingUseCase<B>>) -> Router
where
    B: BookingRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/bookings", get(list_all_bookings::<B>))
        .route("/bookings/:id", patch(update_booking_status::<B>))
        .with_state(admin_booking_usecase)
}

pub async fn list_all_bookings<B>(
    State(admin_booking_usecase): State<Arc<AdminBookingUseCase<B>>>,
    AdminUser(_admin): AdminUser,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
{
    match admin_booking_usecase.list_all().await {
        Ok(bookings) => (StatusCode::OK, Json(bookings)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_booking_status<B>(
    State(admin_booking_usecase): State<Arc<AdminBookingUseCase<B>>>,
    AdminUser(admin): AdminUser,
    Path(booking_id): Path<i64>,
    Json(update_model): Json<UpdateBookingStatusModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
{
    match admin_booking_usecase
        .update_status(admin.id, booking_id, update_model.status)
        .await
    {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Extension, body::Body, http::Request};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use crates::domain::{
        entities::{bookings::BookingEntity, users::UserEntity},
        repositories::bookings::MockBookingRepository,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::auth::TokenKeys;

    const SECRET: &str = "supersecretjwtsecretforunittesting123";

    fn keys() -> Arc<TokenKeys> {
        Arc::new(TokenKeys::new(SECRET, 3600))
    }

    fn token_for(role: &str) -> String {
        keys()
            .issue(&UserEntity {
                id: 1,
                name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
                password: String::new(),
                role: role.to_string(),
                username: None,
                phone: None,
                created_at: Utc::now(),
            })
            .unwrap()
    }

    fn app(booking_repo: MockBookingRepository) -> Router {
        router(Arc::new(AdminBookingUseCase::new(Arc::new(booking_repo)))).layer(Extension(keys()))
    }

    fn unpaid_booking() -> BookingEntity {
        BookingEntity {
            id: 5,
            user_id: 9,
            field_id: 3,
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            total_price: 200_000.0,
            payment_status: "unpaid".to_string(),
            status: "pending".to_string(),
            payment_id: None,
            payment_url: None,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    fn patch_status(token: &str, status: &str) -> Request<Body> {
        Request::builder()
            .method("PATCH")
            .uri("/bookings/5")
            .header("content-type", "application/json")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(json!({ "status": status }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn user_token_is_forbidden() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_list_views().never();

        let response = app(booking_repo)
            .oneshot(
                Request::builder()
                    .uri("/bookings")
                    .header("Authorization", format!("Bearer {}", token_for("user")))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unpaid_booking_cannot_change_status() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(Some(unpaid_booking())) }));
        booking_repo.expect_update_status().never();

        let response = app(booking_repo)
            .oneshot(patch_status(&token_for("admin"), "completed"))
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Booking belum dibayar! User harus membayar terlebih dahulu."
        );
    }

    #[tokio::test]
    async fn paid_booking_status_is_updated() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_find_by_id().returning(|_| {
            let mut paid = unpaid_booking();
            paid.payment_status = "paid".to_string();
            Box::pin(async move { Ok(Some(paid)) })
        });
        booking_repo
            .expect_update_status()
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let response = app(booking_repo)
            .oneshot(patch_status(&token_for("admin"), "completed"))
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body, json!({"message": "Booking completed"}));
    }
}
