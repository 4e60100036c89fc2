use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crates::domain::{
    entities::bookings::BookingViewEntity,
    repositories::bookings::BookingRepository,
    value_objects::{
        enums::{booking_statuses::BookingStatus, payment_statuses::PaymentStatus},
        users::MessageResponse,
    },
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::axum_http::error_responses::error_response;

#[derive(Debug, Error)]
pub enum AdminBookingError {
    #[error("Booking not found")]
    BookingNotFound,
    #[error("Booking belum dibayar! User harus membayar terlebih dahulu.")]
    PaymentRequired,
    #[error("status is required")]
    EmptyStatus,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdminBookingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminBookingError::BookingNotFound => StatusCode::NOT_FOUND,
            AdminBookingError::PaymentRequired | AdminBookingError::EmptyStatus => {
                StatusCode::BAD_REQUEST
            }
            AdminBookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdminBookingError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string(), None)
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AdminBookingError>;

pub struct AdminBookingUseCase<B>
where
    B: BookingRepository + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
}

impl<B> AdminBookingUseCase<B>
where
    B: BookingRepository + Send + Sync + 'static,
{
    pub fn new(booking_repo: Arc<B>) -> Self {
        Self { booking_repo }
    }

    pub async fn list_all(&self) -> UseCaseResult<Vec<BookingViewEntity>> {
        self.booking_repo.list_views(None).await.map_err(|err| {
            error!(db_error = ?err, "admin_bookings: failed to list bookings");
            AdminBookingError::Internal(err)
        })
    }

    /// Overwrites the booking status once the booking has been paid.
    pub async fn update_status(
        &self,
        admin_id: i64,
        booking_id: i64,
        status: String,
    ) -> UseCaseResult<MessageResponse> {
        let status = status.trim().to_string();
        if status.is_empty() {
            return Err(AdminBookingError::EmptyStatus);
        }

        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await
            .map_err(|err| {
                error!(booking_id, db_error = ?err, "admin_bookings: failed to load booking");
                AdminBookingError::Internal(err)
            })?
            .ok_or(AdminBookingError::BookingNotFound)?;

        if PaymentStatus::from_str(&booking.payment_status) != Some(PaymentStatus::Paid) {
            info!(
                admin_id,
                booking_id,
                payment_status = %booking.payment_status,
                "admin_bookings: status change rejected, booking unpaid"
            );
            return Err(AdminBookingError::PaymentRequired);
        }

        if BookingStatus::from_str(&status).is_none() {
            warn!(admin_id, booking_id, %status, "admin_bookings: storing unrecognised status");
        }

        self.booking_repo
            .update_status(booking_id, status.clone())
            .await
            .map_err(|err| {
                error!(booking_id, db_error = ?err, "admin_bookings: failed to update status");
                AdminBookingError::Internal(err)
            })?;

        info!(
            admin_id,
            booking_id,
            from = %booking.status,
            to = %status,
            "admin_bookings: status updated"
        );

        Ok(MessageResponse::new(format!("Booking {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use crates::domain::{
        entities::bookings::BookingEntity, repositories::bookings::MockBookingRepository,
    };
    use mockall::predicate::eq;

    fn booking(payment_status: &str) -> BookingEntity {
        BookingEntity {
            id: 5,
            user_id: 9,
            field_id: 3,
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            total_price: 200_000.0,
            payment_status: payment_status.to_string(),
            status: "confirmed".to_string(),
            payment_id: Some("pl_123".to_string()),
            payment_url: None,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    fn repo_returning(payment_status: &'static str) -> MockBookingRepository {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_find_by_id()
            .with(eq(5))
            .returning(move |_| Box::pin(async move { Ok(Some(booking(payment_status))) }));
        booking_repo
    }

    #[tokio::test]
    async fn paid_booking_status_is_overwritten() {
        let mut booking_repo = repo_returning("paid");
        booking_repo
            .expect_update_status()
            .with(eq(5), eq("completed".to_string()))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let usecase = AdminBookingUseCase::new(Arc::new(booking_repo));
        let response = usecase
            .update_status(1, 5, "completed".to_string())
            .await
            .unwrap();

        assert_eq!(response.message, "Booking completed");
    }

    #[tokio::test]
    async fn unpaid_booking_is_rejected() {
        for payment_status in ["unpaid", "pending", "expired"] {
            let mut booking_repo = repo_returning(payment_status);
            booking_repo.expect_update_status().never();

            let usecase = AdminBookingUseCase::new(Arc::new(booking_repo));
            let err = usecase
                .update_status(1, 5, "completed".to_string())
                .await
                .unwrap_err();

            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(
                err.to_string(),
                "Booking belum dibayar! User harus membayar terlebih dahulu."
            );
        }
    }

    #[tokio::test]
    async fn unknown_status_is_still_stored() {
        let mut booking_repo = repo_returning("paid");
        booking_repo
            .expect_update_status()
            .with(eq(5), eq("no_show".to_string()))
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let usecase = AdminBookingUseCase::new(Arc::new(booking_repo));
        let response = usecase
            .update_status(1, 5, "no_show".to_string())
            .await
            .unwrap();

        assert_eq!(response.message, "Booking no_show");
    }

    #[tokio::test]
    async fn blank_status_and_missing_booking_are_rejected() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = AdminBookingUseCase::new(Arc::new(booking_repo));

        let blank = usecase.update_status(1, 5, "  ".to_string()).await.unwrap_err();
        assert!(matches!(blank, AdminBookingError::EmptyStatus));

        let missing = usecase
            .update_status(1, 5, "completed".to_string())
            .await
            .unwrap_err();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_all_is_unfiltered() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_list_views()
            .with(eq(None))
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let usecase = AdminBookingUseCase::new(Arc::new(booking_repo));

        assert!(usecase.list_all().await.unwrap().is_empty());
    }
}
