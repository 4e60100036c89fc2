use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveTime;
use crates::domain::{
    entities::bookings::{BookingViewEntity, InsertBookingEntity},
    repositories::{
        bookings::{BookingRepository, CreateBookingOutcome},
        fields::FieldRepository,
    },
    value_objects::{
        bookings::{CreateBookingModel, CreateBookingResponse},
        enums::{booking_statuses::BookingStatus, payment_statuses::PaymentStatus},
    },
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::axum_http::error_responses::error_response;

pub const BOOKING_CREATED_MESSAGE: &str = "Booking berhasil dibuat!";

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("Field not found")]
    FieldNotFound,
    #[error("Slot sudah dibooking")]
    SlotTaken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BookingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::FieldNotFound => StatusCode::NOT_FOUND,
            BookingError::SlotTaken => StatusCode::CONFLICT,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string(), None)
    }
}

pub type UseCaseResult<T> = std::result::Result<T, BookingError>;

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_wall_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Hours between two times on the same day. Negative when `end` precedes `start`.
pub fn duration_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

pub struct BookingUseCase<B, F>
where
    B: BookingRepository + Send + Sync + 'static,
    F: FieldRepository + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
    field_repo: Arc<F>,
}

impl<B, F> BookingUseCase<B, F>
where
    B: BookingRepository + Send + Sync + 'static,
    F: FieldRepository + Send + Sync + 'static,
{
    pub fn new(booking_repo: Arc<B>, field_repo: Arc<F>) -> Self {
        Self {
            booking_repo,
            field_repo,
        }
    }

    pub async fn create_booking(
        &self,
        model: CreateBookingModel,
    ) -> UseCaseResult<CreateBookingResponse> {
        let start_time = parse_wall_clock(&model.start_time).ok_or_else(|| {
            BookingError::Validation("start_time must be HH:MM or HH:MM:SS".to_string())
        })?;
        let end_time = parse_wall_clock(&model.end_time).ok_or_else(|| {
            BookingError::Validation("end_time must be HH:MM or HH:MM:SS".to_string())
        })?;

        let hours = duration_hours(start_time, end_time);
        if hours <= 0.0 {
            warn!(
                user_id = model.user_id,
                field_id = model.field_id,
                %start_time,
                %end_time,
                "bookings: rejected non-positive duration"
            );
            return Err(BookingError::Validation(
                "end_time must be after start_time".to_string(),
            ));
        }

        let field = self
            .field_repo
            .find_by_id(model.field_id)
            .await
            .map_err(|err| {
                error!(field_id = model.field_id, db_error = ?err, "bookings: failed to load field");
                BookingError::Internal(err)
            })?
            .ok_or(BookingError::FieldNotFound)?;

        let total_price = hours * field.price_per_hour;

        let outcome = self
            .booking_repo
            .create_if_slot_free(InsertBookingEntity {
                user_id: model.user_id,
                field_id: field.id,
                date: model.date,
                start_time,
                end_time,
                total_price,
                payment_status: PaymentStatus::Unpaid.to_string(),
                status: BookingStatus::Pending.to_string(),
            })
            .await
            .map_err(|err| {
                error!(
                    user_id = model.user_id,
                    field_id = field.id,
                    db_error = ?err,
                    "bookings: failed to insert booking"
                );
                BookingError::Internal(err)
            })?;

        match outcome {
            CreateBookingOutcome::Created(booking) => {
                info!(
                    booking_id = booking.id,
                    user_id = booking.user_id,
                    field_id = booking.field_id,
                    total_price,
                    "bookings: created"
                );

                Ok(CreateBookingResponse {
                    message: BOOKING_CREATED_MESSAGE.to_string(),
                    booking,
                    total_price,
                })
            }
            CreateBookingOutcome::SlotTaken => {
                info!(
                    field_id = field.id,
                    date = %model.date,
                    %start_time,
                    %end_time,
                    "bookings: slot already taken"
                );
                Err(BookingError::SlotTaken)
            }
        }
    }

    pub async fn list_user_bookings(&self, user_id: i64) -> UseCaseResult<Vec<BookingViewEntity>> {
        self.booking_repo
            .list_views(Some(user_id))
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "bookings: failed to list user bookings");
                BookingError::Internal(err)
            })
    }
}
