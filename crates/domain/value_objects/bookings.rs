use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::entities::bookings::BookingEntity;

/// Booking request. Times are wall-clock strings (`HH:MM` or `HH:MM:SS`)
/// and are parsed by the booking use case.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingModel {
    pub user_id: i64,
    pub field_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBookingResponse {
    pub message: String,
    pub booking: BookingEntity,
    pub total_price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListBookingsQuery {
    pub user_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingStatusModel {
    pub status: String,
}
