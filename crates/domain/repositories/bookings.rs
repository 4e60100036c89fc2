use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::entities::{
    bookings::{BookingEntity, BookingViewEntity, InsertBookingEntity},
    fields::FieldEntity,
};

#[derive(Debug, Clone, PartialEq)]
pub enum CreateBookingOutcome {
    Created(BookingEntity),
    /// Another non-cancelled booking already covers part of the slot.
    SlotTaken,
}

#[async_trait]
#[automock]
pub trait BookingRepository {
    /// Checks the slot for overlaps and inserts inside one transaction.
    async fn create_if_slot_free(&self, booking: InsertBookingEntity)
    -> Result<CreateBookingOutcome>;

    async fn find_by_id(&self, booking_id: i64) -> Result<Option<BookingEntity>>;

    async fn find_with_field(&self, booking_id: i64)
    -> Result<Option<(BookingEntity, FieldEntity)>>;

    async fn attach_payment_link(
        &self,
        booking_id: i64,
        payment_id: String,
        payment_url: String,
    ) -> Result<()>;

    /// Marks every not-yet-paid booking carrying `payment_id` as paid and
    /// confirmed. Returns the number of rows changed.
    async fn mark_paid_by_payment_id(
        &self,
        payment_id: String,
        paid_at: DateTime<Utc>,
    ) -> Result<usize>;

    /// Marks every not-yet-paid booking carrying `payment_id` as expired.
    async fn mark_expired_by_payment_id(&self, payment_id: String) -> Result<usize>;

    async fn update_status(&self, booking_id: i64, status: String) -> Result<()>;

    /// Lists booking views ordered by date descending then start time
    /// ascending, optionally restricted to one user.
    async fn list_views(&self, user_id: Option<i64>) -> Result<Vec<BookingViewEntity>>;
}
