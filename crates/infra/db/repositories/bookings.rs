use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{
    RunQueryDsl, insert_into,
    pg::Pg,
    prelude::*,
    query_builder::QueryFragment,
    query_dsl::methods::ExecuteDsl,
    sql_types::BigInt,
    update,
};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{bookings, fields, users},
    },
};
use domain::{
    entities::{
        bookings::{BookingEntity, BookingViewEntity, InsertBookingEntity},
        fields::FieldEntity,
    },
    repositories::bookings::{BookingRepository, CreateBookingOutcome},
    value_objects::enums::{booking_statuses::BookingStatus, payment_statuses::PaymentStatus},
};

/// Non-cancelled, non-expired booking on the same field and day whose
/// `[start, end)` interval intersects the new one.
fn overlapping_booking_query(
    booking: &InsertBookingEntity,
) -> bookings::BoxedQuery<'static, Pg, BigInt> {
    bookings::table
        .select(bookings::id)
        .filter(bookings::field_id.eq(booking.field_id))
        .filter(bookings::date.eq(booking.date))
        .filter(bookings::status.ne(BookingStatus::Cancelled.to_string()))
        .filter(bookings::payment_status.ne(PaymentStatus::Expired.to_string()))
        .filter(bookings::start_time.lt(booking.end_time))
        .filter(bookings::end_time.gt(booking.start_time))
        .into_boxed()
}

// Paid rows are never reopened; the three statements below share that guard.

fn attach_payment_link_statement(
    booking_id: i64,
    payment_id: String,
    payment_url: String,
) -> impl QueryFragment<Pg> + ExecuteDsl<PgConnection> + RunQueryDsl<PgConnection> {
    update(bookings::table)
        .filter(bookings::id.eq(booking_id))
        .filter(bookings::payment_status.ne(PaymentStatus::Paid.to_string()))
        .set((
            bookings::payment_id.eq(Some(payment_id)),
            bookings::payment_url.eq(Some(payment_url)),
            bookings::payment_status.eq(PaymentStatus::Pending.to_string()),
        ))
}

fn mark_paid_statement(
    payment_id: String,
    paid_at: DateTime<Utc>,
) -> impl QueryFragment<Pg> + ExecuteDsl<PgConnection> + RunQueryDsl<PgConnection> {
    update(bookings::table)
        .filter(bookings::payment_id.eq(payment_id))
        .filter(bookings::payment_status.ne(PaymentStatus::Paid.to_string()))
        .set((
            bookings::payment_status.eq(PaymentStatus::Paid.to_string()),
            bookings::paid_at.eq(Some(paid_at)),
            bookings::status.eq(BookingStatus::Confirmed.to_string()),
        ))
}

fn mark_expired_statement(
    payment_id: String,
) -> impl QueryFragment<Pg> + ExecuteDsl<PgConnection> + RunQueryDsl<PgConnection> {
    update(bookings::table)
        .filter(bookings::payment_id.eq(payment_id))
        .filter(bookings::payment_status.ne(PaymentStatus::Paid.to_string()))
        .set(bookings::payment_status.eq(PaymentStatus::Expired.to_string()))
}

pub struct BookingPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BookingPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BookingRepository for BookingPostgres {
    async fn create_if_slot_free(
        &self,
        booking: InsertBookingEntity,
    ) -> Result<CreateBookingOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<_, anyhow::Error, _>(|conn| {
            // Serialises bookings per field until commit.
            diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
                .bind::<BigInt, _>(booking.field_id)
                .execute(conn)?;

            let overlapping = overlapping_booking_query(&booking)
                .first::<i64>(conn)
                .optional()?;

            if overlapping.is_some() {
                return Ok(CreateBookingOutcome::SlotTaken);
            }

            let created = insert_into(bookings::table)
                .values(&booking)
                .returning(BookingEntity::as_returning())
                .get_result::<BookingEntity>(conn)?;

            Ok(CreateBookingOutcome::Created(created))
        })
    }

    async fn find_by_id(&self, booking_id: i64) -> Result<Option<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let booking = bookings::table
            .filter(bookings::id.eq(booking_id))
            .select(BookingEntity::as_select())
            .first::<BookingEntity>(&mut conn)
            .optional()?;

        Ok(booking)
    }

    async fn find_with_field(
        &self,
        booking_id: i64,
    ) -> Result<Option<(BookingEntity, FieldEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = bookings::table
            .inner_join(fields::table)
            .filter(bookings::id.eq(booking_id))
            .select((BookingEntity::as_select(), FieldEntity::as_select()))
            .first::<(BookingEntity, FieldEntity)>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn attach_payment_link(
        &self,
        booking_id: i64,
        payment_id: String,
        payment_url: String,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        attach_payment_link_statement(booking_id, payment_id, payment_url).execute(&mut *conn)?;

        Ok(())
    }

    async fn mark_paid_by_payment_id(
        &self,
        payment_id: String,
        paid_at: DateTime<Utc>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = mark_paid_statement(payment_id, paid_at).execute(&mut *conn)?;

        Ok(updated)
    }

    async fn mark_expired_by_payment_id(&self, payment_id: String) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = mark_expired_statement(payment_id).execute(&mut *conn)?;

        Ok(updated)
    }

    async fn update_status(&self, booking_id: i64, status: String) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(bookings::table)
            .filter(bookings::id.eq(booking_id))
            .set(bookings::status.eq(status))
            .execute(&mut *conn)?;

        Ok(())
    }

    async fn list_views(&self, user_id: Option<i64>) -> Result<Vec<BookingViewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = bookings::table
            .inner_join(fields::table)
            .inner_join(users::table)
            .select((
                bookings::id,
                bookings::date,
                bookings::start_time,
                bookings::end_time,
                bookings::status,
                bookings::payment_status,
                bookings::total_price,
                fields::name,
                fields::type_,
                fields::price_per_hour,
                users::name,
                users::email,
            ))
            .order((bookings::date.desc(), bookings::start_time.asc()))
            .into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(bookings::user_id.eq(user_id));
        }

        let rows = query.load::<BookingViewEntity>(&mut conn)?;

        Ok(rows)
    }
}
