use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::infra::db::postgres::schema::bookings;

#[derive(Debug, Clone, PartialEq, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bookings)]
pub struct BookingEntity {
    pub id: i64,
    pub user_id: i64,
    pub field_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_price: f64,
    pub payment_status: String,
    pub status: String,
    pub payment_id: Option<String>,
    pub payment_url: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = bookings)]
pub struct InsertBookingEntity {
    pub user_id: i64,
    pub field_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_price: f64,
    pub payment_status: String,
    pub status: String,
}

/// Booking joined with its field and owner, as shown in booking lists.
#[derive(Debug, Clone, PartialEq, Serialize, Queryable)]
pub struct BookingViewEntity {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub payment_status: String,
    pub total_price: f64,
    pub field_name: String,
    pub field_type: String,
    pub price_per_hour: f64,
    pub user_name: String,
    pub user_email: String,
}
