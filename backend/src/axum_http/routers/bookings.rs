use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{bookings::BookingRepository, fields::FieldRepository},
        value_objects::bookings::{CreateBookingModel, ListBookingsQuery},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{bookings::BookingPostgres, fields::FieldPostgres},
    },
};

use crate::usecases::bookings::BookingUseCase;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let booking_repository = BookingPostgres::new(Arc::clone(&db_pool));
    let field_repository = FieldPostgres::new(Arc::clone(&db_pool));
    let booking_usecase =
        BookingUseCase::new(Arc::new(booking_repository), Arc::new(field_repository));

    router(Arc::new(booking_usecase))
}

pub fn router<B, F>(booking_usecase: Arc<BookingUseCase<B, F>>) -> Router
where
    B: BookingRepository + Send + Sync + 'static,
    F: FieldRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/book", post(create_booking::<B, F>))
        .route("/bookings", get(list_user_bookings::<B, F>))
        .with_state(booking_usecase)
}

pub async fn create_booking<B, F>(
    State(booking_usecase): State<Arc<BookingUseCase<B, F>>>,
    Json(create_booking_model): Json<CreateBookingModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    F: FieldRepository + Send + Sync + 'static,
{
    match booking_usecase.create_booking(create_booking_model).await {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_user_bookings<B, F>(
    State(booking_usecase): State<Arc<BookingUseCase<B, F>>>,
    Query(query): Query<ListBookingsQuery>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    F: FieldRepository + Send + Sync + 'static,
{
    match booking_usecase.list_user_bookings(query.user_id).await {
        Ok(bookings) => (StatusCode::OK, Json(bookings)).into_response(),
        Err(e) => e.into_response(),
    }
}
