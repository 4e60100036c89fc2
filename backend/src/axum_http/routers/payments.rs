use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::bookings::BookingRepository,
        value_objects::payments::{CreatePaymentModel, PaymentCallbackModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::bookings::BookingPostgres,
    },
    payments::mayar_client::MayarClient,
};
use tracing::warn;

use crate::usecases::payments::{PaymentGateway, PaymentUrls, PaymentUseCase};

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    mayar_client: Arc<MayarClient>,
    urls: PaymentUrls,
) -> Router {
    let booking_repository = BookingPostgres::new(Arc::clone(&db_pool));
    let payment_usecase = PaymentUseCase::new(Arc::new(booking_repository), mayar_client, urls);

    router(Arc::new(payment_usecase))
}

pub fn router<B, G>(payment_usecase: Arc<PaymentUseCase<B, G>>) -> Router
where
    B: BookingRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    // The processor does not sign callbacks, so anyone reaching this route
    // can mark a booking as paid.
    warn!("payments: /payment/callback accepts unauthenticated requests");

    Router::new()
        .route("/create", post(create_payment::<B, G>))
        .route("/callback", post(payment_callback::<B, G>))
        .route("/status/:booking_id", get(payment_status::<B, G>))
        .with_state(payment_usecase)
}

pub async fn create_payment<B, G>(
    State(payment_usecase): State<Arc<PaymentUseCase<B, G>>>,
    Json(create_payment_model): Json<CreatePaymentModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match payment_usecase
        .create_payment_link(create_payment_model)
        .await
    {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn payment_callback<B, G>(
    State(payment_usecase): State<Arc<PaymentUseCase<B, G>>>,
    Json(payment_callback_model): Json<PaymentCallbackModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match payment_usecase.handle_callback(payment_callback_model).await {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn payment_status<B, G>(
    State(payment_usecase): State<Arc<PaymentUseCase<B, G>>>,
    Path(booking_id): Path<i64>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match payment_usecase.get_status(booking_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => e.into_response(),
    }
}
