use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use crates::{
    domain::{
        repositories::bookings::BookingRepository,
        value_objects::{
            enums::payment_statuses::PaymentStatus,
            payments::{
                CreatePaymentModel, CreatePaymentResponse, PaymentCallbackModel,
                PaymentCallbackResponse, PaymentStatusDto,
            },
        },
    },
    payments::mayar_client::{
        MayarClient, MayarCustomer, MayarError, MayarPaymentLink, MayarPaymentLinkRequest,
    },
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::axum_http::error_responses::error_response;

/// Outbound side of the payment processor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway {
    async fn create_payment_link(
        &self,
        request: MayarPaymentLinkRequest,
    ) -> Result<MayarPaymentLink, MayarError>;
}

#[async_trait]
impl PaymentGateway for MayarClient {
    async fn create_payment_link(
        &self,
        request: MayarPaymentLinkRequest,
    ) -> Result<MayarPaymentLink, MayarError> {
        MayarClient::create_payment_link(self, &request).await
    }
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Booking not found")]
    BookingNotFound,
    #[error("Booking sudah dibayar")]
    AlreadyPaid,
    #[error("Gagal membuat payment link")]
    Upstream(#[source] MayarError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::BookingNotFound => StatusCode::NOT_FOUND,
            PaymentError::AlreadyPaid => StatusCode::CONFLICT,
            PaymentError::Upstream(_) | PaymentError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let details = match &self {
            PaymentError::Upstream(err) => Some(err.details()),
            _ => None,
        };

        error_response(self.status_code(), self.to_string(), details)
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentError>;

/// Public base URLs embedded into payment links.
#[derive(Debug, Clone)]
pub struct PaymentUrls {
    pub frontend_url: String,
    pub backend_url: String,
}

impl PaymentUrls {
    pub fn new(frontend_url: &str, backend_url: &str) -> Self {
        Self {
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }
    }
}

pub struct PaymentUseCase<B, G>
where
    B: BookingRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
    gateway: Arc<G>,
    urls: PaymentUrls,
}

impl<B, G> PaymentUseCase<B, G>
where
    B: BookingRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(booking_repo: Arc<B>, gateway: Arc<G>, urls: PaymentUrls) -> Self {
        Self {
            booking_repo,
            gateway,
            urls,
        }
    }

    pub async fn create_payment_link(
        &self,
        model: CreatePaymentModel,
    ) -> UseCaseResult<CreatePaymentResponse> {
        let booking_id = model.booking_id;

        let (booking, field) = self
            .booking_repo
            .find_with_field(booking_id)
            .await
            .map_err(|err| {
                error!(booking_id, db_error = ?err, "payments: failed to load booking");
                PaymentError::Internal(err)
            })?
            .ok_or(PaymentError::BookingNotFound)?;

        if PaymentStatus::from_str(&booking.payment_status) == Some(PaymentStatus::Paid) {
            info!(booking_id, "payments: payment link refused, booking already paid");
            return Err(PaymentError::AlreadyPaid);
        }

        let request = MayarPaymentLinkRequest {
            name: format!("Booking {}", field.name),
            description: format!(
                "Booking lapangan {} ({}) pada {} jam {}-{}",
                field.name, field.type_, booking.date, booking.start_time, booking.end_time
            ),
            amount: booking.total_price.round() as i64,
            customer: MayarCustomer {
                name: model.user_name,
                email: model.user_email,
            },
            return_url: format!(
                "{}/payment/success?booking_id={}",
                self.urls.frontend_url, booking_id
            ),
            callback_url: format!("{}/payment/callback", self.urls.backend_url),
            metadata: HashMap::from([("booking_id".to_string(), booking_id.to_string())]),
        };

        let amount = request.amount;
        let link = self
            .gateway
            .create_payment_link(request)
            .await
            .map_err(|err| {
                error!(booking_id, error = %err, "payments: payment link creation failed");
                PaymentError::Upstream(err)
            })?;

        self.booking_repo
            .attach_payment_link(booking_id, link.id.clone(), link.link.clone())
            .await
            .map_err(|err| {
                error!(
                    booking_id,
                    payment_id = %link.id,
                    db_error = ?err,
                    "payments: failed to store payment link"
                );
                PaymentError::Internal(err)
            })?;

        info!(booking_id, payment_id = %link.id, amount, "payments: payment link created");

        Ok(CreatePaymentResponse {
            success: true,
            payment_url: link.link,
            payment_id: link.id,
        })
    }

    /// Applies a processor notification. Unknown statuses are acknowledged
    /// without touching any booking.
    pub async fn handle_callback(
        &self,
        model: PaymentCallbackModel,
    ) -> UseCaseResult<PaymentCallbackResponse> {
        let metadata_booking_id = model
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.booking_id.clone());

        let Some(payment_id) = model.payment_link_id.filter(|id| !id.is_empty()) else {
            warn!(
                status = %model.status,
                booking_id = ?metadata_booking_id,
                "payments: callback without payment_link_id ignored"
            );
            return Ok(PaymentCallbackResponse { success: true });
        };

        match PaymentStatus::from_str(&model.status) {
            Some(PaymentStatus::Paid) => {
                let updated = self
                    .booking_repo
                    .mark_paid_by_payment_id(payment_id.clone(), Utc::now())
                    .await
                    .map_err(|err| {
                        error!(%payment_id, db_error = ?err, "payments: failed to mark paid");
                        PaymentError::Internal(err)
                    })?;

                info!(
                    %payment_id,
                    booking_id = ?metadata_booking_id,
                    updated,
                    "payments: payment successful"
                );
            }
            Some(PaymentStatus::Expired) => {
                let updated = self
                    .booking_repo
                    .mark_expired_by_payment_id(payment_id.clone())
                    .await
                    .map_err(|err| {
                        error!(%payment_id, db_error = ?err, "payments: failed to mark expired");
                        PaymentError::Internal(err)
                    })?;

                info!(
                    %payment_id,
                    booking_id = ?metadata_booking_id,
                    updated,
                    "payments: payment expired"
                );
            }
            _ => {
                debug!(%payment_id, status = %model.status, "payments: callback status ignored");
            }
        }

        Ok(PaymentCallbackResponse { success: true })
    }

    pub async fn get_status(&self, booking_id: i64) -> UseCaseResult<PaymentStatusDto> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await
            .map_err(|err| {
                error!(booking_id, db_error = ?err, "payments: failed to load booking status");
                PaymentError::Internal(err)
            })?
            .ok_or(PaymentError::BookingNotFound)?;

        Ok(PaymentStatusDto {
            payment_status: booking.payment_status,
            payment_url: booking.payment_url,
            total_price: booking.total_price,
            paid_at: booking.paid_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use crates::domain::{
        entities::{bookings::BookingEntity, fields::FieldEntity},
        repositories::bookings::MockBookingRepository,
        value_objects::payments::PaymentCallbackMetadata,
    };
    use mockall::predicate::{always, eq};

    fn urls() -> PaymentUrls {
        PaymentUrls::new("https://booking.example.com/", "https://api.booking.example.com")
    }

    fn booking(total_price: f64) -> BookingEntity {
        BookingEntity {
            id: 5,
            user_id: 9,
            field_id: 3,
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            total_price,
            payment_status: "unpaid".to_string(),
            status: "pending".to_string(),
            payment_id: None,
            payment_url: None,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    fn field() -> FieldEntity {
        FieldEntity {
            id: 3,
            name: "Lapangan A".to_string(),
            type_: "futsal".to_string(),
            price_per_hour: 100_000.0,
        }
    }

    fn create_model() -> CreatePaymentModel {
        CreatePaymentModel {
            booking_id: 5,
            user_email: "budi@example.com".to_string(),
            user_name: "Budi".to_string(),
        }
    }

    fn callback(status: &str, payment_link_id: Option<&str>) -> PaymentCallbackModel {
        PaymentCallbackModel {
            status: status.to_string(),
            payment_link_id: payment_link_id.map(str::to_string),
            metadata: Some(PaymentCallbackMetadata {
                booking_id: Some("5".to_string()),
            }),
        }
    }

    #[tokio::test]
    async fn create_payment_link_sends_rounded_amount_and_stores_link() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_find_with_field()
            .with(eq(5))
            .returning(|_| Box::pin(async { Ok(Some((booking(200_000.4), field()))) }));
        booking_repo
            .expect_attach_payment_link()
            .with(
                eq(5),
                eq("pl_123".to_string()),
                eq("https://mayar.link/pl_123".to_string()),
            )
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_payment_link()
            .withf(|request| {
                request.amount == 200_000
                    && request.name == "Booking Lapangan A"
                    && request.description
                        == "Booking lapangan Lapangan A (futsal) pada 2025-03-14 jam 10:00:00-12:00:00"
                    && request.customer.email == "budi@example.com"
                    && request.return_url
                        == "https://booking.example.com/payment/success?booking_id=5"
                    && request.callback_url == "https://api.booking.example.com/payment/callback"
                    && request.metadata.get("booking_id").map(String::as_str) == Some("5")
            })
            .returning(|_| {
                Ok(MayarPaymentLink {
                    id: "pl_123".to_string(),
                    link: "https://mayar.link/pl_123".to_string(),
                })
            });

        let usecase = PaymentUseCase::new(Arc::new(booking_repo), Arc::new(gateway), urls());
        let response = usecase.create_payment_link(create_model()).await.unwrap();

        assert_eq!(
            response,
            CreatePaymentResponse {
                success: true,
                payment_url: "https://mayar.link/pl_123".to_string(),
                payment_id: "pl_123".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn create_payment_link_for_missing_booking_is_not_found() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_find_with_field()
            .returning(|_| Box::pin(async { Ok(None) }));
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_payment_link().never();

        let usecase = PaymentUseCase::new(Arc::new(booking_repo), Arc::new(gateway), urls());
        let err = usecase.create_payment_link(create_model()).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn paid_booking_does_not_get_a_new_link() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_find_with_field().returning(|_| {
            let mut paid = booking(200_000.0);
            paid.payment_status = "paid".to_string();
            paid.status = "confirmed".to_string();
            paid.payment_id = Some("pl_123".to_string());
            Box::pin(async move { Ok(Some((paid, field()))) })
        });
        booking_repo.expect_attach_payment_link().never();
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_payment_link().never();

        let usecase = PaymentUseCase::new(Arc::new(booking_repo), Arc::new(gateway), urls());
        let err = usecase.create_payment_link(create_model()).await.unwrap_err();

        assert!(matches!(err, PaymentError::AlreadyPaid));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Booking sudah dibayar");
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_processor_message() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_find_with_field()
            .returning(|_| Box::pin(async { Ok(Some((booking(200_000.0), field()))) }));
        booking_repo.expect_attach_payment_link().never();

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_payment_link().returning(|_| {
            Err(MayarError::Api {
                context: "create payment link",
                status: 422,
                message: Some("amount must be at least 1000".to_string()),
            })
        });

        let usecase = PaymentUseCase::new(Arc::new(booking_repo), Arc::new(gateway), urls());
        let err = usecase.create_payment_link(create_model()).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Gagal membuat payment link");
        match err {
            PaymentError::Upstream(inner) => {
                assert_eq!(inner.details(), "amount must be at least 1000")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn paid_callback_marks_booking_paid() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_mark_paid_by_payment_id()
            .with(eq("pl_123".to_string()), always())
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(1) }));
        booking_repo.expect_mark_expired_by_payment_id().never();

        let usecase = PaymentUseCase::new(
            Arc::new(booking_repo),
            Arc::new(MockPaymentGateway::new()),
            urls(),
        );
        let response = usecase
            .handle_callback(callback("paid", Some("pl_123")))
            .await
            .unwrap();

        assert!(response.success);
    }

    #[tokio::test]
    async fn replayed_paid_callback_still_succeeds() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_mark_paid_by_payment_id()
            .returning(|_, _| Box::pin(async { Ok(0) }));

        let usecase = PaymentUseCase::new(
            Arc::new(booking_repo),
            Arc::new(MockPaymentGateway::new()),
            urls(),
        );

        assert!(
            usecase
                .handle_callback(callback("paid", Some("pl_123")))
                .await
                .unwrap()
                .success
        );
    }

    #[tokio::test]
    async fn expired_callback_marks_booking_expired() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_mark_expired_by_payment_id()
            .with(eq("pl_123".to_string()))
            .times(1)
            .returning(|_| Box::pin(async { Ok(1) }));
        booking_repo.expect_mark_paid_by_payment_id().never();

        let usecase = PaymentUseCase::new(
            Arc::new(booking_repo),
            Arc::new(MockPaymentGateway::new()),
            urls(),
        );

        usecase
            .handle_callback(callback("expired", Some("pl_123")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_status_and_missing_id_touch_nothing() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_mark_paid_by_payment_id().never();
        booking_repo.expect_mark_expired_by_payment_id().never();

        let usecase = PaymentUseCase::new(
            Arc::new(booking_repo),
            Arc::new(MockPaymentGateway::new()),
            urls(),
        );

        assert!(
            usecase
                .handle_callback(callback("refunded", Some("pl_123")))
                .await
                .unwrap()
                .success
        );
        assert!(
            usecase
                .handle_callback(callback("paid", None))
                .await
                .unwrap()
                .success
        );
    }

    #[tokio::test]
    async fn callback_storage_failure_is_internal() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_mark_paid_by_payment_id()
            .returning(|_, _| Box::pin(async { Err(anyhow::anyhow!("deadlock detected")) }));

        let usecase = PaymentUseCase::new(
            Arc::new(booking_repo),
            Arc::new(MockPaymentGateway::new()),
            urls(),
        );

        let err = usecase
            .handle_callback(callback("paid", Some("pl_123")))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn get_status_reads_payment_columns() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_find_by_id().with(eq(5)).returning(|_| {
            let mut paid = booking(150_000.0);
            paid.payment_status = "paid".to_string();
            paid.payment_url = Some("https://mayar.link/pl_123".to_string());
            Box::pin(async move { Ok(Some(paid)) })
        });
        booking_repo
            .expect_find_by_id()
            .with(eq(6))
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = PaymentUseCase::new(
            Arc::new(booking_repo),
            Arc::new(MockPaymentGateway::new()),
            urls(),
        );

        let status = usecase.get_status(5).await.unwrap();
        assert_eq!(status.payment_status, "paid");
        assert_eq!(status.total_price, 150_000.0);

        let err = usecase.get_status(6).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
