use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentModel {
    pub booking_id: i64,
    pub user_email: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatePaymentResponse {
    pub success: bool,
    pub payment_url: String,
    pub payment_id: String,
}

/// Notification body posted by the payment processor.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCallbackModel {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payment_link_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<PaymentCallbackMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentCallbackMetadata {
    #[serde(default)]
    pub booking_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentCallbackResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentStatusDto {
    pub payment_status: String,
    pub payment_url: Option<String>,
    pub total_price: f64,
    pub paid_at: Option<DateTime<Utc>>,
}
