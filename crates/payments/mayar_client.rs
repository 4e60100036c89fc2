use std::collections::HashMap;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

pub const DEFAULT_MAYAR_BASE_URL: &str = "https://api.mayar.id/ks/v1";

/// Minimal Mayar payment-link client built on reqwest.
pub struct MayarClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MayarCustomer {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MayarPaymentLinkRequest {
    pub name: String,
    pub description: String,
    /// Whole rupiah. Mayar rejects fractional amounts.
    pub amount: i64,
    pub customer: MayarCustomer,
    pub return_url: String,
    pub callback_url: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MayarPaymentLink {
    pub id: String,
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct MayarEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct MayarErrorBody {
    message: Option<String>,
}

#[derive(Debug, Error)]
pub enum MayarError {
    #[error("Mayar API request failed: {context} (status {status})")]
    Api {
        context: &'static str,
        status: u16,
        message: Option<String>,
    },
    #[error("Mayar request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl MayarError {
    /// Human readable reason, preferring the message Mayar put in the body.
    pub fn details(&self) -> String {
        match self {
            MayarError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl MayarClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_key, base_url)
    }

    pub fn with_client(http: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn ensure_success(
        resp: reqwest::Response,
        context: &'static str,
    ) -> Result<reqwest::Response, MayarError> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let message = serde_json::from_str::<MayarErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.message);

        error!(
            status = %status,
            mayar_error_message = ?message,
            response_body = %body,
            context = %context,
            "mayar api request failed"
        );

        Err(MayarError::Api {
            context,
            status: status.as_u16(),
            message,
        })
    }

    /// Creates a hosted payment link and returns its id and checkout URL.
    pub async fn create_payment_link(
        &self,
        request: &MayarPaymentLinkRequest,
    ) -> Result<MayarPaymentLink, MayarError> {
        let resp = self
            .http
            .post(format!("{}/payment-links", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create payment link").await?;

        let parsed: MayarEnvelope<MayarPaymentLink> = resp.json().await?;
        Ok(parsed.data)
    }
}
