// Integration tests for `MayarClient` using wiremock.

use std::collections::HashMap;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crates::payments::mayar_client::{
    MayarClient, MayarCustomer, MayarError, MayarPaymentLinkRequest,
};

async fn setup() -> (MockServer, MayarClient) {
    let server = MockServer::start().await;
    let client = MayarClient::new("test-api-key".to_string(), format!("{}/", server.uri()));
    (server, client)
}

fn sample_request() -> MayarPaymentLinkRequest {
    MayarPaymentLinkRequest {
        name: "Booking Lapangan A".to_string(),
        description: "Booking lapangan Lapangan A (futsal) pada 2025-03-01 jam 10:00:00-12:00:00"
            .to_string(),
        amount: 200_000,
        customer: MayarCustomer {
            name: "Budi".to_string(),
            email: "budi@example.com".to_string(),
        },
        return_url: "http://localhost:3000/payment/success?booking_id=7".to_string(),
        callback_url: "http://localhost:5000/payment/callback".to_string(),
        metadata: HashMap::from([("booking_id".to_string(), "7".to_string())]),
    }
}

#[tokio::test]
async fn test_create_payment_link_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/payment-links"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_partial_json(json!({
            "amount": 200000,
            "metadata": { "booking_id": "7" },
            "customer": { "email": "budi@example.com" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 200,
            "data": { "id": "pl_123", "link": "https://mayar.link/pay/pl_123" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = client.create_payment_link(&sample_request()).await.unwrap();

    assert_eq!(link.id, "pl_123");
    assert_eq!(link.link, "https://mayar.link/pay/pl_123");
}

#[tokio::test]
async fn test_create_payment_link_surfaces_upstream_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/payment-links"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "statusCode": 422,
            "message": "amount must be at least 1000"
        })))
        .mount(&server)
        .await;

    let err = client
        .create_payment_link(&sample_request())
        .await
        .unwrap_err();

    match &err {
        MayarError::Api {
            status, message, ..
        } => {
            assert_eq!(*status, 422);
            assert_eq!(message.as_deref(), Some("amount must be at least 1000"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert_eq!(err.details(), "amount must be at least 1000");
}

#[tokio::test]
async fn test_create_payment_link_error_without_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/payment-links"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client
        .create_payment_link(&sample_request())
        .await
        .unwrap_err();

    assert!(matches!(err, MayarError::Api { status: 502, message: None, .. }));
    assert!(err.details().contains("status 502"));
}
