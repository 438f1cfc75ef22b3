use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`
use vnpay_gateway::canonical::CanonicalParams;
use vnpay_gateway::config::GatewayConfig;
use vnpay_gateway::{router, HashAlgorithm};

const SECRET: &str = "test-secret-key";

/// Helper to create test config
fn test_config() -> GatewayConfig {
    GatewayConfig {
        merchant_code: "TESTTMN1".to_string(),
        secret_key: SECRET.to_string(),
        return_url: "http://localhost:8080/return".to_string(),
        ..GatewayConfig::default()
    }
}

/// Helper to build a callback query the way the gateway signs it
fn callback_query(response_code: &str) -> String {
    let params: CanonicalParams = vec![
        ("vnp_Amount", "5000000"),
        ("vnp_ResponseCode", response_code),
        ("vnp_TmnCode", "TESTTMN1"),
        ("vnp_TransactionStatus", response_code),
        ("vnp_TxnRef", "13bf7a78f35a46fe8650e30682537025"),
    ]
    .into_iter()
    .collect();
    let wire = params.transport_string();
    let sig = HashAlgorithm::HmacSha512.digest(SECRET, &wire);
    format!("{}&vnp_SecureHash={}", wire, sig)
}

async fn get(uri: &str, forwarded_for: Option<&str>) -> (StatusCode, Value) {
    let app = router(test_config()).unwrap();
    let mut builder = Request::builder().uri(uri);
    if let Some(ip) = forwarded_for {
        builder = builder.header("x-forwarded-for", ip);
    }
    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_sign_endpoint() {
    let (status, json) = get(
        "/sign?amount=50000&order_info=Thanh%20toan&txn_id=13bf7a78-f35a-46fe-8650-e30682537025",
        Some("::1, 198.51.100.7"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let url = json["payment_url"].as_str().unwrap();
    assert!(url.starts_with("https://sandbox.vnpayment.vn/paymentv2/vpcpay.html?vnp_Amount=5000000&"));
    assert!(url.contains("&vnp_IpAddr=127.0.0.1&"));
    assert!(url.contains("&vnp_OrderInfo=Thanh+toan&"));
    assert!(url.contains("&vnp_TxnRef=13bf7a78f35a46fe8650e30682537025&"));
    assert_eq!(json["signature"].as_str().unwrap().len(), 128);
    assert!(json["signing_data"].as_str().unwrap().contains("vnp_OrderInfo=Thanh%20toan&"));
}

#[tokio::test]
async fn test_sign_forwards_client_ipv4() {
    let (status, json) = get("/sign?amount=1000", Some("198.51.100.7, 10.0.0.1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["payment_url"].as_str().unwrap().contains("&vnp_IpAddr=198.51.100.7&"));
}

#[tokio::test]
async fn test_sign_rejects_bad_amount() {
    let (status, _) = get("/sign?amount=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get("/sign?order_info=x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_return_with_valid_signature() {
    let (status, json) = get(&format!("/return?{}", callback_query("00")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["response_code"], "00");
    assert_eq!(json["parsed_transaction_id"], "13bf7a78-f35a-46fe-8650-e30682537025");
    assert_eq!(json["detected_algorithm"], "HmacSha512");
}

#[tokio::test]
async fn test_return_with_tampered_amount_fails() {
    let tampered = callback_query("00").replace("vnp_Amount=5000000", "vnp_Amount=9000000");
    let (status, json) = get(&format!("/return?{}", tampered), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["is_valid"], false);
}

#[tokio::test]
async fn test_return_without_query_fails() {
    let (status, json) = get("/return", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["is_valid"], false);
}

#[tokio::test]
async fn test_ipn_acknowledgements() {
    let (status, json) = get(&format!("/ipn?{}", callback_query("00")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["RspCode"], "00");
    assert_eq!(json["Message"], "Confirm Success");

    let bad = format!("{}0", callback_query("00"));
    let (_, json) = get(&format!("/ipn?{}", bad), None).await;
    assert_eq!(json["RspCode"], "97");
}
