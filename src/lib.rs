use axum::{
    extract::{Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod callback;
pub mod canonical;
pub mod codec;
pub mod config;
pub mod fields;
pub mod observer;
pub mod signature;
pub mod signer;
pub mod validator;

pub use callback::{CallbackFields, IpnResponse};
pub use config::GatewayConfig;
pub use signature::HashAlgorithm;
pub use signer::{PaymentRequest, RequestSigner, SigningResult};
pub use validator::{ResponseValidator, ValidationFailure, ValidationResult};

use crate::config::ConfigError;

/// Errors raised while building a payment URL. Callback handling never
/// returns these; see [`ValidationResult`].
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl From<ConfigError> for GatewayError {
    fn from(e: ConfigError) -> Self {
        GatewayError::InvalidConfiguration(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Shared state for the HTTP adapter.
#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<RequestSigner>,
    pub validator: Arc<ResponseValidator>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let validator = ResponseValidator::new(&config)?;
        let signer = RequestSigner::new(config)?;
        Ok(Self { signer: Arc::new(signer), validator: Arc::new(validator) })
    }
}

/// Query accepted by `/sign`.
#[derive(Debug, Deserialize)]
pub struct SignQuery {
    pub amount: Decimal,
    #[serde(default)]
    pub order_info: Option<String>,
    #[serde(default)]
    pub txn_id: Option<Uuid>,
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

// First hop of X-Forwarded-For; the normalizer handles a missing value.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

async fn sign_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SignQuery>,
) -> impl IntoResponse {
    let mut request = PaymentRequest::new(query.amount, query.txn_id.unwrap_or_else(Uuid::new_v4));
    request.order_info = query.order_info.unwrap_or_default();
    request.client_ip = client_ip(&headers);
    request.return_url = query.return_url.unwrap_or_default();
    request.bank_code = query.bank_code;
    request.locale = query.locale;

    match state.signer.sign(&request) {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::warn!("Signing failed: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

async fn return_handler(State(state): State<AppState>, RawQuery(raw): RawQuery) -> impl IntoResponse {
    let result = state.validator.validate_raw_query(raw.as_deref().unwrap_or(""));
    let status = if result.is_valid { StatusCode::OK } else { StatusCode::UNAUTHORIZED };
    (status, Json(result))
}

async fn ipn_handler(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Json<IpnResponse> {
    let result = state.validator.validate_raw_query(raw.as_deref().unwrap_or(""));
    Json(IpnResponse::from_validation(&result))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "vnpay-gateway"
    }))
}

/// Router exposing the signer and validator over HTTP.
pub fn router(config: GatewayConfig) -> Result<Router> {
    Ok(router_with_state(AppState::new(config)?))
}

pub fn router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/sign", get(sign_handler))
        .route("/return", get(return_handler))
        .route("/ipn", get(ipn_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
