use crate::canonical::{payment_params, CanonicalParams, EncodedPayment};
use crate::codec::{format_timestamp, normalize_ip, to_minor_units, to_reference};
use crate::config::GatewayConfig;
use crate::fields;
use crate::observer::{RedactedSecret, SigningDiagnostics, SigningObserver, TracingObserver};
use crate::signature::HashAlgorithm;
use crate::{GatewayError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// One payment attempt. Consumed by [`RequestSigner::sign`].
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Major units; must be positive.
    pub amount: Decimal,
    /// Trimmed; the configured default is used when blank.
    pub order_info: String,
    /// Any format; normalized to IPv4 before signing.
    pub client_ip: String,
    /// Falls back to the configured return URL when blank.
    pub return_url: String,
    /// Must be unique per attempt.
    pub transaction_id: Uuid,
    pub bank_code: Option<String>,
    pub locale: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: Decimal, transaction_id: Uuid) -> Self {
        Self {
            amount,
            order_info: String::new(),
            client_ip: String::new(),
            return_url: String::new(),
            transaction_id,
            bank_code: None,
            locale: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningResult {
    /// The exact string the signature was computed over.
    pub signing_data: String,
    pub signature: String,
    pub payment_url: String,
    pub txn_ref: String,
    pub create_date: String,
}

/// Builds signed payment URLs. Pure computation, safe to share across threads.
pub struct RequestSigner {
    config: GatewayConfig,
    observer: Arc<dyn SigningObserver>,
}

impl RequestSigner {
    /// Fails with [`GatewayError::InvalidConfiguration`] when the secret,
    /// merchant code, gateway URL or fallback address is unusable.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, observer: Arc::new(TracingObserver) })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SigningObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn sign(&self, request: &PaymentRequest) -> Result<SigningResult> {
        self.sign_at(request, OffsetDateTime::now_utc())
    }

    /// Signs with an explicit creation time. Same inputs, same output.
    pub fn sign_at(&self, request: &PaymentRequest, created_at: OffsetDateTime) -> Result<SigningResult> {
        let amount_minor = to_minor_units(request.amount)?;

        let return_url = match request.return_url.trim() {
            "" => self.config.return_url.trim(),
            url => url,
        };
        if return_url.is_empty() {
            return Err(GatewayError::InvalidConfiguration("return URL is required".into()));
        }

        let order_info = match request.order_info.trim() {
            "" => self.config.default_order_info.trim(),
            info => info,
        };
        let ip_addr = normalize_ip(&request.client_ip, &self.config.fallback_ip);
        let txn_ref = to_reference(request.transaction_id);
        let create_date = format_timestamp(created_at, self.config.utc_offset).ok_or_else(|| {
            GatewayError::InvalidConfiguration(format!("creation time {} is out of range", created_at))
        })?;
        let expire_date = match self.config.expire_after {
            Some(window) => {
                let expire_date = created_at
                    .checked_add(window)
                    .and_then(|at| format_timestamp(at, self.config.utc_offset))
                    .ok_or_else(|| {
                        GatewayError::InvalidConfiguration(format!(
                            "expiry window {} overflows from {}",
                            window, created_at
                        ))
                    })?;
                Some(expire_date)
            }
            None => None,
        };

        let params = payment_params(
            &self.config,
            &EncodedPayment {
                amount_minor,
                order_info,
                ip_addr: &ip_addr,
                return_url,
                txn_ref: &txn_ref,
                create_date: &create_date,
                expire_date: expire_date.as_deref(),
                bank_code: request.bank_code.as_deref(),
                locale: request.locale.as_deref(),
            },
        );

        let signing_data = params.signing_string();
        let algorithm = HashAlgorithm::HmacSha512;
        let signature = algorithm.digest(&self.config.secret_key, &signing_data);
        let payment_url = self.payment_url(&params, &signature);

        self.observer.on_signed(&SigningDiagnostics {
            merchant_code: self.config.merchant_code.clone(),
            secret: RedactedSecret::new(&self.config.secret_key),
            txn_ref: txn_ref.clone(),
            amount_minor,
            ip_addr,
            signing_data: signing_data.clone(),
            algorithm,
        });

        Ok(SigningResult { signing_data, signature, payment_url, txn_ref, create_date })
    }

    fn payment_url(&self, params: &CanonicalParams, signature: &str) -> String {
        let base = self.config.gateway_url.trim();
        let separator = if base.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}&{}={}",
            base,
            separator,
            params.transport_string(),
            fields::SECURE_HASH,
            signature
        )
    }
}
