use crate::fields;
use crate::observer::RedactedSecret;
use std::net::Ipv4Addr;
use thiserror::Error;
use time::macros::offset;
use time::{Duration, UtcOffset};

pub const DEFAULT_GATEWAY_URL: &str = "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html";
pub const DEFAULT_FALLBACK_IP: &str = "127.0.0.1";
pub const DEFAULT_ORDER_INFO: &str = "Thanh toan don hang";

/// Longest `vnp_ExpireDate` window accepted.
pub const MAX_EXPIRE_WINDOW: Duration = Duration::days(7);

/// Wall clock the gateway uses for `vnp_CreateDate` and `vnp_PayDate`.
pub const GATEWAY_UTC_OFFSET: UtcOffset = offset!(+7);

/// Merchant-side settings for one gateway integration.
///
/// Passed by value into [`crate::signer::RequestSigner`] and
/// [`crate::validator::ResponseValidator`]; nothing here is global.
#[derive(Clone)]
pub struct GatewayConfig {
    pub merchant_code: String,
    pub secret_key: String,
    pub gateway_url: String,
    /// Used when a payment request does not carry its own return URL.
    pub return_url: String,
    /// IPv4 address sent when the client address is missing or IPv6.
    pub fallback_ip: String,
    pub version: String,
    pub command: String,
    pub currency: String,
    pub locale: String,
    pub order_type: String,
    pub default_order_info: String,
    pub utc_offset: UtcOffset,
    /// Emits `vnp_ExpireDate` this long after creation when set.
    pub expire_after: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            merchant_code: String::new(),
            secret_key: String::new(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            return_url: String::new(),
            fallback_ip: DEFAULT_FALLBACK_IP.to_string(),
            version: fields::DEFAULT_VERSION.to_string(),
            command: fields::DEFAULT_COMMAND.to_string(),
            currency: fields::DEFAULT_CURRENCY.to_string(),
            locale: fields::DEFAULT_LOCALE.to_string(),
            order_type: fields::DEFAULT_ORDER_TYPE.to_string(),
            default_order_info: DEFAULT_ORDER_INFO.to_string(),
            utc_offset: GATEWAY_UTC_OFFSET,
            expire_after: None,
        }
    }
}

// Hand-written so the secret never reaches a log line.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("merchant_code", &self.merchant_code)
            .field("secret_key", &RedactedSecret::new(&self.secret_key))
            .field("gateway_url", &self.gateway_url)
            .field("return_url", &self.return_url)
            .field("fallback_ip", &self.fallback_ip)
            .field("version", &self.version)
            .field("command", &self.command)
            .field("currency", &self.currency)
            .field("locale", &self.locale)
            .field("order_type", &self.order_type)
            .field("utc_offset", &self.utc_offset)
            .field("expire_after", &self.expire_after)
            .finish()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Secret key cannot be empty")] EmptySecret,
    #[error("Merchant code cannot be empty")] EmptyMerchantCode,
    #[error("Gateway URL must be absolute: {0}")] InvalidGatewayUrl(String),
    #[error("Fallback IP must be an IPv4 address: {0}")] InvalidFallbackIp(String),
    #[error("Expiry window must be positive")] InvalidExpiry,
    #[error("Expiry window must not exceed {0}")] ExpiryTooLong(Duration),
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_secret()?;
        if self.merchant_code.trim().is_empty() { return Err(ConfigError::EmptyMerchantCode); }

        match url::Url::parse(&self.gateway_url) {
            Ok(u) if u.has_host() => {}
            _ => return Err(ConfigError::InvalidGatewayUrl(self.gateway_url.clone())),
        }
        if self.fallback_ip.parse::<Ipv4Addr>().is_err() {
            return Err(ConfigError::InvalidFallbackIp(self.fallback_ip.clone()));
        }
        if let Some(window) = self.expire_after {
            if !window.is_positive() { return Err(ConfigError::InvalidExpiry); }
            if window > MAX_EXPIRE_WINDOW { return Err(ConfigError::ExpiryTooLong(MAX_EXPIRE_WINDOW)); }
        }
        Ok(())
    }

    /// Builds an expiry window from whole minutes as read from the environment.
    /// Values whose seconds overflow `i64` yield `None`.
    pub fn expire_window_from_minutes(minutes: i64) -> Option<Duration> {
        minutes.checked_mul(60).map(Duration::seconds)
    }

    /// Verification only needs the key.
    pub fn validate_secret(&self) -> Result<(), ConfigError> {
        if self.secret_key.trim().is_empty() { return Err(ConfigError::EmptySecret); }
        Ok(())
    }
}
