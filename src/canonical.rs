//! Canonical parameter sets and the two value encodings the gateway uses.
//!
//! The outbound signature is computed over [`signing_encode`]d values while
//! the literal URL carries [`transport_encode`]d values. The two agree for
//! plain ASCII without spaces and diverge otherwise:
//!
//! | input        | signing    | transport      |
//! |--------------|------------|----------------|
//! | `a b`        | `a%20b`    | `a+b`          |
//! | `toán`       | `to%3Fn`   | `to%C3%A1n`    |
//!
//! Which side the gateway actually hashes has to be confirmed against live
//! traffic for each integration; both functions are kept as they are.

use crate::config::GatewayConfig;
use crate::fields;
use std::collections::BTreeMap;

/// Strict ASCII percent-encoding used for the string that gets hashed.
///
/// Characters outside ASCII cannot be represented and are replaced by `?`
/// before escaping. RFC 3986 unreserved characters pass through and a space
/// stays `%20`.
pub fn signing_encode(value: &str) -> String {
    let ascii: String = value
        .chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect();
    urlencoding::encode(&ascii).into_owned()
}

/// UTF-8 percent-encoding used for the literal query string, with `%20`
/// rewritten to `+`.
pub fn transport_encode(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

/// Protocol parameters kept sorted by name in byte order.
///
/// The signature and algorithm-hint fields are never stored. Inserting a
/// name twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalParams {
    params: BTreeMap<String, String>,
}

impl CanonicalParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !fields::is_excluded(&name) {
            self.params.insert(name, value.into());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `name=value` pairs joined by `&`, values through [`signing_encode`].
    pub fn signing_string(&self) -> String {
        self.join_with(signing_encode)
    }

    /// `name=value` pairs joined by `&`, values through [`transport_encode`].
    pub fn transport_string(&self) -> String {
        self.join_with(transport_encode)
    }

    fn join_with(&self, encode: fn(&str) -> String) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CanonicalParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = CanonicalParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Payment fields after amount, reference, address and timestamp encoding.
#[derive(Debug, Clone)]
pub struct EncodedPayment<'a> {
    pub amount_minor: i64,
    pub order_info: &'a str,
    pub ip_addr: &'a str,
    pub return_url: &'a str,
    pub txn_ref: &'a str,
    pub create_date: &'a str,
    pub expire_date: Option<&'a str>,
    pub bank_code: Option<&'a str>,
    pub locale: Option<&'a str>,
}

/// Builds the full outbound parameter set for a payment.
pub fn payment_params(config: &GatewayConfig, payment: &EncodedPayment<'_>) -> CanonicalParams {
    let mut params = CanonicalParams::new();
    params
        .insert(fields::VERSION, config.version.as_str())
        .insert(fields::COMMAND, config.command.as_str())
        .insert(fields::AMOUNT, payment.amount_minor.to_string())
        .insert(fields::CURRENCY, config.currency.as_str())
        .insert(fields::CREATE_DATE, payment.create_date)
        .insert(fields::LOCALE, payment.locale.unwrap_or(&config.locale))
        .insert(fields::IP_ADDR, payment.ip_addr)
        .insert(fields::ORDER_INFO, payment.order_info)
        .insert(fields::ORDER_TYPE, config.order_type.as_str())
        .insert(fields::RETURN_URL, payment.return_url)
        .insert(fields::MERCHANT_CODE, config.merchant_code.as_str())
        .insert(fields::TXN_REF, payment.txn_ref);

    if let Some(expire) = payment.expire_date {
        params.insert(fields::EXPIRE_DATE, expire);
    }
    if let Some(bank) = payment.bank_code.filter(|b| !b.is_empty()) {
        params.insert(fields::BANK_CODE, bank);
    }
    params
}
