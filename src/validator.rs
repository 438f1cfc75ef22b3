//! Verification of gateway callbacks.
//!
//! Two entry points recompute `vnp_SecureHash`:
//!
//! * [`ResponseValidator::validate_raw_query`] hashes the values exactly as
//!   they arrived on the wire. Prefer this one.
//! * [`ResponseValidator::validate_decoded`] is for transports that only
//!   hand out decoded values. It re-encodes them with
//!   [`transport_encode`](crate::canonical::transport_encode), which is not
//!   the encoding the outbound signature used, so the two paths disagree on
//!   values containing spaces or non-ASCII text.
//!
//! Neither path returns an error; problems end up in
//! [`ValidationResult::failure`].

use crate::callback::CallbackFields;
use crate::canonical::CanonicalParams;
use crate::config::GatewayConfig;
use crate::fields;
use crate::observer::{RedactedSecret, SigningObserver, TracingObserver, VerificationDiagnostics};
use crate::signature::{select_algorithm, signatures_match, AlgorithmSource, HashAlgorithm};
use crate::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use time::UtcOffset;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallbackSource {
    RawQuery,
    DecodedMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum ValidationFailure {
    #[error("missing signature")]
    MissingSignature,
    #[error("malformed callback: {0}")]
    MalformedCallback(String),
    #[error("signature mismatch")]
    SignatureMismatch,
}

/// Outcome of verifying one callback. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub detected_algorithm: HashAlgorithm,
    pub algorithm_source: AlgorithmSource,
    pub failure: Option<ValidationFailure>,
    #[serde(flatten)]
    pub fields: CallbackFields,
}

impl ValidationResult {
    pub fn response_code(&self) -> Option<&str> {
        self.fields.response_code.as_deref()
    }

    pub fn parsed_transaction_id(&self) -> Option<Uuid> {
        self.fields.parsed_transaction_id
    }

    pub fn parsed_amount(&self) -> Decimal {
        self.fields.parsed_amount
    }

    /// Valid signature and the gateway reports a successful payment.
    pub fn is_success(&self) -> bool {
        self.is_valid && self.fields.is_success()
    }
}

/// Everything extracted from a callback before the digest is recomputed.
struct Extracted {
    canonical: String,
    signature: Option<String>,
    hint: Option<String>,
    decoded: BTreeMap<String, String>,
}

pub struct ResponseValidator {
    secret_key: String,
    utc_offset: UtcOffset,
    observer: Arc<dyn SigningObserver>,
}

impl ResponseValidator {
    /// Only the secret key and UTC offset are taken from `config`.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        config.validate_secret()?;
        Ok(Self {
            secret_key: config.secret_key.clone(),
            utc_offset: config.utc_offset,
            observer: Arc::new(TracingObserver),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SigningObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Verifies an untouched query string, with or without a leading `?`.
    pub fn validate_raw_query(&self, raw: &str) -> ValidationResult {
        let extracted = extract_raw(raw);
        self.finish(CallbackSource::RawQuery, extracted)
    }

    /// Verifies already-decoded parameters.
    pub fn validate_decoded<I, K, V>(&self, params: I) -> ValidationResult
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let extracted = extract_decoded(params);
        self.finish(CallbackSource::DecodedMap, extracted)
    }

    fn finish(&self, source: CallbackSource, extracted: std::result::Result<Extracted, ValidationFailure>) -> ValidationResult {
        let (extracted, failure) = match extracted {
            Ok(e) => (e, None),
            Err(f) => (
                Extracted { canonical: String::new(), signature: None, hint: None, decoded: BTreeMap::new() },
                Some(f),
            ),
        };

        let received = extracted.signature.as_deref().unwrap_or("");
        let selection = select_algorithm(extracted.hint.as_deref(), received);

        let failure = failure.or_else(|| self.check(&extracted, selection.algorithm));
        let fields = CallbackFields::parse(&extracted.decoded, self.utc_offset);

        self.observer.on_verified(&VerificationDiagnostics {
            source,
            secret: RedactedSecret::new(&self.secret_key),
            algorithm: selection.algorithm,
            algorithm_source: selection.source,
            canonical: extracted.canonical,
            txn_ref: fields.txn_ref.clone(),
            response_code: fields.response_code.clone(),
            failure: failure.clone(),
        });

        ValidationResult {
            is_valid: failure.is_none(),
            detected_algorithm: selection.algorithm,
            algorithm_source: selection.source,
            failure,
            fields,
        }
    }

    fn check(&self, extracted: &Extracted, algorithm: HashAlgorithm) -> Option<ValidationFailure> {
        let received = match extracted.signature.as_deref().map(str::trim) {
            Some(sig) if !sig.is_empty() => sig,
            _ => return Some(ValidationFailure::MissingSignature),
        };
        let expected = algorithm.digest(&self.secret_key, &extracted.canonical);
        if signatures_match(&expected, received) {
            None
        } else {
            Some(ValidationFailure::SignatureMismatch)
        }
    }
}

/// Splits on `&`, then on the first `=`, keeping every value byte for byte.
/// Only the signature and hint are decoded.
fn extract_raw(raw: &str) -> std::result::Result<Extracted, ValidationFailure> {
    let raw = raw.trim().trim_start_matches('?');
    if raw.is_empty() {
        return Err(ValidationFailure::MalformedCallback("empty query string".into()));
    }

    let mut pairs: Vec<(&str, &str)> = Vec::new();
    let mut signature = None;
    let mut hint = None;
    for segment in raw.split('&').filter(|s| !s.is_empty()) {
        let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
        match name {
            fields::SECURE_HASH => signature = Some(decode_component(value)),
            fields::SECURE_HASH_TYPE => hint = Some(decode_component(value)),
            _ => pairs.push((name, value)),
        }
    }
    if pairs.is_empty() {
        return Err(ValidationFailure::MalformedCallback("no protocol fields".into()));
    }

    pairs.sort_by(|a, b| a.0.cmp(b.0));
    let canonical = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let decoded = pairs
        .iter()
        .map(|(k, v)| (decode_component(k), decode_component(v)))
        .collect();

    Ok(Extracted { canonical, signature, hint, decoded })
}

fn extract_decoded<I, K, V>(params: I) -> std::result::Result<Extracted, ValidationFailure>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut canonical = CanonicalParams::new();
    let mut signature = None;
    let mut hint = None;
    for (k, v) in params {
        let (name, value) = (k.as_ref(), v.as_ref());
        match name {
            fields::SECURE_HASH => signature = Some(value.to_string()),
            fields::SECURE_HASH_TYPE => hint = Some(value.to_string()),
            _ => {
                canonical.insert(name, value);
            }
        }
    }
    if canonical.is_empty() {
        return Err(ValidationFailure::MalformedCallback("no protocol fields".into()));
    }

    let decoded = canonical.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Ok(Extracted { canonical: canonical.transport_string(), signature, hint, decoded })
}

/// Form-style decoding: `+` is a space. Invalid UTF-8 keeps the raw text.
fn decode_component(value: &str) -> String {
    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| spaced.clone())
}
