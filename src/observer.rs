//! Diagnostics emitted while signing and verifying.
//!
//! Everything handed to a [`SigningObserver`] has already passed the
//! redaction boundary: the secret key only ever appears as a
//! [`RedactedSecret`].

use crate::signature::{AlgorithmSource, HashAlgorithm};
use crate::validator::{CallbackSource, ValidationFailure};
use std::fmt;

const VISIBLE_PREFIX: usize = 4;

/// The first few characters of a secret, safe to log.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedSecret(String);

impl RedactedSecret {
    pub fn new(secret: &str) -> Self {
        Self(secret.chars().take(VISIBLE_PREFIX).collect())
    }

    pub fn prefix(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}***", self.0)
    }
}

impl fmt::Debug for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

#[derive(Debug, Clone)]
pub struct SigningDiagnostics {
    pub merchant_code: String,
    pub secret: RedactedSecret,
    pub txn_ref: String,
    pub amount_minor: i64,
    pub ip_addr: String,
    pub signing_data: String,
    pub algorithm: HashAlgorithm,
}

#[derive(Debug, Clone)]
pub struct VerificationDiagnostics {
    pub source: CallbackSource,
    pub secret: RedactedSecret,
    pub algorithm: HashAlgorithm,
    pub algorithm_source: AlgorithmSource,
    pub canonical: String,
    pub txn_ref: Option<String>,
    pub response_code: Option<String>,
    pub failure: Option<ValidationFailure>,
}

/// Receives diagnostics from the signer and the validator.
pub trait SigningObserver: Send + Sync {
    fn on_signed(&self, _diagnostics: &SigningDiagnostics) {}
    fn on_verified(&self, _diagnostics: &VerificationDiagnostics) {}
}

/// Forwards diagnostics to `tracing`. Canonical strings go out at debug level only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SigningObserver for TracingObserver {
    fn on_signed(&self, d: &SigningDiagnostics) {
        tracing::info!(
            merchant = %d.merchant_code,
            txn_ref = %d.txn_ref,
            amount = d.amount_minor,
            ip = %d.ip_addr,
            algorithm = %d.algorithm,
            "Signed payment request"
        );
        tracing::debug!(secret = %d.secret, signing_data = %d.signing_data, "Signing data");
    }

    fn on_verified(&self, d: &VerificationDiagnostics) {
        match &d.failure {
            None => tracing::info!(
                source = ?d.source,
                txn_ref = ?d.txn_ref,
                response_code = ?d.response_code,
                algorithm = %d.algorithm,
                "Callback signature verified"
            ),
            Some(failure) => tracing::warn!(
                source = ?d.source,
                txn_ref = ?d.txn_ref,
                algorithm = %d.algorithm,
                algorithm_source = ?d.algorithm_source,
                "Callback rejected: {}",
                failure
            ),
        }
        tracing::debug!(secret = %d.secret, canonical = %d.canonical, "Verification data");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SigningObserver for NoopObserver {}
