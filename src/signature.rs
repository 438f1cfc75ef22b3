use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Digest schemes the gateway has used for `vnp_SecureHash`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// HMAC-SHA512 keyed with the secret. Current protocol default.
    #[default]
    HmacSha512,
    /// Plain SHA-256 over `secret || data`. Legacy.
    Sha256,
    /// HMAC-SHA256 keyed with the secret. Legacy.
    HmacSha256,
}

impl HashAlgorithm {
    /// Length of the hex digest this scheme produces.
    pub fn hex_len(self) -> usize {
        match self {
            HashAlgorithm::HmacSha512 => 128,
            HashAlgorithm::Sha256 | HashAlgorithm::HmacSha256 => 64,
        }
    }

    /// Name used in the `vnp_SecureHashType` field.
    pub fn hint_name(self) -> &'static str {
        match self {
            HashAlgorithm::HmacSha512 => "HmacSHA512",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::HmacSha256 => "HmacSHA256",
        }
    }

    /// Lowercase hex digest of `data` under `secret`.
    pub fn digest(self, secret: &str, data: &str) -> String {
        match self {
            HashAlgorithm::HmacSha512 => {
                // HMAC takes keys of any length.
                let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes()).expect("HMAC key");
                mac.update(data.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
            HashAlgorithm::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC key");
                mac.update(data.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
            HashAlgorithm::Sha256 => keyed_prefix_sha256(secret, data),
        }
    }
}

fn keyed_prefix_sha256(secret: &str, data: &str) -> String {
    let mut hasher = Sha256::new();
    Digest::update(&mut hasher, secret.as_bytes());
    Digest::update(&mut hasher, data.as_bytes());
    hex::encode(hasher.finalize())
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hint_name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    /// Case-insensitive; separators such as `-` and `_` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "hmacsha512" => Ok(HashAlgorithm::HmacSha512),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "hmacsha256" => Ok(HashAlgorithm::HmacSha256),
            _ => Err(format!("Unknown hash algorithm: {}", s)),
        }
    }
}

/// How the verification algorithm was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlgorithmSource {
    Hint,
    DigestLength,
    /// Neither hint nor digest length identified a scheme.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub algorithm: HashAlgorithm,
    pub source: AlgorithmSource,
}

/// Picks the scheme to verify a received digest with.
///
/// A recognizable hint wins. Otherwise 128 hex digits mean HMAC-SHA512 and
/// 64 mean HMAC-SHA256. Any other length falls back to HMAC-SHA512 so the
/// comparison fails on its own; selection itself never fails.
pub fn select_algorithm(hint: Option<&str>, received: &str) -> Selection {
    if let Some(algorithm) = hint.and_then(|h| h.parse::<HashAlgorithm>().ok()) {
        return Selection { algorithm, source: AlgorithmSource::Hint };
    }
    match received.trim().len() {
        128 => Selection { algorithm: HashAlgorithm::HmacSha512, source: AlgorithmSource::DigestLength },
        64 => Selection { algorithm: HashAlgorithm::HmacSha256, source: AlgorithmSource::DigestLength },
        _ => Selection { algorithm: HashAlgorithm::default(), source: AlgorithmSource::Default },
    }
}

/// Case-insensitive constant-time comparison of two hex digests.
pub fn signatures_match(expected: &str, received: &str) -> bool {
    let expected = expected.trim().to_ascii_lowercase();
    let received = received.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}
