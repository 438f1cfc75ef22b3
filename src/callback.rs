use crate::codec::{from_minor_units, from_reference, parse_timestamp};
use crate::fields;
use crate::validator::{ValidationFailure, ValidationResult};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

/// Fields echoed back by the gateway, converted to native types.
///
/// Conversion is lenient: an unparseable reference, amount or pay date
/// leaves the typed field empty (or zero) and never affects signature
/// validity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallbackFields {
    pub response_code: Option<String>,
    pub transaction_status: Option<String>,
    pub txn_ref: Option<String>,
    pub parsed_transaction_id: Option<Uuid>,
    pub parsed_amount: Decimal,
    pub transaction_no: Option<String>,
    pub bank_code: Option<String>,
    pub bank_tran_no: Option<String>,
    pub card_type: Option<String>,
    pub order_info: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub pay_date: Option<OffsetDateTime>,
}

impl CallbackFields {
    /// Extracts fields from decoded parameter values.
    pub fn parse(params: &BTreeMap<String, String>, offset: UtcOffset) -> Self {
        let field = |name: &str| params.get(name).map(|v| v.trim().to_string());
        let txn_ref = field(fields::TXN_REF);

        Self {
            response_code: field(fields::RESPONSE_CODE),
            transaction_status: field(fields::TRANSACTION_STATUS),
            parsed_transaction_id: txn_ref.as_deref().and_then(from_reference),
            parsed_amount: params
                .get(fields::AMOUNT)
                .map(|v| from_minor_units(v))
                .unwrap_or(Decimal::ZERO),
            transaction_no: field(fields::TRANSACTION_NO),
            bank_code: field(fields::BANK_CODE),
            bank_tran_no: field(fields::BANK_TRAN_NO),
            card_type: field(fields::CARD_TYPE),
            order_info: field(fields::ORDER_INFO),
            pay_date: params.get(fields::PAY_DATE).and_then(|v| parse_timestamp(v, offset)),
            txn_ref,
        }
    }

    /// True when the response code, and the transaction status if present,
    /// both carry the success sentinel.
    pub fn is_success(&self) -> bool {
        self.response_code.as_deref() == Some(fields::SUCCESS_CODE)
            && self
                .transaction_status
                .as_deref()
                .map_or(true, |s| s == fields::SUCCESS_CODE)
    }
}

/// Acknowledgement body for server-to-server notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpnResponse {
    Confirmed,
    OrderNotFound,
    AlreadyConfirmed,
    InvalidAmount,
    InvalidChecksum,
    UnknownError,
}

impl IpnResponse {
    pub fn code(self) -> &'static str {
        match self {
            IpnResponse::Confirmed => "00",
            IpnResponse::OrderNotFound => "01",
            IpnResponse::AlreadyConfirmed => "02",
            IpnResponse::InvalidAmount => "04",
            IpnResponse::InvalidChecksum => "97",
            IpnResponse::UnknownError => "99",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            IpnResponse::Confirmed => "Confirm Success",
            IpnResponse::OrderNotFound => "Order not found",
            IpnResponse::AlreadyConfirmed => "Order already confirmed",
            IpnResponse::InvalidAmount => "Invalid amount",
            IpnResponse::InvalidChecksum => "Invalid Checksum",
            IpnResponse::UnknownError => "Unknown error",
        }
    }

    /// Signature-level acknowledgement. Order lookups and amount checks
    /// belong to the caller, who can answer with the other variants.
    pub fn from_validation(result: &ValidationResult) -> Self {
        match &result.failure {
            None => IpnResponse::Confirmed,
            Some(ValidationFailure::SignatureMismatch) | Some(ValidationFailure::MissingSignature) => {
                IpnResponse::InvalidChecksum
            }
            Some(ValidationFailure::MalformedCallback(_)) => IpnResponse::UnknownError,
        }
    }
}

#[derive(Serialize)]
struct IpnBody {
    #[serde(rename = "RspCode")]
    rsp_code: &'static str,
    #[serde(rename = "Message")]
    message: &'static str,
}

impl Serialize for IpnResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        IpnBody { rsp_code: self.code(), message: self.message() }.serialize(serializer)
    }
}
