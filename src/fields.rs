//! Parameter names and fixed values of the gateway protocol.

pub const VERSION: &str = "vnp_Version";
pub const COMMAND: &str = "vnp_Command";
pub const AMOUNT: &str = "vnp_Amount";
pub const CURRENCY: &str = "vnp_CurrCode";
pub const CREATE_DATE: &str = "vnp_CreateDate";
pub const EXPIRE_DATE: &str = "vnp_ExpireDate";
pub const LOCALE: &str = "vnp_Locale";
pub const IP_ADDR: &str = "vnp_IpAddr";
pub const ORDER_INFO: &str = "vnp_OrderInfo";
pub const ORDER_TYPE: &str = "vnp_OrderType";
pub const RETURN_URL: &str = "vnp_ReturnUrl";
pub const MERCHANT_CODE: &str = "vnp_TmnCode";
pub const TXN_REF: &str = "vnp_TxnRef";
pub const BANK_CODE: &str = "vnp_BankCode";

// Added by the gateway on the way back.
pub const RESPONSE_CODE: &str = "vnp_ResponseCode";
pub const TRANSACTION_STATUS: &str = "vnp_TransactionStatus";
pub const TRANSACTION_NO: &str = "vnp_TransactionNo";
pub const BANK_TRAN_NO: &str = "vnp_BankTranNo";
pub const CARD_TYPE: &str = "vnp_CardType";
pub const PAY_DATE: &str = "vnp_PayDate";

pub const SECURE_HASH: &str = "vnp_SecureHash";
pub const SECURE_HASH_TYPE: &str = "vnp_SecureHashType";

pub const DEFAULT_VERSION: &str = "2.1.0";
pub const DEFAULT_COMMAND: &str = "pay";
pub const DEFAULT_CURRENCY: &str = "VND";
pub const DEFAULT_LOCALE: &str = "vn";
pub const DEFAULT_ORDER_TYPE: &str = "other";

/// Response and transaction status code reported for a successful payment.
pub const SUCCESS_CODE: &str = "00";

/// Fields that never take part in the canonical string.
pub fn is_excluded(name: &str) -> bool {
    name == SECURE_HASH || name == SECURE_HASH_TYPE
}
