use thiserror::Error;

use crate::transaction::TransactionId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("base url must use http:// or https:// and include a host")]
    InvalidBaseUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("txnboard_request_failed:{message}")]
    Network { message: String },
    #[error("txnboard_http_{status}:{body}")]
    Http { status: u16, body: String },
    #[error("txnboard_json_decode_failed:{message}")]
    Decode { message: String },
    #[error("txnboard_json_encode_failed:{message}")]
    Encode { message: String },
    #[error("txnboard_missing_element:{what}")]
    MissingElement { what: String },
    #[error("txnboard_missing_row:{id}")]
    MissingRow { id: TransactionId },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SyncError {
    pub fn missing_element(what: impl Into<String>) -> Self {
        Self::MissingElement { what: what.into() }
    }
}
