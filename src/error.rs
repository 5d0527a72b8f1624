//! Error types shared by the portal library

use thiserror::Error;

/// Errors raised by the remote data gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid credentials")]
    Unauthorized,

    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("backend is not configured: {0}")]
    NotConfigured(String),
}

/// Errors raised by the local key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("local store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("local store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by page, form and auth operations
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("access denied")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not signed in")]
    Unauthenticated,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PortalError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        PortalError::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type PortalResult<T> = Result<T, PortalError>;
