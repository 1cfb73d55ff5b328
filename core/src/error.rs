//! Error types for the hosted CRUD client.
//!
//! # Design
//! Credit exhaustion (402) and key rejection (401/403) get dedicated variants
//! because the UI reacts to them differently from any other failure: the
//! former raises a sticky banner, the latter fails credential validation.
//! All other non-success statuses land in `Http` with the raw status and body.
//! `Transport` carries host-side I/O failures so the gate and session classify
//! every outcome through one type.

use std::fmt;

/// Errors produced by `CrudClient` build/parse methods or by the host's
/// request executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 402 — the account's usage credits are spent.
    CreditsExhausted,

    /// The server rejected the API key (401 or 403).
    Unauthorized,

    /// The server returned 404 — the addressed item does not exist.
    NotFound,

    /// Any other non-success status.
    Http { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),

    /// The request never produced a response (connect failure, I/O error).
    Transport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::CreditsExhausted => write!(f, "HTTP 402: usage credits exhausted"),
            ApiError::Unauthorized => write!(f, "HTTP 401: API key rejected"),
            ApiError::NotFound => write!(f, "HTTP 404: no such item"),
            ApiError::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            ApiError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
            ApiError::Deserialization(msg) => write!(f, "deserialization failed: {msg}"),
            ApiError::Transport(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
