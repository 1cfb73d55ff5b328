//! Credential-entry state machine.
//!
//! # Design
//! The gate is an explicit tagged state machine rather than a pair of
//! `is_validated` / `auth_error` flags, so impossible combinations cannot be
//! represented. Validation is a single probe read executed by the host: the
//! gate hands out a client built from the current field values, the host runs
//! one `read()` with it, and the outcome decides the transition. Any failure
//! — rejected key and unreachable host alike — produces the same fixed
//! message; there is no retry backoff.

use crate::client::CrudClient;
use crate::error::ApiError;
use crate::types::{Credentials, Todo};

/// Shown for every failed probe, regardless of the underlying cause.
pub const INVALID_CREDENTIALS: &str = "Invalid API Key or URI. Please check and try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Fields editable, nothing submitted yet.
    NeedsCredentials,
    /// A probe read is in flight; fields are frozen.
    Validating,
    /// Terminal. The adopted client has been handed to the shell.
    Ready,
    /// The last probe failed; fields editable again.
    Failed(String),
}

#[derive(Debug)]
pub struct CredentialGate {
    api_key: String,
    api_uri: String,
    state: GateState,
}

impl CredentialGate {
    /// Entry fields start from the process-wide configuration values.
    pub fn new(defaults: Credentials) -> Self {
        Self {
            api_key: defaults.api_key,
            api_uri: defaults.api_uri,
            state: GateState::NeedsCredentials,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_uri(&self) -> &str {
        &self.api_uri
    }

    pub fn is_editable(&self) -> bool {
        matches!(
            self.state,
            GateState::NeedsCredentials | GateState::Failed(_)
        )
    }

    /// Ignored while a probe is in flight or after the gate is `Ready`.
    pub fn set_api_key(&mut self, value: impl Into<String>) {
        if self.is_editable() {
            self.api_key = value.into();
        }
    }

    pub fn set_api_uri(&mut self, value: impl Into<String>) {
        if self.is_editable() {
            self.api_uri = value.into();
        }
    }

    fn credentials(&self) -> Credentials {
        Credentials {
            api_key: self.api_key.clone(),
            api_uri: self.api_uri.clone(),
        }
    }

    /// Begin validation: freeze the fields and hand the host a client to
    /// probe with a single `read()`. Returns `None` when not editable.
    pub fn submit(&mut self) -> Option<CrudClient> {
        if !self.is_editable() {
            return None;
        }
        self.state = GateState::Validating;
        Some(CrudClient::new(&self.credentials()))
    }

    /// Resolve the probe. On success the gate becomes `Ready` and returns the
    /// client to adopt for active use; the probe's payload itself is
    /// discarded — the shell triggers the initial fetch with the adopted
    /// client. On any failure the gate moves to `Failed` with the fixed
    /// message.
    pub fn resolve_probe(&mut self, result: Result<Vec<Todo>, ApiError>) -> Option<CrudClient> {
        if self.state != GateState::Validating {
            return None;
        }
        match result {
            Ok(_) => {
                self.state = GateState::Ready;
                Some(CrudClient::new(&self.credentials()))
            }
            Err(err) => {
                tracing::warn!(%err, "credential probe failed");
                self.state = GateState::Failed(INVALID_CREDENTIALS.to_string());
                None
            }
        }
    }
}
