//! Process-wide configuration, read once at startup.
//!
//! Environment variables:
//! - `TASKPAD_API_KEY` - API key pre-seeded into the credential screen.
//!   Defaults to empty.
//! - `TASKPAD_API_URI` - Base URI of the hosted CRUD service. Defaults to
//!   `http://127.0.0.1:3000` for local development against `mock-api`.
//! - `TASKPAD_LOG` - Optional tracing filter (e.g. `taskpad_core=debug`);
//!   when set, log lines are written to `taskpad.log`.

use taskpad_core::Credentials;

const DEFAULT_API_URI: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            credentials: Credentials {
                api_key: std::env::var("TASKPAD_API_KEY").unwrap_or_default(),
                api_uri: std::env::var("TASKPAD_API_URI")
                    .unwrap_or_else(|_| DEFAULT_API_URI.to_string()),
            },
        }
    }
}
