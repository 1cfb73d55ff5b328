//! Deterministic core for a terminal to-do client backed by a hosted,
//! credit-metered CRUD service.
//!
//! # Overview
//! Builds `Request` values and parses `Response` values without touching the
//! network (host-does-IO pattern); the frontend executes the round trips.
//! State lives in two small machines the frontend drives:
//!
//! - [`CredentialGate`] — collects an API key/URI pair, validates it with a
//!   single probe read, and hands out the adopted client.
//! - [`Session`] — the list screen: cached collection, input line, edit
//!   target, sticky credits banner, error notice. User intents produce
//!   [`Effect`] values; completions feed back through tokened `complete_*`
//!   calls so a stale read can never overwrite a newer one.
//!
//! # Design
//! - `CrudClient` is stateless — it holds only the credential pair.
//! - Mutating operations ignore response bodies; the session re-fetches the
//!   collection after every successful mutation.
//! - All failures funnel through [`ApiError`], including host-side transport
//!   errors, so the gate and session classify every outcome the same way.

pub mod client;
pub mod error;
pub mod gate;
pub mod session;
pub mod transport;
pub mod types;

pub use client::CrudClient;
pub use error::ApiError;
pub use gate::{CredentialGate, GateState, INVALID_CREDENTIALS};
pub use session::{Effect, RequestToken, Session};
pub use transport::{Method, Request, Response};
pub use types::{CreateTodo, Credentials, Todo, UpdateTodo};
