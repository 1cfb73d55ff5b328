//! Wire types for the host-does-IO pattern.
//!
//! # Design
//! A `Request` describes one HTTP round trip as plain data; the host (the
//! terminal frontend, or a test harness) executes it and hands back a
//! `Response`. Keeping I/O out of this crate makes every state transition
//! deterministic and testable without a network.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One HTTP round trip, described as data.
///
/// Built by `CrudClient::build_*`. Headers already include the service's
/// `x-api-key` credential; the host only has to execute the request verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// The result of executing a `Request`, fed back into `CrudClient::parse_*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}
