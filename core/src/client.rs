//! Stateless request builder and response parser for the hosted CRUD API.
//!
//! # Design
//! `CrudClient` holds the credential pair and nothing else. Each operation is
//! split into a `build_*` method that produces a `Request` and a `parse_*`
//! method that consumes a `Response`; the host executes the round trip in
//! between. Mutating operations discard the response body — the caller is
//! expected to re-fetch the collection afterwards rather than patch its local
//! copy.

use uuid::Uuid;

use crate::error::ApiError;
use crate::transport::{Method, Request, Response};
use crate::types::{CreateTodo, Credentials, Todo, UpdateTodo};

/// Header carrying the account's API key on every request.
const API_KEY_HEADER: &str = "x-api-key";

/// Stateless client for the hosted CRUD service, bound to one credential pair.
#[derive(Debug, Clone)]
pub struct CrudClient {
    api_key: String,
    base_url: String,
}

impl CrudClient {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            api_key: credentials.api_key.clone(),
            base_url: credentials.api_uri.trim_end_matches('/').to_string(),
        }
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![(API_KEY_HEADER.to_string(), self.api_key.clone())]
    }

    fn json_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.auth_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        headers
    }

    /// Fetch the full collection. No pagination; order is the service's.
    pub fn build_read(&self) -> Request {
        Request {
            method: Method::Get,
            url: format!("{}/records", self.base_url),
            headers: self.auth_headers(),
            body: None,
        }
    }

    pub fn build_create(&self, input: &CreateTodo) -> Result<Request, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(Request {
            method: Method::Post,
            url: format!("{}/records", self.base_url),
            headers: self.json_headers(),
            body: Some(body),
        })
    }

    pub fn build_update(&self, id: Uuid, input: &UpdateTodo) -> Result<Request, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(Request {
            method: Method::Put,
            url: format!("{}/records/{id}", self.base_url),
            headers: self.json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete(&self, id: Uuid) -> Request {
        Request {
            method: Method::Delete,
            url: format!("{}/records/{id}", self.base_url),
            headers: self.auth_headers(),
            body: None,
        }
    }

    pub fn parse_read(&self, response: Response) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// The created item's body is ignored; the session re-fetches instead.
    pub fn parse_create(&self, response: Response) -> Result<(), ApiError> {
        check_status(&response, 201)
    }

    pub fn parse_update(&self, response: Response) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_delete(&self, response: Response) -> Result<(), ApiError> {
        check_status(&response, 204)
    }
}

/// Map non-success statuses to `ApiError` variants, uniformly for all four
/// operations. 402 always becomes `CreditsExhausted` so every code path in
/// the UI shares one credit-exhaustion signal.
fn check_status(response: &Response, expected: u16) -> Result<(), ApiError> {
    match response.status {
        status if status == expected => Ok(()),
        402 => Err(ApiError::CreditsExhausted),
        401 | 403 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::Http {
            status,
            body: response.body.clone(),
        }),
    }
}
