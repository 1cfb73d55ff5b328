//! Executes core-built requests over real HTTP.
//!
//! ureq's status-as-error behavior is disabled so 4xx/5xx responses come back
//! as data and status interpretation stays with the core client. Transport
//! failures are folded into `ApiError::Transport` so the gate and session
//! classify them like any other failure.

use taskpad_core::{ApiError, Method, Request, Response};

pub struct Executor {
    agent: ureq::Agent,
}

impl Executor {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn execute(&self, req: &Request) -> Result<Response, ApiError> {
        let result = match (req.method, req.body.as_deref()) {
            (Method::Get, _) => {
                let mut call = self.agent.get(&req.url);
                for (name, value) in &req.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                call.call()
            }
            (Method::Delete, _) => {
                let mut call = self.agent.delete(&req.url);
                for (name, value) in &req.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                call.call()
            }
            (Method::Post, body) => {
                let mut call = self.agent.post(&req.url);
                for (name, value) in &req.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                call.send(body.unwrap_or_default().as_bytes())
            }
            (Method::Put, body) => {
                let mut call = self.agent.put(&req.url);
                for (name, value) in &req.headers {
                    call = call.header(name.as_str(), value.as_str());
                }
                call.send(body.unwrap_or_default().as_bytes())
            }
        };

        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(Response { status, body })
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
