//! The seam between `HttpClient` and the network.
//!
//! `UreqTransport` is the default. Tests and embedders can plug in anything
//! that turns an `HttpRequest` into an `HttpResponse`.

use std::sync::Arc;

use ureq::http;

use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one request/response round-trip.
///
/// Implementations report network failures as `ClientError::Transport` and
/// requests they cannot put on the wire as `ClientError::InvalidRequest`.
/// Status codes are returned as data; interpreting them is the client's job.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a pooled `ureq::Agent`.
///
/// Redirects are not followed: every 3xx comes back as a response, with or
/// without a `Location` header.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn agent(&self) -> &ureq::Agent {
        &self.agent
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Use a caller-configured agent. If the agent still treats error statuses
/// as errors, those come back as body-less responses.
impl From<ureq::Agent> for UreqTransport {
    fn from(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let result = match request.body {
            Some(body) => {
                let req = builder.body(body).map_err(invalid_request)?;
                self.agent.run(req)
            }
            None => {
                let req = builder.body(()).map_err(invalid_request)?;
                self.agent.run(req)
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code)) => {
                let mut response = HttpResponse::new(code, std::io::empty());
                response.reason = http::StatusCode::from_u16(code)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(str::to_string);
                return Ok(response);
            }
            Err(e) => return Err(ClientError::transport(e)),
        };

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            headers,
            body: Box::new(response.into_body().into_reader()),
        })
    }
}

fn invalid_request(err: http::Error) -> ClientError {
    ClientError::InvalidRequest(err.to_string())
}
