//! Blocking JSON HTTP client.
//!
//! # Design
//! `HttpClient` holds a base URL, a transport and an optional bearer token,
//! and carries no mutable state between calls. Every call is one pass of
//! build request → `Transport::send` → status check → read body → parse.
//! Errors return immediately; nothing is retried.
//!
//! `build_request` is public so the exact request a call would send can be
//! inspected without touching the network.

use std::io::Read;

use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest};
use crate::json::JsonResult;
use crate::transport::{Transport, UreqTransport};

const APPLICATION_JSON: &str = "application/json";
const JSON_HEADERS: &[(&str, &str)] = &[("Content-Type", APPLICATION_JSON)];

/// How much of an error response body is kept on `ClientError::Status`.
const ERROR_BODY_LIMIT: u64 = 64 * 1024;

/// Synchronous client for a JSON API rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpClient<T = UreqTransport> {
    base_url: String,
    transport: T,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client with the default ureq transport. An empty `token`
    /// means requests are sent without an `Authorization` header.
    ///
    /// The base URL is stored verbatim; paths are appended to it as-is.
    /// Nothing here can fail, so unlike a `NewClient(base, token) -> (Client,
    /// Error)` style constructor this returns the client directly.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            base_url: base_url.into(),
            transport: UreqTransport::new(),
            token: (!token.is_empty()).then_some(token),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone(), config.token.clone())
    }
}

impl<T> HttpClient<T> {
    /// Replace the transport, keeping base URL and token.
    pub fn with_transport<U: Transport>(self, transport: U) -> HttpClient<U> {
        HttpClient {
            base_url: self.base_url,
            transport,
            token: self.token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> HttpClient<T> {
    /// Compose the request `execute` would send.
    ///
    /// The authorization header comes first, then `headers` in order. When a
    /// body is present and `headers` has no `Content-Type`, a JSON content
    /// type is appended. Nothing is deduplicated.
    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<HttpRequest, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ClientError::Encode)?;

        let mut request_headers = Vec::with_capacity(headers.len() + 2);
        if let Some(token) = &self.token {
            request_headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        request_headers.extend(headers.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        if body.is_some() && !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
            request_headers.push(("Content-Type".to_string(), APPLICATION_JSON.to_string()));
        }

        Ok(HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers: request_headers,
            body,
        })
    }

    /// Send one request and parse the response body.
    ///
    /// Status codes >= 400 become `ClientError::Status`. A successful body
    /// is parsed permissively: malformed JSON gives an absent `JsonResult`,
    /// not an error. The response, and with it the connection, is dropped
    /// before this returns on every path.
    pub fn execute<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<JsonResult, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, path, body, headers)?;
        debug!(
            method = %method,
            url = %request.url,
            has_body = request.body.is_some(),
            "sending request"
        );

        let mut response = self.transport.send(request)?;
        debug!(status = %response.status_line(), "received response");

        if response.status >= 400 {
            let mut body = Vec::new();
            if let Err(e) = response.body.by_ref().take(ERROR_BODY_LIMIT).read_to_end(&mut body) {
                debug!(error = %e, "error response body unreadable");
            }
            return Err(ClientError::Status {
                status: response.status,
                reason: response.reason.take(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let mut bytes = Vec::new();
        response
            .body
            .read_to_end(&mut bytes)
            .map_err(ClientError::BodyRead)?;
        Ok(JsonResult::parse(&bytes))
    }

    /// `execute` with the method given as a string, e.g. `"PATCH"`.
    pub fn execute_str<B>(
        &self,
        method: &str,
        path: &str,
        body: Option<&B>,
        headers: &[(&str, &str)],
    ) -> Result<JsonResult, ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method.parse()?, path, body, headers)
    }

    pub fn get(&self, path: &str) -> Result<JsonResult, ClientError> {
        self.execute(HttpMethod::Get, path, None::<&()>, &[])
    }

    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<JsonResult, ClientError> {
        self.execute(HttpMethod::Post, path, Some(body), JSON_HEADERS)
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<JsonResult, ClientError> {
        self.execute(HttpMethod::Put, path, Some(body), JSON_HEADERS)
    }

    pub fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<JsonResult, ClientError> {
        self.execute(HttpMethod::Patch, path, Some(body), JSON_HEADERS)
    }

    pub fn delete(&self, path: &str) -> Result<JsonResult, ClientError> {
        self.execute(HttpMethod::Delete, path, None::<&()>, &[])
    }
}
