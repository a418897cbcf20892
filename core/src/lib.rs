//! Blocking JSON HTTP client.
//!
//! # Overview
//! `HttpClient` pairs a base URL with an optional bearer token and a
//! pluggable `Transport` (ureq by default). Each call encodes the body as
//! JSON, sends one request, fails on status >= 400, and parses the response
//! into a `JsonResult` that can be queried by path without a schema.
//!
//! ```no_run
//! use json_client::HttpClient;
//!
//! let client = HttpClient::new("https://api.example.com", "token");
//! let user = client.get("/users/1")?;
//! println!("{}", user.get("name").as_str().unwrap_or_default());
//! # Ok::<(), json_client::ClientError>(())
//! ```
//!
//! # Design
//! - The client holds no per-call state; it is `Send + Sync` whenever its
//!   transport is, so one instance can serve many threads.
//! - No retries, timeouts or cancellation of its own. Those belong to the
//!   transport or the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod transport;

pub use client::HttpClient;
pub use config::ClientConfig;
pub use error::{BoxError, ClientError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use json::JsonResult;
pub use transport::{Transport, UreqTransport};
