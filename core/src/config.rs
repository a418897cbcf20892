//! Client configuration.
//!
//! `ClientConfig` derives `Deserialize` so applications can embed it in their
//! own config files; `from_env` covers the common case of a base URL and
//! token handed in through the environment.

use serde::{Deserialize, Serialize};

pub const BASE_URL_ENV: &str = "JSON_CLIENT_BASE_URL";
pub const TOKEN_ENV: &str = "JSON_CLIENT_TOKEN";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Bearer token. Empty or missing means unauthenticated.
    #[serde(default)]
    pub token: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Read `JSON_CLIENT_BASE_URL` (default `http://localhost:3000`) and
    /// `JSON_CLIENT_TOKEN` (default empty).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token: lookup(TOKEN_ENV).unwrap_or_default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, "")
    }
}
