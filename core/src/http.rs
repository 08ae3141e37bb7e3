//! HTTP transport types for the lookup round-trip.
//!
//! # Design
//! Requests and responses are described as plain data. `ApiCepClient` builds
//! an `HttpRequest`, hands it to a `Transport`, and parses the returned
//! `HttpResponse`. Keeping the wire step behind a trait lets unit tests run
//! without a network and lets callers bring their own HTTP stack.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::LookupError;

/// Proxy settings keyed by URL scheme (`http`, `https`) or `all`.
pub type Proxies = HashMap<String, String>;

/// A fully resolved GET request. No headers and no body are ever sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// `None` connects directly.
    pub proxy: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes one `HttpRequest`.
///
/// Implementations return every HTTP status as data and translate their own
/// failures into the transport variants of `LookupError`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, LookupError>;
}

/// Pick the proxy for `url`: the entry for its scheme, else the `all` entry.
pub fn select_proxy(proxies: &Proxies, url: &str) -> Option<String> {
    let scheme = url
        .split_once("://")
        .map(|(scheme, _)| scheme.to_ascii_lowercase())?;
    proxies
        .get(&scheme)
        .or_else(|| proxies.get("all"))
        .cloned()
}
