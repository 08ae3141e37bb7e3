//! Error types for the ApiCEP client.
//!
//! # Design
//! Transport failures are flattened into message-carrying variants so the
//! public error surface does not depend on the HTTP library in use. The
//! upstream verdicts (`InvalidCep`, `BlockedByFlood`, `CepNotFound`) get
//! dedicated unit variants because callers match on them.

/// Errors returned by `ApiCepClient::fetch` and `ApiCepClient::parse_lookup`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The connection to the service could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// Generic HTTP-layer failure reported by the transport.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request URL (or proxy URL) is missing or malformed.
    #[error("a valid URL is required: {0}")]
    UrlRequired(String),

    #[error("too many redirects: {0}")]
    TooManyRedirects(String),

    /// The request did not complete within the caller's timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Upstream answered status 400 with "CEP informado é inválido".
    #[error("invalid CEP")]
    InvalidCep,

    /// Upstream is rate limiting the caller (HTTP 429 or a flood payload).
    #[error("blocked by flood")]
    BlockedByFlood,

    /// Upstream answered status 404.
    #[error("CEP not found")]
    CepNotFound,

    /// Any HTTP status other than 200 and 429.
    #[error("other error, status code: {status}")]
    UnexpectedStatus { status: u16 },

    /// A 200 body that is not JSON or lacks the `status` field.
    #[error("could not parse response body: {0}")]
    Parse(String),
}

impl LookupError {
    /// True for failures raised before an HTTP response was available.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LookupError::Connection(_)
                | LookupError::Http(_)
                | LookupError::UrlRequired(_)
                | LookupError::TooManyRedirects(_)
                | LookupError::Timeout(_)
        )
    }
}
