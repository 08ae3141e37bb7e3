//! Blocking `Transport` backed by ureq.
//!
//! A fresh agent is built for every request so nothing is shared between
//! calls. Environment proxies are ignored: only the proxy resolved into the
//! `HttpRequest` is used.

use std::io;

use tracing::trace;
use ureq::http::Uri;

use crate::error::LookupError;
use crate::http::{HttpRequest, HttpResponse, Transport};

const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Default transport: blocking HTTP/1.1 through ureq.
///
/// Every call gets its own agent configured from the `HttpRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UreqTransport {
    max_redirects: u32,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REDIRECTS)
    }
}

impl UreqTransport {
    /// `max_redirects` is how many redirects are followed before the lookup
    /// fails with `TooManyRedirects`.
    pub fn new(max_redirects: u32) -> Self {
        Self { max_redirects }
    }

    fn agent(&self, request: &HttpRequest) -> Result<ureq::Agent, LookupError> {
        let proxy = request
            .proxy
            .as_deref()
            .map(ureq::Proxy::new)
            .transpose()
            .map_err(classify)?;

        Ok(ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(request.timeout)
            .max_redirects(self.max_redirects)
            .proxy(proxy)
            .build()
            .new_agent())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, LookupError> {
        check_url(&request.url)?;
        let agent = self.agent(request)?;

        let mut response = agent.get(&request.url).call().map_err(classify)?;
        let status = response.status().as_u16();
        trace!(status, url = %request.url, "response received");

        // Only a 200 body is ever interpreted.
        let body = if status == 200 {
            let bytes = response.body_mut().read_to_vec().map_err(classify)?;
            String::from_utf8(bytes)
                .map_err(|e| LookupError::Parse(format!("body is not UTF-8: {e}")))?
        } else {
            response.body_mut().read_to_string().unwrap_or_default()
        };

        Ok(HttpResponse { status, body })
    }
}

/// Reject URLs that cannot address a host before touching the network.
fn check_url(url: &str) -> Result<(), LookupError> {
    let uri: Uri = url
        .parse()
        .map_err(|e| LookupError::UrlRequired(format!("{url:?}: {e}")))?;
    if uri.scheme().is_none() || uri.host().is_none() {
        return Err(LookupError::UrlRequired(format!(
            "{url:?}: scheme and host are required"
        )));
    }
    Ok(())
}

/// Map a ureq failure onto the lookup error taxonomy.
fn classify(err: ureq::Error) -> LookupError {
    let message = err.to_string();
    match err {
        ureq::Error::Timeout(_) => LookupError::Timeout(message),
        ureq::Error::Io(ref io_err) if io_err.kind() == io::ErrorKind::TimedOut => {
            LookupError::Timeout(message)
        }
        ureq::Error::Io(_) | ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            LookupError::Connection(message)
        }
        ureq::Error::BadUri(_) | ureq::Error::InvalidProxyUrl => LookupError::UrlRequired(message),
        ureq::Error::TooManyRedirects | ureq::Error::RedirectFailed => {
            LookupError::TooManyRedirects(message)
        }
        _ => LookupError::Http(message),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn timeouts_are_classified() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert!(matches!(classify(err), LookupError::Timeout(_)));
    }

    #[test]
    fn connection_failures_are_classified() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(classify(err), LookupError::Connection(_)));
        assert!(matches!(classify(ureq::Error::HostNotFound), LookupError::Connection(_)));
    }

    #[test]
    fn redirect_limit_is_classified() {
        assert!(matches!(
            classify(ureq::Error::TooManyRedirects),
            LookupError::TooManyRedirects(_)
        ));
    }

    #[test]
    fn bad_urls_are_classified() {
        assert!(matches!(
            classify(ureq::Error::BadUri("nope".to_string())),
            LookupError::UrlRequired(_)
        ));
        assert!(matches!(classify(ureq::Error::InvalidProxyUrl), LookupError::UrlRequired(_)));
    }

    #[test]
    fn other_failures_are_http_errors() {
        assert!(matches!(classify(ureq::Error::StatusCode(502)), LookupError::Http(_)));
    }

    #[test]
    fn url_without_host_is_rejected_before_sending() {
        let transport = UreqTransport::default();
        let request = HttpRequest {
            url: "/cep/01001000.json".to_string(),
            timeout: None,
            proxy: None,
        };
        let err = transport.execute(&request).unwrap_err();
        assert!(matches!(err, LookupError::UrlRequired(_)));
    }

    #[test]
    fn malformed_proxy_is_rejected() {
        let transport = UreqTransport::default();
        let request = HttpRequest {
            url: "http://127.0.0.1:9/cep/01001000.json".to_string(),
            timeout: Some(Duration::from_secs(2)),
            proxy: Some("::not a proxy::".to_string()),
        };
        let err = transport.execute(&request).unwrap_err();
        assert!(matches!(err, LookupError::UrlRequired(_)), "unexpected error: {err:?}");
    }
}
