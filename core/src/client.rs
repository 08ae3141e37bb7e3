//! Stateless CEP lookup against ApiCEP.
//!
//! # Design
//! `ApiCepClient` holds only its configuration and a transport; it carries
//! no mutable state between calls and can be shared across threads when its
//! transport can. A lookup is `build_lookup` → `Transport::execute` →
//! `parse_lookup`, with exactly one transport call and no retries.

use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::LookupError;
use crate::http::{select_proxy, HttpRequest, HttpResponse, Proxies, Transport};
use crate::transport::UreqTransport;
use crate::types::{AddressRecord, ApiCepPayload};

const INVALID_CEP_MESSAGE: &str = "CEP informado é inválido";
const FLOOD_MESSAGE: &str = "Blocked by flood";

/// Client for the ApiCEP lookup endpoint.
#[derive(Debug, Clone, Default)]
pub struct ApiCepClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApiCepClient<UreqTransport> {
    /// Client for the public endpoint using the default ureq transport.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::default())
    }
}

impl<T: Transport> ApiCepClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_lookup(
        &self,
        cep: &str,
        timeout: Option<Duration>,
        proxies: Option<&Proxies>,
    ) -> HttpRequest {
        let url = self.config.lookup_url(cep);
        let proxy = proxies.and_then(|proxies| select_proxy(proxies, &url));
        HttpRequest {
            url,
            timeout,
            proxy,
        }
    }

    /// Interpret the upstream answer.
    ///
    /// The body is only decoded on HTTP 200; ApiCEP reports lookup failures
    /// inside that body through its own `status` field.
    pub fn parse_lookup(&self, response: HttpResponse) -> Result<AddressRecord, LookupError> {
        match response.status {
            200 => {}
            429 => return Err(LookupError::BlockedByFlood),
            status => return Err(LookupError::UnexpectedStatus { status }),
        }

        let payload: ApiCepPayload = serde_json::from_str(&response.body)
            .map_err(|e| LookupError::Parse(e.to_string()))?;
        check_payload(&payload)?;
        Ok(AddressRecord::from_payload(payload))
    }

    /// Look up `cep`, waiting at most `timeout` (forever when `None`).
    #[instrument(level = "debug", skip(self, proxies))]
    pub fn fetch(
        &self,
        cep: &str,
        timeout: Option<Duration>,
        proxies: Option<&Proxies>,
    ) -> Result<AddressRecord, LookupError> {
        let request = self.build_lookup(cep, timeout, proxies);
        debug!(url = %request.url, proxied = request.proxy.is_some(), "requesting address");

        let response = self
            .transport
            .execute(&request)
            .inspect_err(|err| warn!(error = %err, "transport failure"))?;

        let result = self.parse_lookup(response);
        if let Err(err) = &result {
            debug!(error = %err, "lookup rejected");
        }
        result
    }
}

/// Look up `cep` on the public endpoint with a default client.
pub fn fetch_address(
    cep: &str,
    timeout: Option<Duration>,
    proxies: Option<&Proxies>,
) -> Result<AddressRecord, LookupError> {
    ApiCepClient::new().fetch(cep, timeout, proxies)
}

/// Map ApiCEP's in-body status onto the lookup verdicts.
fn check_payload(payload: &ApiCepPayload) -> Result<(), LookupError> {
    match (payload.status, payload.message.as_deref()) {
        (400, Some(INVALID_CEP_MESSAGE)) => Err(LookupError::InvalidCep),
        (400, Some(FLOOD_MESSAGE)) => Err(LookupError::BlockedByFlood),
        (404, _) => Err(LookupError::CepNotFound),
        _ => Ok(()),
    }
}
