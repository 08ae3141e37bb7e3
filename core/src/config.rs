//! Client configuration.

use url::Url;

use crate::error::LookupError;

/// Endpoint used when no template is configured.
pub const DEFAULT_URL_TEMPLATE: &str = "https://ws.apicep.com/cep/{cep}.json";

const PLACEHOLDER: &str = "{cep}";

/// Settings for `ApiCepClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    url_template: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Point the client at another endpoint, e.g. a local mock server.
    ///
    /// The template must contain `{cep}`.
    pub fn with_url_template(template: &str) -> Result<Self, LookupError> {
        if !template.contains(PLACEHOLDER) {
            return Err(LookupError::UrlRequired(format!(
                "URL template {template:?} has no {PLACEHOLDER} placeholder"
            )));
        }
        Ok(Self {
            url_template: template.to_string(),
        })
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Substitute `cep` into the template without validating it.
    ///
    /// Characters that cannot appear in a URL path (spaces, controls,
    /// non-ASCII) are percent-encoded so odd input still reaches the
    /// service. A template that does not parse as a URL is left as is and
    /// rejected by the transport.
    pub fn lookup_url(&self, cep: &str) -> String {
        let raw = self.url_template.replace(PLACEHOLDER, cep);
        match Url::parse(&raw) {
            Ok(url) => url.into(),
            Err(_) => raw,
        }
    }
}
