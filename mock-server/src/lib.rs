//! Local stand-in for `ws.apicep.com`, used by the client's integration tests.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::debug;

pub use axum::http::StatusCode;

pub const INVALID_CEP_MESSAGE: &str = "CEP informado é inválido";
pub const FLOOD_MESSAGE: &str = "Blocked by flood";

/// Address body in the shape ApiCEP returns for a known CEP.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub status: u16,
    pub ok: bool,
    pub code: String,
    pub state: String,
    pub city: String,
    pub district: String,
    pub address: String,
    pub status_text: String,
}

/// Error body ApiCEP sends with HTTP 200.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub status: u16,
    pub ok: bool,
    pub message: String,
    pub status_text: String,
}

/// A canned answer for one CEP.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub status: StatusCode,
    pub body: String,
    pub location: Option<String>,
    pub delay: Option<Duration>,
}

impl Fixture {
    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            location: None,
            delay: None,
        }
    }

    fn ok_json<T: Serialize>(payload: &T) -> Self {
        // Serializing these plain structs cannot fail.
        let body = serde_json::to_string(payload).unwrap_or_default();
        Self::raw(StatusCode::OK, &body)
    }

    pub fn address(code: &str, state: &str, city: &str, district: &str, address: &str) -> Self {
        Self::ok_json(&AddressPayload {
            status: 200,
            ok: true,
            code: code.to_string(),
            state: state.to_string(),
            city: city.to_string(),
            district: district.to_string(),
            address: address.to_string(),
            status_text: "ok".to_string(),
        })
    }

    fn verdict(status: u16, message: &str, status_text: &str) -> Self {
        Self::ok_json(&StatusPayload {
            status,
            ok: false,
            message: message.to_string(),
            status_text: status_text.to_string(),
        })
    }

    pub fn not_found() -> Self {
        Self::verdict(404, "CEP não encontrado", "bad_request")
    }

    pub fn invalid_cep() -> Self {
        Self::verdict(400, INVALID_CEP_MESSAGE, "bad_request")
    }

    pub fn blocked_by_flood() -> Self {
        Self::verdict(400, FLOOD_MESSAGE, "bad_request")
    }

    pub fn rate_limited() -> Self {
        Self::raw(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests")
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..Self::raw(StatusCode::FOUND, "")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn into_http_response(self) -> Response {
        let mut response =
            (self.status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response();
        if let Some(location) = self.location.and_then(|l| l.parse().ok()) {
            response.headers_mut().insert(header::LOCATION, location);
        }
        response
    }
}

/// Fixtures keyed by CEP, with the live service's fallbacks for the rest.
#[derive(Clone, Debug)]
pub struct Catalog {
    fixtures: HashMap<String, Fixture>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
            .with(
                "01001000",
                Fixture::address("01001-000", "SP", "São Paulo", "Sé", "Praça da Sé - lado ímpar"),
            )
            .with(
                "37503130",
                Fixture::address(
                    "37503-130",
                    "MG",
                    "Itajubá",
                    "Santo Antônio",
                    "Rua Geraldino Campista - até 214/215",
                ),
            )
            .with(
                "70150900",
                Fixture::address("70150-900", "DF", "Brasília", "Zona Cívico-Administrativa", ""),
            )
    }
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            fixtures: HashMap::new(),
        }
    }

    pub fn with(mut self, cep: &str, fixture: Fixture) -> Self {
        self.fixtures.insert(cep.to_string(), fixture);
        self
    }

    /// Exact key first, then the digits-only form of a well-formed CEP.
    /// Unknown well-formed CEPs are not found; anything else is invalid.
    pub fn lookup(&self, cep: &str) -> Fixture {
        if let Some(fixture) = self.fixtures.get(cep) {
            return fixture.clone();
        }
        match normalize(cep) {
            Some(digits) => self
                .fixtures
                .get(&digits)
                .cloned()
                .unwrap_or_else(Fixture::not_found),
            None => Fixture::invalid_cep(),
        }
    }
}

/// Accepts `NNNNNNNN` or `NNNNN-NNN`.
fn normalize(cep: &str) -> Option<String> {
    let digits = match cep.split_once('-') {
        Some((head, tail)) if head.len() == 5 && tail.len() == 3 => format!("{head}{tail}"),
        Some(_) => return None,
        None => cep.to_string(),
    };
    (digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

pub fn app() -> Router {
    app_with(Catalog::default())
}

pub fn app_with(catalog: Catalog) -> Router {
    Router::new()
        .route("/cep/{file}", get(lookup))
        .with_state(Arc::new(catalog))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Catalog::default()).await
}

pub async fn run_with(listener: TcpListener, catalog: Catalog) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(catalog)).await
}

async fn lookup(State(catalog): State<Arc<Catalog>>, Path(file): Path<String>) -> Response {
    let Some(cep) = file.strip_suffix(".json") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let fixture = catalog.lookup(cep);
    debug!(cep, status = fixture.status.as_u16(), "serving fixture");
    if let Some(delay) = fixture.delay {
        tokio::time::sleep(delay).await;
    }
    fixture.into_http_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(fixture: &Fixture) -> serde_json::Value {
        serde_json::from_str(&fixture.body).unwrap()
    }

    #[test]
    fn address_fixture_matches_apicep_shape() {
        let fixture = Fixture::address("01001-000", "SP", "São Paulo", "Sé", "Praça da Sé");
        assert_eq!(fixture.status, StatusCode::OK);
        let json = body_json(&fixture);
        assert_eq!(json["status"], 200);
        assert_eq!(json["ok"], true);
        assert_eq!(json["code"], "01001-000");
        assert_eq!(json["statusText"], "ok");
    }

    #[test]
    fn verdicts_are_sent_with_http_200() {
        for fixture in [Fixture::not_found(), Fixture::invalid_cep(), Fixture::blocked_by_flood()] {
            assert_eq!(fixture.status, StatusCode::OK);
        }
        assert_eq!(body_json(&Fixture::invalid_cep())["message"], INVALID_CEP_MESSAGE);
        assert_eq!(body_json(&Fixture::blocked_by_flood())["message"], FLOOD_MESSAGE);
        assert_eq!(body_json(&Fixture::not_found())["status"], 404);
    }

    #[test]
    fn normalize_accepts_both_formats() {
        assert_eq!(normalize("01001000").as_deref(), Some("01001000"));
        assert_eq!(normalize("01001-000").as_deref(), Some("01001000"));
    }

    #[test]
    fn normalize_rejects_malformed() {
        assert_eq!(normalize("0100100"), None);
        assert_eq!(normalize("0100-1000"), None);
        assert_eq!(normalize("abcdefgh"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn catalog_falls_back_like_the_live_service() {
        let catalog = Catalog::default();
        assert_eq!(body_json(&catalog.lookup("01001-000"))["code"], "01001-000");
        assert_eq!(body_json(&catalog.lookup("99999999"))["status"], 404);
        assert_eq!(body_json(&catalog.lookup("123"))["status"], 400);
    }

    #[test]
    fn exact_key_wins_over_fallback() {
        let catalog = Catalog::empty().with("flood", Fixture::rate_limited());
        assert_eq!(catalog.lookup("flood").status, StatusCode::TOO_MANY_REQUESTS);
    }
}
