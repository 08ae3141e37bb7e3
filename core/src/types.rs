//! Wire payload and normalised address record.
//!
//! # Design
//! `ApiCepPayload` mirrors the upstream JSON loosely: only `status` is
//! required, everything else may be missing or null. `AddressRecord` is the
//! fixed shape handed to callers, where absent values become empty strings.

use serde::{Deserialize, Serialize};

/// Marker some responses append to `address` to announce a number range.
const RANGE_MARKER: &str = " - até";

/// Body returned by ApiCEP alongside HTTP 200.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiCepPayload {
    pub status: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// A normalised address. Every field is always present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressRecord {
    pub district: String,
    pub cep: String,
    pub city: String,
    pub street: String,
    pub uf: String,
    /// ApiCEP never reports a complement; always empty.
    pub complement: String,
}

impl AddressRecord {
    pub fn from_payload(payload: ApiCepPayload) -> Self {
        Self {
            district: payload.district.unwrap_or_default(),
            cep: payload.code.unwrap_or_default(),
            city: payload.city.unwrap_or_default(),
            street: street_name(payload.address.as_deref().unwrap_or_default()).to_string(),
            uf: payload.state.unwrap_or_default(),
            complement: String::new(),
        }
    }
}

/// Drop everything from the first `" - até"` onwards.
fn street_name(address: &str) -> &str {
    match address.find(RANGE_MARKER) {
        Some(idx) => &address[..idx],
        None => address,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(body: &str) -> ApiCepPayload {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn street_is_cut_at_range_marker() {
        assert_eq!(street_name("Rua X - até 999"), "Rua X");
        assert_eq!(street_name("Rua X - até 10 - até 20"), "Rua X");
    }

    #[test]
    fn street_without_marker_is_unchanged() {
        assert_eq!(street_name("Praça da Sé - lado ímpar"), "Praça da Sé - lado ímpar");
        assert_eq!(street_name(""), "");
    }

    #[test]
    fn full_payload_is_mapped() {
        let record = AddressRecord::from_payload(payload(
            r#"{"status":200,"ok":true,"code":"37503-130","state":"MG","city":"Itajubá",
                "district":"Santo Antônio","address":"Rua Geraldino Campista - até 214/215",
                "statusText":"ok"}"#,
        ));
        assert_eq!(
            record,
            AddressRecord {
                district: "Santo Antônio".to_string(),
                cep: "37503-130".to_string(),
                city: "Itajubá".to_string(),
                street: "Rua Geraldino Campista".to_string(),
                uf: "MG".to_string(),
                complement: String::new(),
            }
        );
    }

    #[test]
    fn missing_and_null_fields_become_empty() {
        let record = AddressRecord::from_payload(payload(
            r#"{"status":200,"code":"01001-000","district":null}"#,
        ));
        assert_eq!(record.cep, "01001-000");
        assert_eq!(record.district, "");
        assert_eq!(record.city, "");
        assert_eq!(record.street, "");
        assert_eq!(record.uf, "");
        assert_eq!(record.complement, "");
    }

    #[test]
    fn record_serializes_with_fixed_keys() {
        let json = serde_json::to_value(AddressRecord::default()).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["cep", "city", "complement", "district", "street", "uf"]);
        assert!(json.as_object().unwrap().values().all(|v| v == ""));
    }

    #[test]
    fn payload_requires_status() {
        let result: Result<ApiCepPayload, _> = serde_json::from_str(r#"{"code":"01001-000"}"#);
        assert!(result.is_err());
    }
}
