//! Client for the ApiCEP postal-code lookup service.
//!
//! # Overview
//! Looks up one Brazilian postal code (CEP) per call against
//! `ws.apicep.com` and normalises the answer into an [`AddressRecord`].
//! Every failure, whether raised by the transport or reported by the
//! upstream service, surfaces as one [`LookupError`] variant.
//!
//! # Design
//! - `ApiCepClient` is stateless: it holds a `ClientConfig` and a transport.
//! - A lookup is split into `build_lookup` (produces an `HttpRequest`) and
//!   `parse_lookup` (consumes an `HttpResponse`); `fetch` glues the two
//!   around a single `Transport::execute` call.
//! - `UreqTransport` is the default blocking transport. Tests swap in their
//!   own `Transport` or point the URL template at the mock server.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{fetch_address, ApiCepClient};
pub use config::{ClientConfig, DEFAULT_URL_TEMPLATE};
pub use error::LookupError;
pub use http::{HttpRequest, HttpResponse, Proxies, Transport};
pub use transport::UreqTransport;
pub use types::{AddressRecord, ApiCepPayload};
