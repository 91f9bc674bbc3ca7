//! # pmosoap - SOAP 1.1 client
//!
//! Builds SOAP 1.1 envelopes for a WSDL-described service, posts them over
//! HTTP and decodes the responses into caller types, reporting SOAP Faults
//! as errors.
//!
//! ## Architecture
//!
//! - [`envelope`] : token stream construction, encoding, and response splitting
//! - [`Client`] : WSDL-bound client driving the envelope builder and the transport
//! - [`Response`] : raw Header / Body regions with fault-aware [`Response::unmarshal`]
//! - [`Transport`] / [`DefinitionsSource`] : HTTP and WSDL collaborators, `ureq` by default
//! - [`SoapConfig`] : YAML + environment configuration of the HTTP agents
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pmosoap::{Client, Params, SoapHeader, soap_header};
//! use serde::Deserialize;
//!
//! struct AuthHeader {
//!     user: String,
//!     token: String,
//! }
//! soap_header!(AuthHeader { user => "User", token => "Token" });
//!
//! #[derive(Deserialize)]
//! struct GetUserResponse {
//!     #[serde(rename = "Name")]
//!     name: String,
//! }
//!
//! let mut client = Client::new("http://example.com/users?wsdl")?;
//! let auth: Arc<dyn SoapHeader> = Arc::new(AuthHeader {
//!     user: "bob".into(),
//!     token: "abc".into(),
//! });
//! let response = client.call_with_headers("GetUser", Params::from([("UserId", "7")]), vec![auth])?;
//! let user: GetUserResponse = response.unmarshal()?;
//! println!("{}", user.name);
//! # Ok::<(), pmosoap::SoapError>(())
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod fault;
pub mod header;
pub mod params;
pub mod response;
pub mod transport;
pub mod wsdl;

pub use client::{Client, ClientBuilder};
pub use config::{HttpConfig, SoapConfig, WsdlConfig};
pub use errors::{ErrorKind, SoapError};
pub use fault::Fault;
pub use header::{GenericHeader, SoapHeader};
pub use params::Params;
pub use response::{Response, unmarshal_response};
pub use transport::{SoapRequest, Transport, TransportError, UreqTransport};
pub use wsdl::{Definitions, DefinitionsSource, HttpWsdlSource, WsdlError, WsdlPort, WsdlService};
