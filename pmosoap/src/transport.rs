//! HTTP exchange of SOAP payloads.
//!
//! The client only needs one blocking POST that returns the response body.
//! [`UreqTransport`] is the default; tests and embedders can supply their
//! own [`Transport`].

use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use ureq::Agent;

use crate::config::HttpConfig;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("{0}")]
    Other(String),
}

/// A SOAP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl SoapRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub trait Transport: Send + Sync {
    /// POSTs `request` and returns the full response body, whatever the
    /// HTTP status.
    fn post(&self, request: &SoapRequest) -> Result<Vec<u8>, TransportError>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    max_response_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &HttpConfig) -> Self {
        // Faults come back with HTTP 500: the body must still be read, so
        // status codes are not turned into errors here.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .user_agent(config.user_agent.as_str())
            .build()
            .into();

        Self {
            agent,
            max_response_bytes: config.max_response_bytes,
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}

impl Transport for UreqTransport {
    fn post(&self, request: &SoapRequest) -> Result<Vec<u8>, TransportError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.send(&request.body[..])?;
        debug!(
            url = %request.url,
            status = %response.status(),
            "SOAP response received"
        );

        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_response_bytes)
            .read_to_vec()?;
        Ok(body)
    }
}
