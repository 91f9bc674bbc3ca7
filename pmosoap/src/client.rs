//! SOAP client bound to one WSDL endpoint.
//!
//! A [`Client`] keeps the state of its latest call (method, parameters,
//! headers, payload). [`Client::call`] takes `&mut self`, so one client runs
//! one call at a time; clone it to run calls in parallel. Clones share the
//! transport but nothing else.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::SoapConfig;
use crate::envelope::{EnvelopeBuilder, XML_DECLARATION, split_envelope};
use crate::errors::SoapError;
use crate::header::SoapHeader;
use crate::params::Params;
use crate::response::Response;
use crate::transport::{SoapRequest, Transport, UreqTransport};
use crate::wsdl::{Definitions, DefinitionsSource, HttpWsdlSource};

#[derive(Clone)]
pub struct Client {
    wsdl: String,
    url: String,
    method: String,
    params: Params,
    definitions: Option<Arc<Definitions>>,
    headers: Vec<Arc<dyn SoapHeader>>,
    payload: Vec<u8>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Fetches the WSDL at `wsdl` and binds a client to it.
    pub fn new(wsdl: &str) -> Result<Self, SoapError> {
        Self::builder(wsdl).build()
    }

    pub fn builder(wsdl: &str) -> ClientBuilder {
        ClientBuilder::new(wsdl)
    }

    /// Calls `method` with `params`, keeping the headers of earlier calls.
    pub fn call(&mut self, method: &str, params: Params) -> Result<Response, SoapError> {
        self.call_with_headers(method, params, Vec::new())
    }

    /// Calls `method` with `params`.
    ///
    /// Non-empty `headers` replace the headers stored on the client; an empty
    /// list reuses them.
    pub fn call_with_headers(
        &mut self,
        method: &str,
        params: Params,
        headers: Vec<Arc<dyn SoapHeader>>,
    ) -> Result<Response, SoapError> {
        self.method = method.to_string();
        self.params = params;
        if !headers.is_empty() {
            self.headers = headers;
        }

        let definitions = self
            .definitions
            .as_ref()
            .ok_or(SoapError::MissingDefinitions)?;

        let envelope = EnvelopeBuilder::new(&self.method, &definitions.target_namespace)
            .headers(&self.headers)
            .params(&self.params)
            .build()?;

        let mut payload = Vec::with_capacity(XML_DECLARATION.len() + envelope.len());
        payload.extend_from_slice(XML_DECLARATION.as_bytes());
        payload.extend_from_slice(&envelope);

        let request = self.request(payload);
        debug!(
            method = %self.method,
            endpoint = %request.url,
            payload_len = request.body.len(),
            "Sending SOAP request"
        );
        trace!(payload = %String::from_utf8_lossy(&request.body), "SOAP request payload");

        let result = self.transport.post(&request);
        // le corps de la requête redevient le payload du client
        self.payload = request.body;
        let raw = result?;
        trace!(response = %String::from_utf8_lossy(&raw), "SOAP response payload");

        split_envelope(&raw)
    }

    /// HTTP request carrying `payload`.
    fn request(&self, payload: Vec<u8>) -> SoapRequest {
        SoapRequest {
            url: self.wsdl.clone(),
            headers: vec![
                (
                    "Content-Type".to_string(),
                    "text/xml;charset=UTF-8".to_string(),
                ),
                ("Accept".to_string(), "text/xml".to_string()),
                (
                    "SOAPAction".to_string(),
                    format!("{}/{}", self.url, self.method),
                ),
                ("Content-Length".to_string(), payload.len().to_string()),
            ],
            body: payload,
        }
    }

    /// Drops the headers kept from earlier calls.
    pub fn clear_headers(&mut self) {
        self.headers.clear();
    }

    pub fn wsdl(&self) -> &str {
        &self.wsdl
    }

    /// Target namespace without trailing slash; prefix of the SOAPAction.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn headers(&self) -> &[Arc<dyn SoapHeader>] {
        &self.headers
    }

    pub fn definitions(&self) -> Option<&Definitions> {
        self.definitions.as_deref()
    }

    /// Last request body, XML declaration included.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// A client with no definitions: every call fails with
/// [`SoapError::MissingDefinitions`].
impl Default for Client {
    fn default() -> Self {
        Self {
            wsdl: String::new(),
            url: String::new(),
            method: String::new(),
            params: Params::new(),
            definitions: None,
            headers: Vec::new(),
            payload: Vec::new(),
            transport: Arc::new(UreqTransport::default()),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("wsdl", &self.wsdl)
            .field("url", &self.url)
            .field("method", &self.method)
            .field("params", &self.params)
            .field("definitions", &self.definitions)
            .field("headers", &self.headers)
            .field("payload_len", &self.payload.len())
            .finish_non_exhaustive()
    }
}

pub struct ClientBuilder {
    wsdl: String,
    config: SoapConfig,
    transport: Option<Arc<dyn Transport>>,
    source: Option<Box<dyn DefinitionsSource>>,
    definitions: Option<Definitions>,
}

impl ClientBuilder {
    fn new(wsdl: &str) -> Self {
        Self {
            wsdl: wsdl.to_string(),
            config: SoapConfig::default(),
            transport: None,
            source: None,
            definitions: None,
        }
    }

    /// Settings for the default WSDL source and transport.
    pub fn config(mut self, config: SoapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn wsdl_source(mut self, source: impl DefinitionsSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Uses already known definitions instead of fetching the WSDL.
    pub fn definitions(mut self, definitions: Definitions) -> Self {
        self.definitions = Some(definitions);
        self
    }

    pub fn build(self) -> Result<Client, SoapError> {
        url::Url::parse(&self.wsdl)?;

        let definitions = match self.definitions {
            Some(definitions) => definitions,
            None => match self.source {
                Some(source) => source.fetch(&self.wsdl)?,
                None => HttpWsdlSource::new(&self.config.wsdl).fetch(&self.wsdl)?,
            },
        };

        let url = definitions
            .target_namespace
            .strip_suffix('/')
            .unwrap_or(&definitions.target_namespace)
            .to_string();
        debug!(wsdl = %self.wsdl, url = %url, "SOAP client ready");

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new(&self.config.http)));

        Ok(Client {
            wsdl: self.wsdl,
            url,
            method: String::new(),
            params: Params::new(),
            definitions: Some(Arc::new(definitions)),
            headers: Vec::new(),
            payload: Vec::new(),
            transport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::GenericHeader;
    use crate::transport::TransportError;
    use crate::wsdl::WsdlError;
    use serde::Deserialize;
    use std::sync::Mutex;

    const NS: &str = "http://example.com/users/";
    const WSDL: &str = "http://example.com/users?wsdl";

    /// Records every request and answers with a canned body.
    struct RecordingTransport {
        reply: Vec<u8>,
        requests: Mutex<Vec<SoapRequest>>,
    }

    impl RecordingTransport {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.as_bytes().to_vec(),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> SoapRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for RecordingTransport {
        fn post(&self, request: &SoapRequest) -> Result<Vec<u8>, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn post(&self, _request: &SoapRequest) -> Result<Vec<u8>, TransportError> {
            Err(TransportError::Other("connection refused".to_string()))
        }
    }

    struct StaticSource(&'static str);

    impl DefinitionsSource for StaticSource {
        fn fetch(&self, _location: &str) -> Result<Definitions, WsdlError> {
            Definitions::parse(self.0.as_bytes())
        }
    }

    fn client(transport: Arc<dyn Transport>) -> Client {
        Client::builder(WSDL)
            .definitions(Definitions::new(NS))
            .transport(transport)
            .build()
            .unwrap()
    }

    const USER_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <GetUserResponse xmlns="http://example.com/users/">
      <Name>bob</Name>
    </GetUserResponse>
  </soap:Body>
</soap:Envelope>"#;

    #[derive(Debug, Deserialize)]
    struct GetUserResponse {
        #[serde(rename = "Name")]
        name: String,
    }

    #[test]
    fn test_call_builds_request() {
        let transport = RecordingTransport::new(USER_RESPONSE);
        let mut client = client(transport.clone());

        let response = client
            .call("GetUser", Params::from([("UserId", "7")]))
            .unwrap();
        let user: GetUserResponse = response.unmarshal().unwrap();
        assert_eq!(user.name, "bob");

        let request = transport.last();
        assert_eq!(request.url, WSDL);
        assert_eq!(request.header("Content-Type"), Some("text/xml;charset=UTF-8"));
        assert_eq!(request.header("Accept"), Some("text/xml"));
        assert_eq!(
            request.header("SOAPAction"),
            Some("http://example.com/users/GetUser")
        );
        assert_eq!(
            request.header("Content-Length"),
            Some(request.body.len().to_string().as_str())
        );

        let body = String::from_utf8(request.body.clone()).unwrap();
        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<soap:Envelope"));
        assert!(body.contains(
            r#"<GetUser xmlns="http://example.com/users/"><UserId>7</UserId></GetUser>"#
        ));
        assert_eq!(client.payload(), request.body.as_slice());
        assert_eq!(client.method(), "GetUser");
        assert_eq!(client.params().get("UserId"), Some("7"));
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let client = client(RecordingTransport::new(USER_RESPONSE));
        assert_eq!(client.url(), "http://example.com/users");
        assert_eq!(client.wsdl(), WSDL);
    }

    #[test]
    fn test_empty_method_fails_before_transport() {
        let transport = RecordingTransport::new(USER_RESPONSE);
        let mut client = client(transport.clone());

        let err = client.call("", Params::new()).unwrap_err();
        assert!(matches!(err, SoapError::MissingMethodOrNamespace));
        assert!(transport.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_default_client_has_no_definitions() {
        let mut client = Client::default();
        let err = client.call("GetUser", Params::new()).unwrap_err();
        assert!(matches!(err, SoapError::MissingDefinitions));
    }

    #[test]
    fn test_transport_error_is_returned() {
        let mut client = client(Arc::new(FailingTransport));
        let err = client.call("GetUser", Params::new()).unwrap_err();
        assert!(matches!(err, SoapError::Transport(TransportError::Other(_))));
        assert!(client.payload().starts_with(b"<?xml"));
        assert!(client.payload().ends_with(b"</soap:Envelope>"));
    }

    #[test]
    fn test_headers_are_kept_between_calls() {
        let transport = RecordingTransport::new(USER_RESPONSE);
        let mut client = client(transport.clone());

        let auth: Arc<dyn SoapHeader> =
            Arc::new(GenericHeader::new("AuthHeader").field("Token", "abc"));
        client
            .call_with_headers("GetUser", Params::new(), vec![auth])
            .unwrap();
        client.call("GetUser", Params::new()).unwrap();

        let body = String::from_utf8(transport.last().body).unwrap();
        assert!(body.contains(
            r#"<soap:Header><AuthHeader xmlns="http://example.com/users/"><Token>abc</Token></AuthHeader></soap:Header>"#
        ));

        client.clear_headers();
        client.call("GetUser", Params::new()).unwrap();
        let body = String::from_utf8(transport.last().body).unwrap();
        assert!(!body.contains("soap:Header"));
    }

    #[test]
    fn test_malformed_response_returns_partial() {
        let mut client = client(RecordingTransport::new("<soap:Envelope><soap:Body><A/>"));
        let err = client.call("GetUser", Params::new()).unwrap_err();
        assert!(err.partial_response().is_some());
    }

    #[test]
    fn test_invalid_location() {
        let err = Client::builder("://www.server")
            .definitions(Definitions::new(NS))
            .build()
            .unwrap_err();
        assert!(matches!(err, SoapError::InvalidLocation(_)));

        let err = Client::new("").unwrap_err();
        assert!(matches!(err, SoapError::InvalidLocation(_)));
    }

    #[test]
    fn test_definitions_from_source() {
        let client = Client::builder(WSDL)
            .wsdl_source(StaticSource(
                r#"<definitions targetNamespace="urn:static/"><portType><operation name="Ping"/></portType></definitions>"#,
            ))
            .transport(Arc::new(FailingTransport))
            .build()
            .unwrap();
        assert_eq!(client.url(), "urn:static");
        assert!(client.definitions().unwrap().has_operation("Ping"));

        let err = Client::builder(WSDL)
            .wsdl_source(StaticSource("<definitions/>"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SoapError::Wsdl(WsdlError::MissingTargetNamespace)));
    }
}
