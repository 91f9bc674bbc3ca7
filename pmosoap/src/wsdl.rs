//! WSDL retrieval and the part of its definitions the client relies on.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use ureq::Agent;
use xmltree::{Element, XMLNode};

use crate::config::WsdlConfig;

#[derive(Debug, Error)]
pub enum WsdlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] xmltree::ParseError),

    #[error("expected <definitions> root element, found <{0}>")]
    NotAWsdl(String),

    #[error("WSDL definitions have no targetNamespace")]
    MissingTargetNamespace,
}

/// Service definitions read from a WSDL document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    pub target_namespace: String,
    pub name: Option<String>,
    pub services: Vec<WsdlService>,
    /// Operation names declared by the port types, in document order.
    pub operations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WsdlService {
    pub name: String,
    pub ports: Vec<WsdlPort>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WsdlPort {
    pub name: String,
    pub binding: Option<String>,
    /// `location` of the port's `soap:address`.
    pub address: Option<String>,
}

impl Definitions {
    pub fn new(target_namespace: impl Into<String>) -> Self {
        Self {
            target_namespace: target_namespace.into(),
            ..Self::default()
        }
    }

    /// Parses a WSDL 1.1 document.
    pub fn parse(xml: &[u8]) -> Result<Self, WsdlError> {
        let root = Element::parse(xml)?;
        if root.name != "definitions" {
            return Err(WsdlError::NotAWsdl(root.name));
        }

        let target_namespace = root
            .attributes
            .get("targetNamespace")
            .filter(|ns| !ns.is_empty())
            .cloned()
            .ok_or(WsdlError::MissingTargetNamespace)?;

        let services = children(&root, "service")
            .map(|service| WsdlService {
                name: attribute(service, "name").unwrap_or_default(),
                ports: children(service, "port")
                    .map(|port| WsdlPort {
                        name: attribute(port, "name").unwrap_or_default(),
                        binding: attribute(port, "binding"),
                        address: port
                            .get_child("address")
                            .and_then(|address| attribute(address, "location")),
                    })
                    .collect(),
            })
            .collect();

        let operations = children(&root, "portType")
            .flat_map(|port_type| children(port_type, "operation"))
            .filter_map(|operation| attribute(operation, "name"))
            .collect();

        Ok(Self {
            target_namespace,
            name: attribute(&root, "name"),
            services,
            operations,
        })
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.iter().any(|op| op == name)
    }
}

fn children<'a>(parent: &'a Element, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    parent
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .filter(move |e| e.name == name)
}

fn attribute(element: &Element, name: &str) -> Option<String> {
    element.attributes.get(name).cloned()
}

/// Where client construction gets its service definitions from.
pub trait DefinitionsSource: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Definitions, WsdlError>;
}

/// Fetches WSDL documents over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWsdlSource {
    agent: Agent,
}

impl HttpWsdlSource {
    pub fn new(config: &WsdlConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .user_agent(config.user_agent.as_str())
            .build()
            .into();
        Self { agent }
    }
}

impl Default for HttpWsdlSource {
    fn default() -> Self {
        Self::new(&WsdlConfig::default())
    }
}

impl DefinitionsSource for HttpWsdlSource {
    fn fetch(&self, location: &str) -> Result<Definitions, WsdlError> {
        debug!(location, "Fetching WSDL definitions");
        let mut response = self.agent.get(location).call()?;
        let body = response.body_mut().read_to_vec()?;
        Definitions::parse(&body)
    }
}
