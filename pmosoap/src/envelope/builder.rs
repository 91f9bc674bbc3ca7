//! Construction des enveloppes SOAP de requête

use std::sync::Arc;

use super::encoder::encode_tokens;
use super::token::Token;
use super::{BODY, ENVELOPE, HEADER, SOAP_ENVELOPE_NS, XSD_NS, XSI_NS};
use crate::errors::SoapError;
use crate::header::SoapHeader;
use crate::params::Params;

/// Builds the envelope of a single method call.
///
/// Tokens are accumulated in a vector owned by each `tokens()` call, so
/// builders running on different threads never share state.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeBuilder<'a> {
    method: &'a str,
    namespace: &'a str,
    headers: &'a [Arc<dyn SoapHeader>],
    params: Option<&'a Params>,
}

impl<'a> EnvelopeBuilder<'a> {
    pub fn new(method: &'a str, namespace: &'a str) -> Self {
        Self {
            method,
            namespace,
            headers: &[],
            params: None,
        }
    }

    pub fn headers(mut self, headers: &'a [Arc<dyn SoapHeader>]) -> Self {
        self.headers = headers;
        self
    }

    pub fn params(mut self, params: &'a Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Ordered token stream for the whole envelope.
    pub fn tokens(&self) -> Result<Vec<Token>, SoapError> {
        let mut tokens = vec![Token::start_with(
            ENVELOPE,
            &[
                ("xmlns:xsi", XSI_NS),
                ("xmlns:xsd", XSD_NS),
                ("xmlns:soap", SOAP_ENVELOPE_NS),
            ],
        )];

        if !self.headers.is_empty() {
            tokens.push(Token::start(HEADER));
            for header in self.headers {
                let name = header.element_name();
                tokens.push(Token::start_with(name, &[("xmlns", self.namespace)]));
                for (field, value) in header.fields() {
                    tokens.extend(Token::text_element(&field, &value));
                }
                tokens.push(Token::end(name));
            }
            tokens.push(Token::end(HEADER));
        }

        if self.method.is_empty() || self.namespace.is_empty() {
            return Err(SoapError::MissingMethodOrNamespace);
        }

        tokens.push(Token::start(BODY));
        tokens.push(Token::start_with(self.method, &[("xmlns", self.namespace)]));
        if let Some(params) = self.params {
            for (key, value) in params.elements() {
                tokens.extend(Token::text_element(key, value));
            }
        }
        tokens.push(Token::end(self.method));
        tokens.push(Token::end(BODY));
        tokens.push(Token::end(ENVELOPE));

        Ok(tokens)
    }

    /// Serialized envelope, without XML declaration.
    pub fn build(&self) -> Result<Vec<u8>, SoapError> {
        let tokens = self.tokens()?;
        encode_tokens(&tokens)
    }
}
