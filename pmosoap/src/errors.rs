use thiserror::Error;

use crate::response::Response;
use crate::transport::TransportError;
use crate::wsdl::WsdlError;

/// Coarse classification of a [`SoapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed WSDL location or failed WSDL retrieval.
    Configuration,
    /// Missing method, target namespace or service definitions.
    Precondition,
    /// The envelope could not be serialized.
    Encoding,
    /// The HTTP exchange did not complete.
    Transport,
    /// The response envelope or body could not be decoded.
    Decode,
    /// The remote service answered with a SOAP Fault.
    Fault,
    /// The caller handed an unusable response to `unmarshal`.
    Misuse,
}

#[derive(Error, Debug)]
pub enum SoapError {
    #[error("invalid WSDL location: {0}")]
    InvalidLocation(#[from] url::ParseError),

    #[error("WSDL retrieval failed: {0}")]
    Wsdl(#[from] WsdlError),

    #[error("service definitions are missing")]
    MissingDefinitions,

    #[error("method or namespace is empty")]
    MissingMethodOrNamespace,

    #[error("XML encoding failed: {0}")]
    Encoding(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("malformed SOAP envelope: {message}")]
    MalformedEnvelope { message: String, partial: Response },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("[{code}]: {description}")]
    Fault { code: String, description: String },

    #[error("response is nil")]
    NilResponse,

    #[error("response body is empty")]
    EmptyBody,
}

impl SoapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SoapError::InvalidLocation(_) | SoapError::Wsdl(_) => ErrorKind::Configuration,
            SoapError::MissingDefinitions | SoapError::MissingMethodOrNamespace => {
                ErrorKind::Precondition
            }
            SoapError::Encoding(_) => ErrorKind::Encoding,
            SoapError::Transport(_) => ErrorKind::Transport,
            SoapError::MalformedEnvelope { .. } | SoapError::Decode(_) => ErrorKind::Decode,
            SoapError::Fault { .. } => ErrorKind::Fault,
            SoapError::NilResponse | SoapError::EmptyBody => ErrorKind::Misuse,
        }
    }

    /// Whatever was captured from the envelope before decoding stopped.
    pub fn partial_response(&self) -> Option<&Response> {
        match self {
            SoapError::MalformedEnvelope { partial, .. } => Some(partial),
            _ => None,
        }
    }

    pub(crate) fn encoding(message: impl std::fmt::Display) -> Self {
        SoapError::Encoding(message.to_string())
    }

    pub(crate) fn decode(message: impl std::fmt::Display) -> Self {
        SoapError::Decode(message.to_string())
    }
}
