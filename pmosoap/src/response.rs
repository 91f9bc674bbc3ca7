//! Raw response regions and fault-aware decoding.

use serde::de::DeserializeOwned;

use crate::errors::SoapError;
use crate::fault::Fault;

/// Inner content of the Header and Body of a response envelope, unparsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    header: Vec<u8>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(header: Vec<u8>, body: Vec<u8>) -> Self {
        Self { header, body }
    }

    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The fault carried by the body, if it holds one with a non-empty code.
    pub fn fault(&self) -> Option<Fault> {
        std::str::from_utf8(&self.body).ok().and_then(Fault::from_body)
    }

    /// Decodes the body into `T`.
    ///
    /// A body holding a SOAP Fault is reported as [`SoapError::Fault`] and
    /// `T` is never decoded.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T, SoapError> {
        if self.body.is_empty() {
            return Err(SoapError::EmptyBody);
        }

        if let Some(fault) = self.fault() {
            return Err(SoapError::Fault {
                code: fault.code,
                description: fault.description,
            });
        }

        decode_region(&self.body)
    }

    /// Like [`Response::unmarshal`], but writes into `target`, which is left
    /// untouched on any error.
    pub fn unmarshal_into<T: DeserializeOwned>(&self, target: &mut T) -> Result<(), SoapError> {
        *target = self.unmarshal()?;
        Ok(())
    }

    /// Decodes the Header region into `T`.
    pub fn unmarshal_header<T: DeserializeOwned>(&self) -> Result<T, SoapError> {
        if self.header.is_empty() {
            return Err(SoapError::decode("response has no header"));
        }
        decode_region(&self.header)
    }
}

/// Decodes an optional response, reporting a missing one as
/// [`SoapError::NilResponse`].
pub fn unmarshal_response<T: DeserializeOwned>(response: Option<&Response>) -> Result<T, SoapError> {
    response.ok_or(SoapError::NilResponse)?.unmarshal()
}

fn decode_region<T: DeserializeOwned>(region: &[u8]) -> Result<T, SoapError> {
    let text = std::str::from_utf8(region).map_err(SoapError::decode)?;
    quick_xml::de::from_str(text.trim()).map_err(SoapError::decode)
}
