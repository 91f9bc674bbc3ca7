//! # Module enveloppe - SOAP 1.1
//!
//! Construction des enveloppes de requête et découpage des enveloppes de
//! réponse.
//!
//! ## Fonctionnalités
//!
//! - ✅ Flux de jetons ordonné Envelope / Header / Body
//! - ✅ En-têtes typés via [`SoapHeader`](crate::SoapHeader)
//! - ✅ Paramètres triés, clés vides ignorées
//! - ✅ Extraction brute des régions Header et Body d'une réponse
//!
//! ## Example
//!
//! ```
//! use pmosoap::Params;
//! use pmosoap::envelope::EnvelopeBuilder;
//!
//! let params = Params::from([("UserId", "7")]);
//! let xml = EnvelopeBuilder::new("GetUser", "http://example.com/users")
//!     .params(&params)
//!     .build()
//!     .unwrap();
//! let xml = String::from_utf8(xml).unwrap();
//! assert!(xml.contains(r#"<GetUser xmlns="http://example.com/users"><UserId>7</UserId></GetUser>"#));
//! ```

mod builder;
mod decoder;
mod encoder;
mod token;

pub use builder::EnvelopeBuilder;
pub use decoder::split_envelope;
pub use encoder::encode_tokens;
pub use token::Token;

/// Déclaration XML placée devant chaque requête.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

pub(crate) const ENVELOPE: &str = "soap:Envelope";
pub(crate) const HEADER: &str = "soap:Header";
pub(crate) const BODY: &str = "soap:Body";
