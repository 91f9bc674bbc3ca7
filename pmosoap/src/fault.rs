//! SOAP Faults renvoyés par le service distant

use serde::Deserialize;

/// Erreur SOAP (Fault)
///
/// Only the fields of a SOAP 1.1 fault the client acts upon are decoded;
/// `detail` content is left to the caller, who can read the raw body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Fault {
    /// Code d'erreur (ex: "soap:Client")
    #[serde(rename = "faultcode", default)]
    pub code: String,

    /// Description de l'erreur
    #[serde(rename = "faultstring", default)]
    pub description: String,

    #[serde(rename = "faultactor", default)]
    pub actor: Option<String>,
}

impl Fault {
    /// Decodes `body` as a fault; anything that is not one yields `None`.
    pub fn from_body(body: &str) -> Option<Fault> {
        quick_xml::de::from_str::<Fault>(body.trim())
            .ok()
            .filter(|fault| !fault.code.is_empty())
    }
}
