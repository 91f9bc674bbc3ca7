//! En-têtes SOAP fournis par l'appelant.
//!
//! Chaque en-tête devient un élément enfant de `soap:Header`, nommé d'après
//! son type, et chacun de ses champs devient un sous-élément texte, dans
//! l'ordre de déclaration.

use std::fmt;

/// A value that can be written as a child of `soap:Header`.
pub trait SoapHeader: Send + Sync {
    /// Local name of the header element, usually the type name.
    fn element_name(&self) -> &str;

    /// Field name and string value pairs, in declaration order.
    fn fields(&self) -> Vec<(String, String)>;
}

impl fmt::Debug for dyn SoapHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoapHeader")
            .field("element_name", &self.element_name())
            .field("fields", &self.fields())
            .finish()
    }
}

/// Header whose name and fields are only known at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericHeader {
    name: String,
    fields: Vec<(String, String)>,
}

impl GenericHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field; fields keep the order in which they were added.
    pub fn field(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.fields.push((name.into(), value.to_string()));
        self
    }
}

impl SoapHeader for GenericHeader {
    fn element_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<(String, String)> {
        self.fields.clone()
    }
}

/// Implémente [`SoapHeader`] pour une structure.
///
/// Le nom de l'élément est le nom du type. Chaque champ listé est écrit dans
/// l'ordre donné, sa valeur étant obtenue via `Display`. Un champ peut être
/// renommé sur le fil avec `champ => "NomXml"`.
///
/// # Syntaxe
///
/// ```ignore
/// soap_header!(Type { champ1, champ2 => "Champ2", ... });
/// ```
///
/// # Examples
///
/// ```
/// use pmosoap::{SoapHeader, soap_header};
///
/// struct AuthHeader {
///     user: String,
///     token: String,
/// }
///
/// soap_header!(AuthHeader { user => "User", token => "Token" });
///
/// let header = AuthHeader { user: "bob".into(), token: "abc".into() };
/// assert_eq!(header.element_name(), "AuthHeader");
/// assert_eq!(
///     header.fields(),
///     vec![("User".to_string(), "bob".to_string()), ("Token".to_string(), "abc".to_string())]
/// );
/// ```
#[macro_export]
macro_rules! soap_header {
    (@name $field:ident) => {
        stringify!($field)
    };
    (@name $field:ident $wire:literal) => {
        $wire
    };
    ($ty:ident { $($field:ident $(=> $wire:literal)?),* $(,)? }) => {
        impl $crate::SoapHeader for $ty {
            fn element_name(&self) -> &str {
                stringify!($ty)
            }

            fn fields(&self) -> Vec<(String, String)> {
                vec![
                    $((
                        $crate::soap_header!(@name $field $($wire)?).to_string(),
                        self.$field.to_string(),
                    )),*
                ]
            }
        }
    };
}
