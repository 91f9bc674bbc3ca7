//! Jetons XML produits par le constructeur d'enveloppe

/// One step of the XML token stream written for an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    End {
        name: String,
    },
}

impl Token {
    pub fn start(name: impl Into<String>) -> Self {
        Token::Start {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn start_with(name: impl Into<String>, attributes: &[(&str, &str)]) -> Self {
        Token::Start {
            name: name.into(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Token::Text(value.into())
    }

    pub fn end(name: impl Into<String>) -> Self {
        Token::End { name: name.into() }
    }

    /// `<name>value</name>` as three tokens.
    pub fn text_element(name: &str, value: &str) -> [Token; 3] {
        [Token::start(name), Token::text(value), Token::end(name)]
    }
}
