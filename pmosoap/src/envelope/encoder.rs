//! Sérialisation d'un flux de jetons avec quick-xml

use std::borrow::Cow;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::token::Token;
use crate::errors::SoapError;

/// Writes `tokens` as compact XML.
///
/// Element names are checked the way a token encoder must: a start tag needs
/// a name, and every end tag has to close the innermost open element.
pub fn encode_tokens(tokens: &[Token]) -> Result<Vec<u8>, SoapError> {
    let mut writer = Writer::new(Vec::new());
    let mut open: Vec<&str> = Vec::new();

    for token in tokens {
        match token {
            Token::Start { name, attributes } => {
                if name.is_empty() {
                    return Err(SoapError::encoding("start tag with no name"));
                }
                let mut start = BytesStart::new(name.as_str());
                for (key, value) in attributes {
                    start.push_attribute((key.as_str(), xml_chars(value).as_ref()));
                }
                writer
                    .write_event(Event::Start(start))
                    .map_err(SoapError::encoding)?;
                open.push(name);
            }
            Token::Text(value) => {
                writer
                    .write_event(Event::Text(BytesText::new(&xml_chars(value))))
                    .map_err(SoapError::encoding)?;
            }
            Token::End { name } => match open.pop() {
                Some(expected) if expected == name.as_str() => {
                    writer
                        .write_event(Event::End(BytesEnd::new(name.as_str())))
                        .map_err(SoapError::encoding)?;
                }
                Some(expected) => {
                    return Err(SoapError::encoding(format!(
                        "end tag </{name}> does not match start tag <{expected}>"
                    )));
                }
                None => {
                    return Err(SoapError::encoding(format!(
                        "end tag </{name}> without start tag"
                    )));
                }
            },
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(SoapError::encoding(format!("unclosed tag <{unclosed}>")));
    }

    Ok(writer.into_inner())
}

/// Replaces the characters XML 1.0 cannot carry, even escaped, with U+FFFD.
fn xml_chars(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(
            value
                .chars()
                .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
                .collect(),
        )
    }
}

// Production `Char` de XML 1.0 (les surrogates ne sont pas des `char`)
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_nested_elements() {
        let mut tokens = vec![Token::start_with("root", &[("xmlns", "urn:test")])];
        tokens.extend(Token::text_element("child", "value"));
        tokens.push(Token::end("root"));

        let xml = encode_tokens(&tokens).unwrap();
        assert_eq!(
            String::from_utf8(xml).unwrap(),
            r#"<root xmlns="urn:test"><child>value</child></root>"#
        );
    }

    #[test]
    fn test_start_tag_with_no_name() {
        let err = encode_tokens(&[Token::start(""), Token::end("")]).unwrap_err();
        assert_eq!(err.to_string(), "XML encoding failed: start tag with no name");
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = encode_tokens(&[Token::start("a"), Token::end("b")]).unwrap_err();
        assert!(matches!(err, SoapError::Encoding(_)));

        let err = encode_tokens(&[Token::end("a")]).unwrap_err();
        assert!(matches!(err, SoapError::Encoding(_)));
    }

    #[test]
    fn test_forbidden_characters_are_replaced() {
        let tokens = [
            Token::start_with("root", &[("note", "a\u{1}b")]),
            Token::text("x\u{0}y\u{FFFE}z\tok"),
            Token::end("root"),
        ];

        let xml = String::from_utf8(encode_tokens(&tokens).unwrap()).unwrap();
        assert_eq!(xml, "<root note=\"a\u{FFFD}b\">x\u{FFFD}y\u{FFFD}z\tok</root>");
    }

    #[test]
    fn test_unclosed_tag() {
        let err = encode_tokens(&[Token::start("a")]).unwrap_err();
        assert!(matches!(err, SoapError::Encoding(ref msg) if msg.contains("<a>")));
    }
}
