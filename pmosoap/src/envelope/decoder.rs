//! Découpage d'une enveloppe de réponse en régions Header / Body

use std::ops::Range;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::trace;

use crate::errors::SoapError;
use crate::response::Response;

/// Splits a raw SOAP response into the inner bytes of its Header and Body.
///
/// Elements are matched by local name, whatever their prefix. A missing
/// Header is not an error. On failure the error carries what had been
/// captured so far.
pub fn split_envelope(xml: &[u8]) -> Result<Response, SoapError> {
    let mut header: Option<Vec<u8>> = None;
    let mut body: Option<Vec<u8>> = None;

    match scan_envelope(xml, &mut header, &mut body) {
        Ok(()) => Ok(Response::new(
            header.unwrap_or_default(),
            body.unwrap_or_default(),
        )),
        Err(message) => Err(SoapError::MalformedEnvelope {
            message,
            partial: Response::new(header.unwrap_or_default(), body.unwrap_or_default()),
        }),
    }
}

fn scan_envelope(
    xml: &[u8],
    header: &mut Option<Vec<u8>>,
    body: &mut Option<Vec<u8>>,
) -> Result<(), String> {
    let mut reader = Reader::from_reader(xml);

    // Root element
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                if e.local_name().as_ref() != b"Envelope" {
                    return Err(format!(
                        "expected element <Envelope> but have <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ));
                }
                break;
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() != b"Envelope" {
                    return Err(format!(
                        "expected element <Envelope> but have <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ));
                }
                return Ok(());
            }
            Event::Eof => return Err("unexpected end of input".to_string()),
            _ => {}
        }
    }

    // Envelope children
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                let span = reader.read_to_end(e.name()).map_err(|e| e.to_string())?;
                let slot = match e.local_name().as_ref() {
                    b"Header" => &mut *header,
                    b"Body" => &mut *body,
                    _ => continue,
                };
                if slot.is_none() {
                    *slot = Some(xml[to_range(span)?].to_vec());
                }
            }
            Event::Empty(e) => {
                let slot = match e.local_name().as_ref() {
                    b"Header" => &mut *header,
                    b"Body" => &mut *body,
                    _ => continue,
                };
                slot.get_or_insert_with(Vec::new);
            }
            Event::End(_) => break,
            Event::Eof => return Err("unexpected end of input inside Envelope".to_string()),
            _ => {}
        }
    }

    trace!(
        header_len = header.as_ref().map_or(0, Vec::len),
        body_len = body.as_ref().map_or(0, Vec::len),
        "SOAP envelope split"
    );
    Ok(())
}

fn to_range<T: TryInto<usize>>(span: Range<T>) -> Result<Range<usize>, String> {
    let start = span
        .start
        .try_into()
        .map_err(|_| "span start out of range".to_string())?;
    let end = span
        .end
        .try_into()
        .map_err(|_| "span end out of range".to_string())?;
    Ok(start..end)
}
