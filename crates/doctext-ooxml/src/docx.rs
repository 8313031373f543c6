//! DOCX paragraph extraction.
//!
//! Only body-level paragraphs (`w:body/w:p`) are emitted, in document order.
//! Paragraphs nested in tables, text boxes or content controls are not part
//! of the body paragraph sequence and are skipped.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use doctext_core::{BackendError, TextBackend};

use crate::package::Package;
use crate::{ElementStack, expect_root, path_ends_with, xml_error};

const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Default)]
pub struct DocxBackend;

impl DocxBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for DocxBackend {
    fn extract_units(&self, data: &[u8]) -> Result<Vec<String>, BackendError> {
        let mut package = Package::open(data)?;
        let part = package.main_part(DEFAULT_DOCUMENT_PART)?;
        let xml = package.read_part(&part)?;

        let paragraphs = parse_paragraphs(xml.as_bytes())
            .map_err(|e| BackendError::ExtractionError(format!("{}: {}", part, e)))?;
        tracing::debug!(paragraphs = paragraphs.len(), part = %part, "DOCX paragraphs extracted");
        Ok(paragraphs)
    }
}

/// Whether the innermost open element is a run that belongs directly to a
/// body paragraph, either plainly or through a hyperlink.
fn in_body_run(path: &[Vec<u8>]) -> bool {
    path_ends_with(path, &[b"body", b"p", b"r"])
        || path_ends_with(path, &[b"body", b"p", b"hyperlink", b"r"])
}

/// Text contributed by a non-`w:t` run child (tabs, breaks, hyphens).
fn run_symbol(e: &BytesStart) -> Option<char> {
    match e.local_name().as_ref() {
        b"tab" | b"ptab" => Some('\t'),
        b"cr" => Some('\n'),
        b"noBreakHyphen" => Some('-'),
        b"br" => {
            // Page and column breaks carry no text; only line breaks do
            let break_type = e
                .attributes()
                .flatten()
                .find(|a| a.key.local_name().as_ref() == b"type")
                .map(|a| a.value.into_owned());
            match break_type.as_deref() {
                None | Some(b"textWrapping") => Some('\n'),
                Some(_) => None,
            }
        }
        _ => None,
    }
}

/// Parse `word/document.xml`, returning each body paragraph's text.
pub fn parse_paragraphs<R: BufRead>(reader: R) -> Result<Vec<String>, String> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    let mut stack = ElementStack::default();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if stack.as_slice().is_empty() {
                    expect_root(e, b"document")?;
                }
                let name = e.local_name();
                if name.as_ref() == b"p" && stack.ends_with(&[b"body"]) {
                    current = Some(String::new());
                } else if in_body_run(stack.as_slice()) {
                    if let (Some(text), Some(c)) = (current.as_mut(), run_symbol(e)) {
                        text.push(c);
                    }
                }
                stack.push(name.as_ref());
            }

            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"p" && stack.ends_with(&[b"body"]) {
                    paragraphs.push(String::new());
                } else if in_body_run(stack.as_slice()) {
                    if let (Some(text), Some(c)) = (current.as_mut(), run_symbol(e)) {
                        text.push(c);
                    }
                }
            }

            Ok(Event::Text(ref e)) => {
                if stack.ends_with(&[b"r", b"t"]) && in_body_run(stack.parent()) {
                    if let Some(text) = current.as_mut() {
                        let unescaped = e.unescape().map_err(|err| err.to_string())?;
                        text.push_str(&unescaped);
                    }
                }
            }

            Ok(Event::CData(ref e)) => {
                if stack.ends_with(&[b"r", b"t"]) && in_body_run(stack.parent()) {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
            }

            Ok(Event::End(_)) => {
                let closed = stack.pop();
                if closed.as_deref() == Some(b"p".as_slice()) && stack.ends_with(&[b"body"]) {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }

            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(xml.error_position(), e)),
            _ => {}
        }

        buf.clear();
    }

    Ok(paragraphs)
}
