//! PPTX shape-text extraction.
//!
//! Slides are visited in presentation order (`p:sldIdLst`), and within each
//! slide the top-level shapes of `p:spTree` in tree order. Every `p:sp`
//! exposes text, empty when it has no `p:txBody`; pictures, graphic frames,
//! connectors and group shapes do not, and are skipped without leaving a
//! separator behind.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use doctext_core::{BackendError, TextBackend};

use crate::package::{Package, resolve_target};
use crate::{ElementStack, expect_root, path_ends_with, xml_error};

const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Soft line break inside a paragraph (`a:br`), rendered as a vertical tab.
const LINE_BREAK: char = '\u{b}';

#[derive(Debug, Default)]
pub struct PptxBackend;

impl PptxBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for PptxBackend {
    fn extract_units(&self, data: &[u8]) -> Result<Vec<String>, BackendError> {
        let mut package = Package::open(data)?;
        let presentation = package.main_part(DEFAULT_PRESENTATION_PART)?;

        let slide_parts = slide_parts(&mut package, &presentation)?;
        let mut units = Vec::new();
        for part in &slide_parts {
            let xml = package.read_part(part)?;
            let shapes = parse_slide_shapes(xml.as_bytes())
                .map_err(|e| BackendError::ExtractionError(format!("{}: {}", part, e)))?;
            units.extend(shapes);
        }

        tracing::debug!(
            slides = slide_parts.len(),
            shapes = units.len(),
            "PPTX shape text extracted"
        );
        Ok(units)
    }
}

/// Slide part names in presentation order.
fn slide_parts(package: &mut Package<'_>, presentation: &str) -> Result<Vec<String>, BackendError> {
    let xml = package.read_part(presentation)?;
    let slide_ids = parse_slide_ids(xml.as_bytes())
        .map_err(|e| BackendError::ExtractionError(format!("{}: {}", presentation, e)))?;
    if slide_ids.is_empty() {
        return Ok(Vec::new());
    }

    let targets: HashMap<String, String> = package
        .relationships(presentation)?
        .into_iter()
        .filter(|r| !r.external)
        .map(|r| (r.id, r.target))
        .collect();

    slide_ids
        .iter()
        .map(|id| {
            targets
                .get(id)
                .map(|target| resolve_target(presentation, target))
                .ok_or_else(|| {
                    BackendError::ExtractionError(format!(
                        "{}: slide relationship {} not found",
                        presentation, id
                    ))
                })
        })
        .collect()
}

/// Parse `ppt/presentation.xml`, returning the relationship id of each slide
/// in `p:sldIdLst` order.
pub fn parse_slide_ids<R: BufRead>(reader: R) -> Result<Vec<String>, String> {
    let mut xml = Reader::from_reader(reader);
    let mut buf = Vec::with_capacity(1024);
    let mut stack = ElementStack::default();
    let mut ids = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if stack.as_slice().is_empty() {
                    expect_root(e, b"presentation")?;
                }
                if stack.ends_with(&[b"sldIdLst"]) {
                    ids.extend(slide_rel_id(e));
                }
                stack.push(e.local_name().as_ref());
            }
            Ok(Event::Empty(ref e)) => {
                if stack.as_slice().is_empty() {
                    expect_root(e, b"presentation")?;
                }
                if stack.ends_with(&[b"sldIdLst"]) {
                    ids.extend(slide_rel_id(e));
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(xml.error_position(), e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

/// The relationship id of a `p:sldId` element.
///
/// The numeric `id` attribute is unprefixed; the relationship id is the
/// namespaced `r:id`.
fn slide_rel_id(e: &BytesStart) -> Option<String> {
    if e.local_name().as_ref() != b"sldId" {
        return None;
    }
    e.attributes()
        .flatten()
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id")
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Text collected for one top-level `p:sp`.
#[derive(Default)]
struct ShapeText {
    paragraphs: Vec<String>,
}

impl ShapeText {
    fn push_str(&mut self, s: &str) {
        if let Some(last) = self.paragraphs.last_mut() {
            last.push_str(s);
        }
    }

    fn into_text(self) -> String {
        self.paragraphs.join("\n")
    }
}

/// Element paths within a slide, from `p:cSld` down.
const SHAPE_TREE: &[&[u8]] = &[b"cSld", b"spTree"];
const TOP_TEXT_BODY: &[&[u8]] = &[b"cSld", b"spTree", b"sp", b"txBody"];
const TOP_PARAGRAPH: &[&[u8]] = &[b"cSld", b"spTree", b"sp", b"txBody", b"p"];

/// Whether the innermost open element is `a:t` inside a run or field of a
/// top-level shape paragraph.
fn in_shape_text(stack: &ElementStack) -> bool {
    if !stack.ends_with(&[b"t"]) {
        return false;
    }
    let parent = stack.parent();
    match parent.split_last() {
        Some((container, rest)) if container.as_slice() == b"r" || container.as_slice() == b"fld" => {
            path_ends_with(rest, TOP_PARAGRAPH)
        }
        _ => false,
    }
}

/// Parse one slide part, returning the text of each top-level `p:sp` in
/// tree order. Paragraphs within a shape are joined with `'\n'`.
pub fn parse_slide_shapes<R: BufRead>(reader: R) -> Result<Vec<String>, String> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    let mut stack = ElementStack::default();
    let mut shapes = Vec::new();
    let mut current: Option<ShapeText> = None;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"sp" if stack.ends_with(SHAPE_TREE) => {
                        current = Some(ShapeText::default());
                    }
                    b"p" if stack.ends_with(TOP_TEXT_BODY) => {
                        if let Some(shape) = current.as_mut() {
                            shape.paragraphs.push(String::new());
                        }
                    }
                    _ => {}
                }
                stack.push(name.as_ref());
            }

            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                // A bodiless `<p:sp/>` still counts, as an empty unit
                b"sp" if stack.ends_with(SHAPE_TREE) => {
                    shapes.push(String::new());
                }
                b"p" if stack.ends_with(TOP_TEXT_BODY) => {
                    if let Some(shape) = current.as_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                b"br" if stack.ends_with(TOP_PARAGRAPH) => {
                    if let Some(shape) = current.as_mut() {
                        shape.push_str(&LINE_BREAK.to_string());
                    }
                }
                _ => {}
            },

            Ok(Event::Text(ref e)) => {
                if in_shape_text(&stack) {
                    if let Some(shape) = current.as_mut() {
                        let unescaped = e.unescape().map_err(|err| err.to_string())?;
                        shape.push_str(&unescaped);
                    }
                }
            }

            Ok(Event::CData(ref e)) => {
                if in_shape_text(&stack) {
                    if let Some(shape) = current.as_mut() {
                        shape.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
            }

            Ok(Event::End(_)) => {
                let closed = stack.pop();
                if closed.as_deref() == Some(b"sp".as_slice())
                    && stack.ends_with(SHAPE_TREE)
                {
                    if let Some(shape) = current.take() {
                        shapes.push(shape.into_text());
                    }
                }
            }

            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(xml.error_position(), e)),
            _ => {}
        }

        buf.clear();
    }

    Ok(shapes)
}
