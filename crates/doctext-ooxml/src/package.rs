//! Read access to an OOXML package (the ZIP container behind DOCX and PPTX).
//!
//! Parts are addressed by their ZIP entry name without a leading slash, e.g.
//! `word/document.xml`. Relationship targets are resolved against the
//! directory of the part that owns them.

use std::io::{BufRead, Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;
use zip::result::ZipError;

use doctext_core::BackendError;

/// Relationship type suffix marking a package's main document part.
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// One `<Relationship>` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// `TargetMode="External"` targets are URLs, not package parts.
    pub external: bool,
}

pub struct Package<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> Package<'a> {
    pub fn open(data: &'a [u8]) -> Result<Self, BackendError> {
        let archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| BackendError::OpenError(format!("not an OOXML package: {}", e)))?;
        Ok(Self { archive })
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read a part as UTF-8 text.
    pub fn read_part(&mut self, name: &str) -> Result<String, BackendError> {
        let mut file = match self.archive.by_name(name) {
            Ok(f) => f,
            Err(ZipError::FileNotFound) => {
                return Err(BackendError::OpenError(format!("missing part {}", name)));
            }
            Err(e) => {
                return Err(BackendError::OpenError(format!(
                    "failed to read part {}: {}",
                    name, e
                )));
            }
        };

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| BackendError::ExtractionError(format!("{}: {}", name, e)))?;
        Ok(content)
    }

    /// Relationships owned by `part` (an empty list if it has no `.rels`).
    pub fn relationships(&mut self, part: &str) -> Result<Vec<Relationship>, BackendError> {
        let rels = rels_path_for(part);
        if !self.has_part(&rels) {
            return Ok(Vec::new());
        }
        let xml = self.read_part(&rels)?;
        parse_relationships(xml.as_bytes())
            .map_err(|e| BackendError::ExtractionError(format!("{}: {}", rels, e)))
    }

    /// Locate the main document part through the package-level relationships,
    /// falling back to `default` for packages that omit `_rels/.rels`.
    pub fn main_part(&mut self, default: &str) -> Result<String, BackendError> {
        let found = self
            .relationships("")?
            .into_iter()
            .find(|r| !r.external && r.rel_type.ends_with(OFFICE_DOCUMENT_REL))
            .map(|r| resolve_target("", &r.target));

        Ok(found.unwrap_or_else(|| default.to_string()))
    }
}

/// `.rels` location for a part: `word/document.xml` → `word/_rels/document.xml.rels`.
/// The empty string names the package root, whose rels live at `_rels/.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that owns the relationship.
///
/// Absolute targets (`/ppt/slides/slide1.xml`) drop the leading slash;
/// relative ones are joined to the source part's directory with `.` and `..`
/// segments collapsed.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let base_dir = source_part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Parse the `<Relationship>` entries of a `.rels` part.
pub fn parse_relationships<R: BufRead>(reader: R) -> Result<Vec<Relationship>, String> {
    let mut xml = Reader::from_reader(reader);
    let mut buf = Vec::with_capacity(1024);
    let mut rels = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel = Relationship {
                    id: String::new(),
                    rel_type: String::new(),
                    target: String::new(),
                    external: false,
                };
                for attr in e.attributes().flatten() {
                    let value = attr
                        .decode_and_unescape_value(xml.decoder())
                        .map_err(|err| err.to_string())?
                        .into_owned();
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        b"TargetMode" => rel.external = value == "External",
                        _ => {}
                    }
                }
                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed XML at byte {}: {}",
                    xml.error_position(),
                    e
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}
