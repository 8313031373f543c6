//! Text extraction for Office Open XML documents (DOCX and PPTX).
//!
//! Both formats are ZIP packages of XML parts. [`package::Package`] handles
//! the container and relationship resolution; the format modules walk the
//! relevant parts with `quick-xml` events and return text units in document
//! order for [`doctext_core::assemble`] to join.

use quick_xml::events::BytesStart;

pub mod docx;
#[cfg(feature = "test-fixtures")]
pub mod fixtures;
pub mod package;
pub mod pptx;

pub use docx::DocxBackend;
pub use pptx::PptxBackend;

/// Local names of the currently open XML elements, outermost first.
///
/// Namespace prefixes are dropped, so `w:p` and `a:p` are both `p`; callers
/// disambiguate by looking at ancestors.
#[derive(Debug, Default)]
pub(crate) struct ElementStack {
    names: Vec<Vec<u8>>,
}

impl ElementStack {
    pub(crate) fn push(&mut self, local_name: &[u8]) {
        self.names.push(local_name.to_vec());
    }

    pub(crate) fn pop(&mut self) -> Option<Vec<u8>> {
        self.names.pop()
    }

    pub(crate) fn as_slice(&self) -> &[Vec<u8>] {
        &self.names
    }

    /// Everything but the innermost element.
    pub(crate) fn parent(&self) -> &[Vec<u8>] {
        match self.names.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    pub(crate) fn ends_with(&self, suffix: &[&[u8]]) -> bool {
        path_ends_with(&self.names, suffix)
    }
}

pub(crate) fn path_ends_with(path: &[Vec<u8>], suffix: &[&[u8]]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(name, want)| name.as_slice() == *want)
}

/// Fail unless a part's root element has the expected local name.
pub(crate) fn expect_root(e: &BytesStart, expected: &[u8]) -> Result<(), String> {
    let found = e.local_name();
    if found.as_ref() == expected {
        Ok(())
    } else {
        Err(format!(
            "expected <{}> root element, found <{}>",
            String::from_utf8_lossy(expected),
            String::from_utf8_lossy(found.as_ref())
        ))
    }
}

pub(crate) fn xml_error(position: u64, e: quick_xml::Error) -> String {
    format!("malformed XML at byte {}: {}", position, e)
}
