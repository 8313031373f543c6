//! Dispatcher tests.
//!
//! PDF behavior is checked through a stub backend so the assembly rules can
//! be pinned to exact page texts; DOCX and PPTX run through the real
//! backends on in-memory packages.

use std::sync::Arc;

use doctext_core::{DOCX_MIME, PDF_MIME, PPTX_MIME, UNSUPPORTED_MESSAGE};
use doctext_ingest::{
    BackendError, Dispatcher, ErrorKind, ExtractionError, FormatTag, TextBackend,
    UploadedDocument, extract,
};
use doctext_ooxml::fixtures::{self, FixtureShape};

/// Returns fixed units regardless of input.
struct StubBackend(Vec<&'static str>);

impl TextBackend for StubBackend {
    fn extract_units(&self, _data: &[u8]) -> Result<Vec<String>, BackendError> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

struct FailingBackend;

impl TextBackend for FailingBackend {
    fn extract_units(&self, _data: &[u8]) -> Result<Vec<String>, BackendError> {
        Err(BackendError::ExtractionError("xref table broken".into()))
    }
}

fn stub_pdf(pages: Vec<&'static str>) -> Dispatcher {
    Dispatcher::default().with_backend(FormatTag::Pdf, Arc::new(StubBackend(pages)))
}

#[test]
fn pdf_pages_concatenate_without_separator() {
    let doc = UploadedDocument::new("two-pages.pdf", PDF_MIME, b"%PDF-1.7".to_vec());
    let result = stub_pdf(vec!["Hello ", "World"]).extract(&doc).unwrap();
    assert_eq!(result.filename, "two-pages.pdf");
    assert_eq!(result.content, "Hello World");
}

#[test]
fn pdf_page_layout_kept_and_outer_whitespace_trimmed() {
    let doc = UploadedDocument::new("layout.pdf", PDF_MIME, Vec::new());
    let result = stub_pdf(vec!["\n  Title\nline\n", "next page\n\n"])
        .extract(&doc)
        .unwrap();
    assert_eq!(result.content, "Title\nline\nnext page");
}

#[test]
fn zero_page_pdf_is_empty_content() {
    let doc = UploadedDocument::new("empty.pdf", PDF_MIME, Vec::new());
    let result = stub_pdf(vec![]).extract(&doc).unwrap();
    assert_eq!(result.content, "");
}

#[test]
fn docx_paragraphs_newline_joined() {
    let data = fixtures::docx(&["Hello", "World"]).unwrap();
    let doc = UploadedDocument::new("hello.docx", DOCX_MIME, data);
    let result = extract(&doc).unwrap();
    assert_eq!(result.content, "Hello\nWorld");
}

#[test]
fn docx_all_empty_paragraphs_trim_to_empty() {
    let data = fixtures::docx(&["", "", ""]).unwrap();
    let doc = UploadedDocument::new("blank.docx", DOCX_MIME, data);
    assert_eq!(extract(&doc).unwrap().content, "");
}

#[test]
fn docx_inner_blank_paragraph_preserved() {
    let data = fixtures::docx(&["  Intro", "", "Outro  "]).unwrap();
    let doc = UploadedDocument::new("gap.docx", DOCX_MIME, data);
    assert_eq!(extract(&doc).unwrap().content, "Intro\n\nOutro");
}

#[test]
fn pptx_two_text_shapes() {
    let data = fixtures::pptx(&[vec![FixtureShape::Text("Title"), FixtureShape::Text("Body")]])
        .unwrap();
    let doc = UploadedDocument::new("deck.pptx", PPTX_MIME, data);
    assert_eq!(extract(&doc).unwrap().content, "Title\nBody");
}

#[test]
fn pptx_picture_leaves_no_separator() {
    let data = fixtures::pptx(&[vec![FixtureShape::Text("X"), FixtureShape::Picture]]).unwrap();
    let doc = UploadedDocument::new("pic.pptx", PPTX_MIME, data);
    assert_eq!(extract(&doc).unwrap().content, "X");
}

#[test]
fn pptx_bodiless_shape_leaves_blank_line() {
    let data = fixtures::pptx(&[vec![
        FixtureShape::Text("A"),
        FixtureShape::Blank,
        FixtureShape::Text("B"),
    ]])
    .unwrap();
    let doc = UploadedDocument::new("rect.pptx", PPTX_MIME, data);
    assert_eq!(extract(&doc).unwrap().content, "A\n\nB");
}

#[test]
fn pptx_empty_deck_is_empty_content() {
    let data = fixtures::pptx(&[]).unwrap();
    let doc = UploadedDocument::new("none.pptx", PPTX_MIME, data);
    assert_eq!(extract(&doc).unwrap().content, "");
}

#[test]
fn unsupported_types_rejected_regardless_of_bytes() {
    let docx = fixtures::docx(&["valid"]).unwrap();
    let cases: Vec<(&str, Vec<u8>)> = vec![
        ("text/plain", b"hello".to_vec()),
        ("application/msword", docx.clone()),
        ("APPLICATION/PDF", b"%PDF-1.4".to_vec()),
        ("application/pdf; charset=binary", Vec::new()),
        ("", Vec::new()),
        ("application/zip", docx),
    ];

    for (content_type, data) in cases {
        let doc = UploadedDocument::new("file", content_type, data);
        let err = extract(&doc).unwrap_err();
        assert_eq!(err, ExtractionError::Unsupported, "content type {content_type:?}");
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.message(), UNSUPPORTED_MESSAGE);
    }
}

#[test]
fn non_archive_docx_is_parse_failure() {
    let doc = UploadedDocument::new("broken.docx", DOCX_MIME, b"not a zip at all".to_vec());
    let err = extract(&doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
    assert!(!err.message().is_empty());
}

#[test]
fn truncated_pptx_is_parse_failure() {
    let mut data = fixtures::pptx(&[vec![FixtureShape::Text("cut")]]).unwrap();
    data.truncate(data.len() / 2);
    let doc = UploadedDocument::new("cut.pptx", PPTX_MIME, data);
    assert_eq!(extract(&doc).unwrap_err().kind(), ErrorKind::ParseFailure);
}

#[test]
fn backend_error_detail_surfaces_in_message() {
    let dispatcher = Dispatcher::default().with_backend(FormatTag::Pdf, Arc::new(FailingBackend));
    let doc = UploadedDocument::new("bad.pdf", PDF_MIME, Vec::new());
    let err = dispatcher.extract(&doc).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::ParseFailure("failed to extract text: xref table broken".into())
    );
}

#[test]
fn unbound_format_is_parse_failure() {
    let dispatcher = Dispatcher::empty();
    assert!(!dispatcher.supports(FormatTag::Docx));
    let doc = UploadedDocument::new("a.docx", DOCX_MIME, Vec::new());
    let err = dispatcher.extract(&doc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
    assert!(err.message().contains("DOCX"));
}

#[test]
fn default_dispatcher_supports_ooxml() {
    let dispatcher = Dispatcher::default();
    assert!(dispatcher.supports(FormatTag::Docx));
    assert!(dispatcher.supports(FormatTag::Pptx));
    assert!(!dispatcher.supports(FormatTag::Unsupported));
}

#[cfg(feature = "pdf")]
#[test]
fn garbage_pdf_is_parse_failure() {
    assert!(Dispatcher::default().supports(FormatTag::Pdf));
    let doc = UploadedDocument::new("junk.pdf", PDF_MIME, b"this is not a pdf".to_vec());
    assert_eq!(extract(&doc).unwrap_err().kind(), ErrorKind::ParseFailure);
}
