//! MuPDF extraction over small PDFs assembled in memory.

use doctext_core::{FormatTag, TextBackend, assemble};
use doctext_pdf_mupdf::MupdfBackend;

/// Build a PDF with one Helvetica text line per page. `None` gives a page
/// with an empty content stream.
fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        let content = match text {
            Some(text) => format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text),
            None => String::new(),
        };
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.extend_from_slice(xref.as_bytes());
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    pdf
}

#[test]
fn two_pages_yield_one_unit_each() {
    let data = pdf_with_pages(&[Some("Hello"), Some("World")]);
    let units = MupdfBackend::new().extract_units(&data).unwrap();

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].trim(), "Hello");
    assert_eq!(units[1].trim(), "World");
    assert!(units[0].ends_with('\n'));
}

#[test]
fn pages_assemble_without_extra_separator() {
    let data = pdf_with_pages(&[Some("Hello"), Some("World")]);
    let units = MupdfBackend::new().extract_units(&data).unwrap();

    // Each line already ends in '\n', so pages join as consecutive lines
    assert_eq!(assemble(FormatTag::Pdf, units), "Hello\nWorld");
}

#[test]
fn zero_page_document_is_empty() {
    let data = pdf_with_pages(&[]);
    let units = MupdfBackend::new().extract_units(&data).unwrap();

    assert!(units.is_empty());
    assert_eq!(assemble(FormatTag::Pdf, units), "");
}

#[test]
fn page_without_text_is_empty_unit() {
    let data = pdf_with_pages(&[None, Some("Back")]);
    let units = MupdfBackend::new().extract_units(&data).unwrap();

    assert_eq!(units.len(), 2);
    assert_eq!(units[0], "");
    assert_eq!(assemble(FormatTag::Pdf, units), "Back");
}
