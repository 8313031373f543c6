pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Document format selected from a declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Pdf,
    Docx,
    Pptx,
    Unsupported,
}

/// Map a declared content type to a [`FormatTag`].
///
/// Exact, case-sensitive match. Parameters such as `; charset=...` are not
/// stripped, so `"application/pdf; x=y"` is unsupported.
pub fn classify(content_type: &str) -> FormatTag {
    match content_type {
        PDF_MIME => FormatTag::Pdf,
        DOCX_MIME => FormatTag::Docx,
        PPTX_MIME => FormatTag::Pptx,
        _ => FormatTag::Unsupported,
    }
}

impl FormatTag {
    /// The supported formats, in the order they are documented.
    pub const SUPPORTED: [FormatTag; 3] = [FormatTag::Pdf, FormatTag::Docx, FormatTag::Pptx];

    pub fn mime(self) -> Option<&'static str> {
        match self {
            FormatTag::Pdf => Some(PDF_MIME),
            FormatTag::Docx => Some(DOCX_MIME),
            FormatTag::Pptx => Some(PPTX_MIME),
            FormatTag::Unsupported => None,
        }
    }

    /// Guess a format from a file extension (case-insensitive, without the dot).
    ///
    /// Only for callers that have a path but no declared type, like the CLI.
    /// [`classify`] never looks at extensions.
    pub fn from_extension(ext: &str) -> FormatTag {
        match ext.to_lowercase().as_str() {
            "pdf" => FormatTag::Pdf,
            "docx" => FormatTag::Docx,
            "pptx" => FormatTag::Pptx,
            _ => FormatTag::Unsupported,
        }
    }

    pub(crate) fn unit_terminator(self) -> &'static str {
        match self {
            FormatTag::Pdf | FormatTag::Unsupported => "",
            FormatTag::Docx | FormatTag::Pptx => "\n",
        }
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormatTag::Pdf => "PDF",
            FormatTag::Docx => "DOCX",
            FormatTag::Pptx => "PPTX",
            FormatTag::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}
