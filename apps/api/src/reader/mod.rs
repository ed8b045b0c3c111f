//! Document text reader: raw bytes of a CV or mission in, trimmed Unicode text out.
//!
//! Dispatch is strict on the file extension when a name is known, and falls
//! back to magic-byte sniffing otherwise. Every path ends at the same gate:
//! a `PlainText` can only be built from at least `MIN_TEXT_CHARS` characters.

mod docx;
mod pdf;
mod text;

use std::path::Path;

use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::DocumentError;

/// Minimum trimmed length of any text handed to the extraction or comparison engines.
pub const MIN_TEXT_CHARS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// An uploaded document. Lives for one request only.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub data: Bytes,
    pub file_name: Option<String>,
    /// Informational; dispatch never trusts it.
    pub media_type: Option<String>,
}

impl RawDocument {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            file_name: None,
            media_type: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Display name used in logs and comparison results.
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("document")
    }
}

/// Text that passed the minimum-length gate. The only input type the engines accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainText(String);

impl PlainText {
    /// Trims `text` and enforces the minimum length. `origin` names the input in the error.
    pub fn new(origin: &'static str, text: &str) -> Result<Self, DocumentError> {
        let trimmed = text.trim();
        let chars = trimmed.chars().count();
        if chars < MIN_TEXT_CHARS {
            return Err(DocumentError::InsufficientContent { origin, chars });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `n` characters, used for placeholder summaries.
    pub fn preview(&self, n: usize) -> String {
        self.0.chars().take(n).collect()
    }
}

impl AsRef<str> for PlainText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    pub fn from_extension(file_name: &str) -> Result<Self, DocumentError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "txt" => Ok(DocumentKind::Text),
            "" => Err(DocumentError::UnsupportedFormat(format!(
                "'{file_name}' has no extension"
            ))),
            other => Err(DocumentError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    /// Routes on leading bytes: `%PDF` is a PDF, `PK` a ZIP container (DOCX),
    /// everything else is decoded as text.
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(b"%PDF") {
            DocumentKind::Pdf
        } else if data.starts_with(b"PK") {
            DocumentKind::Docx
        } else {
            DocumentKind::Text
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Reads a document into gated plain text. CPU-bound; see `read_off_thread`.
pub fn read(doc: &RawDocument) -> Result<PlainText, DocumentError> {
    if doc.data.is_empty() {
        return Err(DocumentError::EmptyFile);
    }

    let kind = match doc.file_name.as_deref().filter(|n| !n.trim().is_empty()) {
        Some(name) => DocumentKind::from_extension(name)?,
        None => DocumentKind::sniff(&doc.data),
    };
    debug!(
        "Reading {} as {:?} (declared media type: {})",
        doc.display_name(),
        kind,
        doc.media_type.as_deref().unwrap_or("none")
    );

    let (origin, raw) = match kind {
        DocumentKind::Pdf => ("PDF text", pdf::extract(&doc.data)?),
        DocumentKind::Docx => ("DOCX text", docx::extract(&doc.data)?),
        DocumentKind::Text => ("Text file", text::decode(&doc.data)),
    };

    let text = PlainText::new(origin, &raw)?;
    info!(
        "Extracted {} characters from {}",
        text.as_str().chars().count(),
        doc.display_name()
    );
    Ok(text)
}

/// Runs `read` on the blocking pool so PDF/DOCX parsing never stalls the runtime.
pub async fn read_off_thread(doc: RawDocument) -> Result<PlainText, DocumentError> {
    tokio::task::spawn_blocking(move || read(&doc))
        .await
        .map_err(|e| DocumentError::Worker(e.to_string()))?
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Write;

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use zip::write::SimpleFileOptions;

    /// Builds a PDF with one Courier text line per page.
    pub fn pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 10.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    /// Builds a minimal DOCX container holding `document_xml` as its body.
    pub fn docx(document_xml: &str) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = SimpleFileOptions::default();
            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(b"<?xml version=\"1.0\"?><Types/>").unwrap();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    /// Wraps body XML in a WordprocessingML document element.
    pub fn body(inner: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
            <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
            <w:body>{inner}</w:body></w:document>"
        )
    }

    pub fn paragraph(text: &str) -> String {
        format!("<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CV_LINE: &str = "Jeanne Martin, développeuse Rust senior, 8 ans d'expérience en systèmes distribués.";

    #[test]
    fn test_plain_text_gate_counts_trimmed_chars() {
        let padded = format!("   {}   ", "x".repeat(49));
        match PlainText::new("CV text", &padded) {
            Err(DocumentError::InsufficientContent { chars, .. }) => assert_eq!(chars, 49),
            other => panic!("expected insufficient content, got {other:?}"),
        }
        assert!(PlainText::new("CV text", &"é".repeat(50)).is_ok());
    }

    #[test]
    fn test_sniff_routes_on_magic_bytes() {
        assert_eq!(DocumentKind::sniff(b"%PDF-1.7\n..."), DocumentKind::Pdf);
        assert_eq!(DocumentKind::sniff(b"PK\x03\x04rest"), DocumentKind::Docx);
        assert_eq!(DocumentKind::sniff(b"Hello"), DocumentKind::Text);
    }

    #[test]
    fn test_extension_dispatch_is_strict() {
        assert_eq!(DocumentKind::from_extension("cv.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_extension("cv.docx").unwrap(), DocumentKind::Docx);
        assert!(matches!(
            DocumentKind::from_extension("cv.odt"),
            Err(DocumentError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_declared_media_type_does_not_override_sniffing() {
        let doc = RawDocument::new(CV_LINE.as_bytes().to_vec()).with_media_type("application/pdf");
        let text = read(&doc).unwrap();
        assert!(text.as_str().starts_with("Jeanne Martin"));
    }

    #[test]
    fn test_pk_blob_goes_to_docx_reader() {
        let xml = fixtures::body(&fixtures::paragraph(CV_LINE));
        let doc = RawDocument::new(fixtures::docx(&xml));
        assert_eq!(read(&doc).unwrap().as_str(), CV_LINE);
    }

    #[test]
    fn test_pdf_text_layer_is_read() {
        let data = fixtures::pdf(&["Jeanne Martin, senior Rust developer, 8 years in distributed systems"]);
        let text = read(&RawDocument::new(data.clone()).with_file_name("cv.pdf")).unwrap();
        assert!(text.as_str().contains("Jeanne Martin"));

        let sniffed = read(&RawDocument::new(data)).unwrap();
        assert_eq!(sniffed, text);
    }

    #[test]
    fn test_pdf_magic_goes_to_pdf_reader() {
        let doc = RawDocument::new(b"%PDF-1.4 definitely not a real pdf body".to_vec());
        assert!(matches!(
            read(&doc),
            Err(DocumentError::Pdf(_)) | Err(DocumentError::NoPages)
        ));
    }

    #[test]
    fn test_empty_and_short_inputs_are_rejected() {
        assert!(matches!(
            read(&RawDocument::new(Vec::new())),
            Err(DocumentError::EmptyFile)
        ));
        assert!(matches!(
            read(&RawDocument::new(b"too short".to_vec()).with_file_name("cv.txt")),
            Err(DocumentError::InsufficientContent { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_off_thread_matches_inline_read() {
        let doc = RawDocument::new(CV_LINE.as_bytes().to_vec()).with_file_name("cv.txt");
        let text = read_off_thread(doc).await.unwrap();
        assert_eq!(text.as_str(), CV_LINE);
    }
}
