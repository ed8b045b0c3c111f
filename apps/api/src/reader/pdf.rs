//! PDF text extraction: `pdf-extract` page by page, `lopdf` as the second opinion.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::errors::DocumentError;
use crate::reader::MIN_TEXT_CHARS;

pub fn extract(data: &[u8]) -> Result<String, DocumentError> {
    let text = best_text(primary(data), || secondary(data))?;

    // Heuristic: a text layer this thin usually means an image-only scan.
    let chars = char_count(&text);
    if chars < MIN_TEXT_CHARS {
        return Err(DocumentError::ScannedPdf { chars });
    }
    Ok(text)
}

fn char_count(text: &str) -> usize {
    text.trim().chars().count()
}

/// A failed or thin primary read falls back to `secondary`; the longer text wins.
fn best_text(
    primary: Result<String, String>,
    secondary: impl FnOnce() -> Result<String, DocumentError>,
) -> Result<String, DocumentError> {
    match primary {
        Ok(text) if char_count(&text) >= MIN_TEXT_CHARS => Ok(text),
        Ok(thin) => {
            warn!(
                "pdf-extract yielded only {} characters, retrying with lopdf",
                char_count(&thin)
            );
            match secondary() {
                Ok(other) if char_count(&other) > char_count(&thin) => Ok(other),
                Ok(_) => Ok(thin),
                Err(e) => {
                    warn!("lopdf failed as well: {e}");
                    Ok(thin)
                }
            }
        }
        Err(reason) => {
            warn!("pdf-extract failed ({reason}), retrying with lopdf");
            secondary()
        }
    }
}

/// pdf-extract can panic on malformed fonts; a panic counts as a failed primary read.
fn primary(data: &[u8]) -> Result<String, String> {
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }))
    .map_err(|_| "parser panicked".to_string())?
    .map_err(|e| e.to_string())?;

    Ok(join_pages(pages.iter().map(String::as_str)))
}

/// Page-level failures are skipped so one broken page never loses the others.
fn secondary(data: &[u8]) -> Result<String, DocumentError> {
    let doc = lopdf::Document::load_mem(data).map_err(|e| DocumentError::Pdf(e.to_string()))?;
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(DocumentError::NoPages);
    }

    let mut texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => {
                debug!("lopdf: page {page_number} yielded {} characters", text.len());
                texts.push(text);
            }
            Err(e) => warn!("lopdf: skipping page {page_number}: {e}"),
        }
    }
    Ok(join_pages(texts.iter().map(String::as_str)))
}

fn join_pages<'a>(pages: impl Iterator<Item = &'a str>) -> String {
    pages
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::fixtures;

    #[test]
    fn test_join_pages_skips_blank_pages() {
        let joined = join_pages(["  page one ", "", "   ", "page three"].into_iter());
        assert_eq!(joined, "page one\n\npage three");
    }

    const PAGE_TEXT: &str = "Jeanne Martin lead Rust developer, eight years of distributed systems";

    #[test]
    fn test_text_layer_is_extracted() {
        let text = extract(&fixtures::pdf(&[PAGE_TEXT])).unwrap();
        assert!(text.contains("Jeanne Martin"));
        assert!(text.contains("distributed systems"));
    }

    #[test]
    fn test_lopdf_reads_every_page() {
        let data = fixtures::pdf(&[PAGE_TEXT, "Second page: Kafka, PostgreSQL"]);
        let text = secondary(&data).unwrap();
        assert!(text.contains("Jeanne Martin"));
        assert!(text.contains("Kafka"));
    }

    #[test]
    fn test_thin_text_layer_is_a_scan() {
        let result = extract(&fixtures::pdf(&["Scan"]));
        assert!(matches!(result, Err(DocumentError::ScannedPdf { chars }) if chars < MIN_TEXT_CHARS));
    }

    #[test]
    fn test_thin_primary_falls_back_to_longer_secondary() {
        let text = best_text(Ok("J M".to_string()), || Ok(PAGE_TEXT.to_string())).unwrap();
        assert_eq!(text, PAGE_TEXT);
    }

    #[test]
    fn test_thin_primary_kept_when_secondary_is_worse() {
        let text = best_text(Ok("J M".to_string()), || Err(DocumentError::NoPages)).unwrap();
        assert_eq!(text, "J M");

        let text = best_text(Ok("J M".to_string()), || Ok(String::new())).unwrap();
        assert_eq!(text, "J M");
    }

    #[test]
    fn test_full_primary_skips_secondary() {
        let text = best_text(Ok(PAGE_TEXT.to_string()), || {
            panic!("secondary must not run")
        })
        .unwrap();
        assert_eq!(text, PAGE_TEXT);
    }

    #[test]
    fn test_failed_primary_uses_secondary() {
        let result = best_text(Err("bad xref".to_string()), || Err(DocumentError::NoPages));
        assert!(matches!(result, Err(DocumentError::NoPages)));
    }

    #[test]
    fn test_garbage_after_magic_is_a_pdf_error() {
        let result = extract(b"%PDF-1.4\nthis is not a cross-reference table");
        assert!(matches!(
            result,
            Err(DocumentError::Pdf(_)) | Err(DocumentError::NoPages)
        ));
    }
}
