//! DOCX text extraction: body paragraphs, then table cells.
//!
//! CV templates often lay out skills and dates in tables, which a
//! paragraph-only reader misses entirely.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::errors::DocumentError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract(data: &[u8]) -> Result<String, DocumentError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| DocumentError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DocumentError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::Docx(e.to_string()))?;

    let content = walk(&xml)?;
    debug!(
        "DOCX: {} paragraphs, {} table cells",
        content.paragraphs.len(),
        content.cells.len()
    );
    Ok(content
        .paragraphs
        .into_iter()
        .chain(content.cells)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[derive(Debug, Default)]
struct DocxContent {
    paragraphs: Vec<String>,
    cells: Vec<String>,
}

fn walk(xml: &str) -> Result<DocxContent, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut content = DocxContent::default();
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut table_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"p" => paragraph.clear(),
                b"tbl" => table_depth += 1,
                b"tc" if table_depth == 1 => cell.clear(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| DocumentError::Docx(e.to_string()))?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        if table_depth == 0 {
                            content.paragraphs.push(text.to_string());
                        } else {
                            if !cell.is_empty() {
                                cell.push(' ');
                            }
                            cell.push_str(text);
                        }
                    }
                    paragraph.clear();
                }
                b"tc" if table_depth == 1 => {
                    if !cell.trim().is_empty() {
                        content.cells.push(cell.trim().to_string());
                    }
                    cell.clear();
                }
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::Docx(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(content)
}
