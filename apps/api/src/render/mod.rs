//! Rendering adapters: a validated `Dossier` in, a downloadable document out.
//!
//! Renderers rely on the dossier contract only (every list present, every
//! scalar a string) and never null-check.

pub mod handlers;
pub mod markdown;

use anyhow::Result;

use crate::models::dossier::Dossier;

pub use markdown::MarkdownRenderer;

pub trait DossierRenderer: Send + Sync {
    fn media_type(&self) -> &'static str;
    fn file_extension(&self) -> &'static str;
    fn render(&self, dossier: &Dossier) -> Result<Vec<u8>>;
}

/// `{first}_{last}_CV.{ext}`, or `Dossier_Competences_CV.{ext}` for an unnamed dossier.
pub fn attachment_filename(dossier: &Dossier, extension: &str) -> String {
    let name = format!(
        "{}_{}",
        dossier.header.first_name.trim(),
        dossier.header.last_name.trim()
    );
    let name = name.trim_matches('_').replace(char::is_whitespace, "_");
    let name = if name.is_empty() {
        "Dossier_Competences".to_string()
    } else {
        name
    };
    format!("{name}_CV.{extension}")
}

/// Content-Disposition value with an ASCII fallback and the exact UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded: String = filename
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-') {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_filename() {
        let mut dossier = Dossier::default();
        assert_eq!(attachment_filename(&dossier, "md"), "Dossier_Competences_CV.md");

        dossier.header.first_name = "Jeanne".into();
        assert_eq!(attachment_filename(&dossier, "md"), "Jeanne_CV.md");

        dossier.header.last_name = "Le Gall".into();
        assert_eq!(attachment_filename(&dossier, "pdf"), "Jeanne_Le_Gall_CV.pdf");
    }

    #[test]
    fn test_content_disposition_keeps_header_ascii() {
        let value = content_disposition("Hélène_CV.md");
        assert!(value.is_ascii());
        assert!(value.contains("filename=\"H_l_ne_CV.md\""));
        assert!(value.contains("filename*=UTF-8''H%C3%A9l%C3%A8ne_CV.md"));
    }
}
