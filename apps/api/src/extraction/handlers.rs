use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::dossier::Dossier;
use crate::normalizer::normalize;
use crate::reader::{read_off_thread, RawDocument};
use crate::routes::upload::{invalid_upload, read_field};
use crate::state::AppState;

/// Declared upload types accepted by `/extract`. The reader still decides by
/// extension or magic bytes.
const ACCEPTED_MEDIA_TYPES: [&str; 4] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "application/octet-stream",
];

#[derive(Debug, Deserialize)]
pub struct ExtractTextRequest {
    pub cv_text: String,
}

fn check_media_type(doc: &RawDocument) -> Result<(), AppError> {
    let Some(declared) = doc.media_type.as_deref() else {
        return Ok(());
    };
    let essence = declared.split(';').next().unwrap_or_default().trim();
    if ACCEPTED_MEDIA_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(essence))
    {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unsupported file type: {declared}. Upload a PDF, DOCX or TXT file"
        )))
    }
}

/// POST /api/v1/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Dossier>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        if field.name() == Some("file") {
            upload = Some(read_field(field).await?);
            break;
        }
    }
    let doc = upload.ok_or_else(|| AppError::Validation("A 'file' field is required".into()))?;
    check_media_type(&doc)?;

    let text = read_off_thread(doc).await?;
    let dossier = state.extractor.extract(&text).await?;
    Ok(Json(normalize(dossier)))
}

/// POST /api/v1/extract-text
pub async fn handle_extract_text(
    State(state): State<AppState>,
    Json(req): Json<ExtractTextRequest>,
) -> Result<Json<Dossier>, AppError> {
    let dossier = state.extractor.extract_str(&req.cv_text).await?;
    Ok(Json(normalize(dossier)))
}
