use axum::extract::multipart::{Field, MultipartError};

use crate::errors::AppError;
use crate::reader::RawDocument;

pub fn invalid_upload(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart upload: {}", e.body_text()))
}

/// Buffers one multipart part into a `RawDocument`, keeping its file name and declared type.
pub async fn read_field(field: Field<'_>) -> Result<RawDocument, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let media_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(invalid_upload)?;

    let mut doc = RawDocument::new(data);
    if let Some(name) = file_name {
        doc = doc.with_file_name(name);
    }
    if let Some(media_type) = media_type {
        doc = doc.with_media_type(media_type);
    }
    Ok(doc)
}
