use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::dossier::Dossier;
use crate::render::{attachment_filename, content_disposition, DossierRenderer, MarkdownRenderer};

/// Renders `dossier` as a file download.
pub fn render_attachment(
    renderer: &dyn DossierRenderer,
    dossier: &Dossier,
) -> Result<Response, AppError> {
    let body = renderer.render(dossier)?;
    let filename = attachment_filename(dossier, renderer.file_extension());
    info!("Rendered {filename} ({} bytes)", body.len());

    Ok((
        [
            (header::CONTENT_TYPE, renderer.media_type().to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        body,
    )
        .into_response())
}

/// POST /api/v1/generate-markdown
pub async fn handle_generate_markdown(Json(dossier): Json<Dossier>) -> Result<Response, AppError> {
    render_attachment(&MarkdownRenderer, &dossier)
}
