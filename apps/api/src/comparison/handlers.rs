use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::comparison::workflow::rank_cvs;
use crate::errors::AppError;
use crate::models::comparison::ComparisonResult;
use crate::routes::upload::{invalid_upload, read_field};
use crate::state::AppState;

/// POST /api/v1/compare
/// Multipart: repeated `cvs` parts and one `mission` part.
pub async fn handle_compare(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ComparisonResult>, AppError> {
    let mut cvs = Vec::new();
    let mut mission = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        match field.name() {
            Some("cvs") => cvs.push(read_field(field).await?),
            Some("mission") => mission = Some(read_field(field).await?),
            _ => {}
        }
    }

    if cvs.is_empty() {
        return Err(AppError::Validation(
            "At least one CV file must be provided".into(),
        ));
    }
    let mission =
        mission.ok_or_else(|| AppError::Validation("A mission file must be provided".into()))?;

    let result = rank_cvs(&state.extractor, &state.comparer, mission, cvs).await?;
    Ok(Json(result))
}
