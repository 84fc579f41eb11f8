use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::CriteriaSet;
use crate::errors::AppError;
use crate::routes::upload::{multipart_error, read_file};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ExtractCriteriaResponse {
    pub criteria: Vec<String>,
    pub criteria_id: Uuid,
    pub backend: String,
}

#[derive(Deserialize)]
pub struct GetCriteriaQuery {
    pub id: Option<Uuid>,
}

/// POST /extract-criteria
pub async fn handle_extract_criteria(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractCriteriaResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            upload = Some(read_file(field).await?);
            break;
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("No file uploaded in field 'file'".into()))?;
    let kind = upload.kind().ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported file type for '{}'. Upload a PDF or DOCX file.",
            upload.filename
        ))
    })?;

    let document = upload.extract(kind).await;
    let mut criteria = state.pipeline.criteria.extract(&document.text).await?;
    if criteria.is_empty() {
        return Err(AppError::NoCriteria);
    }
    // Stored sets must stay scoreable, so keep the first `max_criteria`.
    let max_criteria = state.config.max_criteria;
    if criteria.len() > max_criteria {
        warn!(
            "Keeping the first {max_criteria} of {} criteria from '{}'",
            criteria.len(),
            document.filename
        );
        criteria.truncate(max_criteria);
    }

    let backend = state.pipeline.backend.as_str();
    let set = state
        .criteria_store
        .insert(criteria, backend, Some(document.filename))
        .await;
    info!(
        "Extracted {} criteria from '{}' (id {})",
        set.criteria.len(),
        set.source.as_deref().unwrap_or_default(),
        set.id
    );

    Ok(Json(ExtractCriteriaResponse {
        criteria: set.criteria,
        criteria_id: set.id,
        backend: set.backend,
    }))
}

/// GET /get-criteria
pub async fn handle_get_criteria(
    State(state): State<AppState>,
    Query(params): Query<GetCriteriaQuery>,
) -> Result<Json<CriteriaSet>, AppError> {
    let set = match params.id {
        Some(id) => state.criteria_store.get(id).await,
        None => state.criteria_store.latest().await,
    };
    set.map(Json)
        .ok_or_else(|| AppError::NotFound("No criteria have been extracted".into()))
}
