use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};
use uuid::Uuid;

use super::batch::score_batch;
use crate::errors::AppError;
use crate::report::{Report, ReportFormat};
use crate::routes::upload::{multipart_error, read_file, read_text, UploadedFile};
use crate::state::AppState;

/// Parsed `POST /score-resumes` form.
#[derive(Default)]
struct ScoreRequest {
    files: Vec<UploadedFile>,
    criteria: Vec<String>,
    criteria_id: Option<Uuid>,
    format: Option<ReportFormat>,
}

async fn read_score_request(multipart: &mut Multipart) -> Result<ScoreRequest, AppError> {
    let mut request = ScoreRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => request.files.push(read_file(field).await?),
            "criteria" => {
                let criterion = read_text(field).await?;
                if !criterion.is_empty() {
                    request.criteria.push(criterion);
                }
            }
            "criteria_id" => {
                let raw = read_text(field).await?;
                if !raw.is_empty() {
                    let id = raw.parse::<Uuid>().map_err(|_| {
                        AppError::Validation(format!("Invalid criteria_id '{raw}'"))
                    })?;
                    request.criteria_id = Some(id);
                }
            }
            "format" => {
                let raw = read_text(field).await?;
                if !raw.is_empty() {
                    request.format = Some(raw.parse()?);
                }
            }
            _ => {
                field.bytes().await.map_err(multipart_error)?;
            }
        }
    }

    Ok(request)
}

/// Explicit criteria first, then the referenced set, then the latest set.
async fn resolve_criteria(
    state: &AppState,
    explicit: Vec<String>,
    criteria_id: Option<Uuid>,
) -> Result<Vec<String>, AppError> {
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    if let Some(id) = criteria_id {
        return state
            .criteria_store
            .get(id)
            .await
            .map(|set| set.criteria)
            .ok_or_else(|| AppError::NotFound(format!("Criteria set {id} not found")));
    }
    state
        .criteria_store
        .latest()
        .await
        .map(|set| set.criteria)
        .ok_or_else(|| {
            AppError::Validation(
                "No criteria provided. Extract criteria first or pass 'criteria' fields.".into(),
            )
        })
}

/// POST /score-resumes
pub async fn handle_score_resumes(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let request = read_score_request(&mut multipart).await?;
    let config = &state.config;

    if request.files.is_empty() {
        return Err(AppError::Validation("No resumes uploaded in field 'files'".into()));
    }
    if request.files.len() > config.max_resumes {
        return Err(AppError::Validation(format!(
            "Too many resumes: {} uploaded, at most {} allowed",
            request.files.len(),
            config.max_resumes
        )));
    }

    let criteria = resolve_criteria(&state, request.criteria, request.criteria_id).await?;
    if criteria.len() > config.max_criteria {
        return Err(AppError::Validation(format!(
            "Too many criteria: {} given, at most {} allowed",
            criteria.len(),
            config.max_criteria
        )));
    }
    let format = request.format.unwrap_or(config.report_format);

    let mut supported = Vec::with_capacity(request.files.len());
    for file in request.files {
        match file.kind() {
            Some(kind) => supported.push((file, kind)),
            None => warn!("Skipping unsupported file '{}'", file.filename),
        }
    }
    if supported.is_empty() {
        return Err(AppError::Validation(
            "No supported resumes uploaded. Upload PDF or DOCX files.".into(),
        ));
    }

    let mut resumes = Vec::with_capacity(supported.len());
    for (file, kind) in supported {
        resumes.push(file.extract(kind).await);
    }

    info!(
        "Scoring {} resumes against {} criteria ({} backend)",
        resumes.len(),
        criteria.len(),
        state.pipeline.backend.as_str()
    );
    let candidates = score_batch(
        state.pipeline.identifier.as_ref(),
        state.pipeline.scorer.as_ref(),
        &criteria,
        &resumes,
    )
    .await?;

    let report = Report::build(&criteria, &candidates, state.pipeline.label_style);
    let body = format.render(&report)?;

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.file_name()),
            ),
        ],
        body,
    )
        .into_response())
}
