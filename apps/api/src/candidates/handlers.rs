use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidates::ingest::{
    ingest_resume, parse_resume, reembed_all, spawn_process_stored_resume, ParseResponse,
    ReembedReport, ResumeFile, UploadResponse,
};
use crate::candidates::store::CandidateStore;
use crate::errors::AppError;
use crate::models::candidate::CandidateRow;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub candidate_id: Uuid,
}

#[derive(Serialize)]
pub struct ProcessAccepted {
    pub candidate_id: Uuid,
    pub status: &'static str,
}

#[derive(Deserialize)]
pub struct SummaryRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Pulls the `file` part out of a multipart body.
async fn read_resume_file(mut multipart: Multipart) -> Result<ResumeFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        if bytes.is_empty() {
            break;
        }
        return Ok(ResumeFile { file_name, bytes });
    }
    Err(AppError::Validation("Resume file is required.".to_string()))
}

/// POST /api/resume/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let file = read_resume_file(multipart).await?;
    Ok(Json(ingest_resume(&state, file).await?))
}

/// POST /api/resume/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let file = read_resume_file(multipart).await?;
    Ok(Json(parse_resume(&state, file).await?))
}

/// POST /api/resume/process
/// Accepts immediately; the work runs in the background.
pub async fn handle_process(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> (StatusCode, Json<ProcessAccepted>) {
    spawn_process_stored_resume(state, req.candidate_id);
    (
        StatusCode::ACCEPTED,
        Json(ProcessAccepted {
            candidate_id: req.candidate_id,
            status: "processing",
        }),
    )
}

/// POST /api/candidates/reembed
pub async fn handle_reembed(
    State(state): State<AppState>,
) -> Result<Json<ReembedReport>, AppError> {
    Ok(Json(reembed_all(state.store.as_ref()).await?))
}

/// POST /api/candidates/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(req): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text is required".to_string()));
    }
    let summary = state
        .summary
        .summarize(&req.resume_text, req.job_description.as_deref())
        .await
        .ok_or_else(|| AppError::Summary("summary client returned nothing".to_string()))?;
    Ok(Json(SummaryResponse { summary }))
}

/// GET /api/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateRow>, AppError> {
    let candidate = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(candidate))
}
