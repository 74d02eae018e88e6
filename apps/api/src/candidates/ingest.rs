//! Resume ingest workflows: parse-only, upload, re-processing of a stored
//! resume and bulk re-embedding.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::candidates::documents::DocumentStore;
use crate::candidates::store::CandidateStore;
use crate::errors::AppError;
use crate::models::candidate::{CandidateProfile, NewCandidate, UNKNOWN_WORK_AUTH};
use crate::resume::experience::MonthIndex;
use crate::resume::text::{extract_text_blocking, DocumentFormat};
use crate::resume::{extract_fields, ExtractedFields, ExtractionRules};
use crate::search::embedding::pseudo_embedding;
use crate::state::AppState;

pub const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";
pub const RAW_TEXT_PREVIEW_CHARS: usize = 1000;
const RESUME_PREFIX: &str = "resumes";

/// An uploaded resume file as received from the client.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn format(&self) -> Result<DocumentFormat, AppError> {
        DocumentFormat::from_file_name(&self.file_name).ok_or_else(|| {
            AppError::Validation("Only PDF, DOC, and DOCX files are supported.".to_string())
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    #[serde(flatten)]
    pub fields: ExtractedFields,
    /// True when name or current title is missing and a model pass would help.
    pub llm_fallback: bool,
    pub raw_text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub candidate_id: Uuid,
    /// `name` here is the stored name, after the file-name fallback.
    #[serde(flatten)]
    pub fields: ExtractedFields,
    pub resume_url: Option<String>,
    pub message: String,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ReembedReport {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Display name derived from a file name: the stem with separators turned
/// into spaces, title-cased.
pub fn name_from_file_name(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file_name,
    };
    let words: Vec<String> = stem
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect();
    if words.is_empty() {
        UNKNOWN_CANDIDATE.to_string()
    } else {
        words.join(" ")
    }
}

/// Decodes the document on the blocking pool. Blank text is a 422.
pub async fn read_resume_text(bytes: Bytes, format: DocumentFormat) -> Result<String, AppError> {
    let text = extract_text_blocking(bytes, format).await;
    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(format!(
            "No extractable text found in {} file. It may be scanned, image-based or corrupted.",
            format.extension().to_uppercase()
        )));
    }
    Ok(text)
}

/// Runs field extraction on the blocking pool and hands the text back.
pub async fn extract_fields_blocking(
    rules: Arc<ExtractionRules>,
    text: String,
    present: MonthIndex,
) -> Result<(ExtractedFields, String), AppError> {
    tokio::task::spawn_blocking(move || {
        let fields = extract_fields(&text, &rules, present);
        (fields, text)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(RAW_TEXT_PREVIEW_CHARS) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Extraction only; nothing is stored.
pub async fn parse_resume(state: &AppState, file: ResumeFile) -> Result<ParseResponse, AppError> {
    let format = file.format()?;
    let text = read_resume_text(file.bytes, format).await?;
    let (fields, text) =
        extract_fields_blocking(state.rules.clone(), text, state.config.present_month()).await?;

    let llm_fallback = fields.name.is_none() || fields.current_title.is_none();
    Ok(ParseResponse {
        fields,
        llm_fallback,
        raw_text: preview(&text),
    })
}

/// Full upload: extract, store the file, embed and insert the candidate.
///
/// Storage failure is logged and the candidate is still created without a
/// resume URL.
pub async fn ingest_resume(state: &AppState, file: ResumeFile) -> Result<UploadResponse, AppError> {
    let format = file.format()?;
    info!("Processing resume file: {}", file.file_name);

    let text = read_resume_text(file.bytes.clone(), format).await?;
    let (fields, text) =
        extract_fields_blocking(state.rules.clone(), text, state.config.present_month()).await?;

    let candidate_id = Uuid::new_v4();
    let path = format!("{RESUME_PREFIX}/{candidate_id}.{}", format.extension());
    let resume_url = match state
        .documents
        .put(&path, file.bytes, format.content_type())
        .await
    {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Resume upload to storage failed, continuing without file: {e}");
            None
        }
    };

    let embedding = pseudo_embedding(&text);
    let mut fields = fields;
    let profile =
        CandidateProfile::from_extracted(fields.clone(), name_from_file_name(&file.file_name), text);
    let name = profile.name.clone();
    fields.name = Some(name.clone());

    state
        .store
        .insert(&NewCandidate {
            id: candidate_id,
            profile,
            work_auth: UNKNOWN_WORK_AUTH.to_string(),
            resume_url: resume_url.clone(),
            embedding,
        })
        .await?;

    info!("Created candidate {candidate_id} ({name})");
    Ok(UploadResponse {
        candidate_id,
        fields,
        resume_url,
        message: "Resume uploaded and processed successfully".to_string(),
    })
}

/// Re-reads a stored resume and overwrites the candidate's extracted columns.
pub async fn process_stored_resume(state: &AppState, candidate_id: Uuid) -> Result<(), AppError> {
    let candidate = state
        .store
        .get(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let url = candidate.resume_url.as_deref().ok_or_else(|| {
        AppError::UnprocessableEntity(format!("Candidate {candidate_id} has no resume file"))
    })?;
    let path = state.documents.path_from_public_url(url).ok_or_else(|| {
        AppError::UnprocessableEntity(format!("Resume URL is not in the document store: {url}"))
    })?;
    let format = DocumentFormat::from_file_name(&path).ok_or_else(|| {
        AppError::UnprocessableEntity(format!("Unsupported stored resume: {path}"))
    })?;

    let bytes = state.documents.fetch(&path).await?;
    let text = read_resume_text(bytes, format).await?;
    let (fields, text) =
        extract_fields_blocking(state.rules.clone(), text, state.config.present_month()).await?;

    let embedding = pseudo_embedding(&text);
    let profile = CandidateProfile::from_extracted(fields, candidate.name, text);
    state
        .store
        .update_profile(candidate_id, &profile, &embedding)
        .await?;

    info!("Reprocessed resume for candidate {candidate_id}");
    Ok(())
}

/// Background wrapper for [`process_stored_resume`]; errors are only logged.
pub fn spawn_process_stored_resume(state: AppState, candidate_id: Uuid) {
    tokio::spawn(async move {
        if let Err(e) = process_stored_resume(&state, candidate_id).await {
            error!("Background processing failed for candidate {candidate_id}: {e}");
        }
    });
}

/// Recomputes the pseudo-embedding of every candidate that has raw text.
pub async fn reembed_all(store: &dyn CandidateStore) -> Result<ReembedReport, AppError> {
    let sources = store.list_embedding_sources().await?;
    let mut report = ReembedReport::default();

    for source in sources {
        let Some(text) = source.raw_text.filter(|t| !t.trim().is_empty()) else {
            report.skipped += 1;
            continue;
        };
        match store.update_embedding(source.id, &pseudo_embedding(&text)).await {
            Ok(()) => report.updated += 1,
            Err(e) => {
                error!("Failed to re-embed candidate {}: {e}", source.id);
                report.failed += 1;
            }
        }
    }

    info!(
        "Re-embedding finished: {} updated, {} skipped, {} failed",
        report.updated, report.skipped, report.failed
    );
    Ok(report)
}
