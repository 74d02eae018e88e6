use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::resume::ExtractedFields;

/// Placeholder stored for a title or location the extractors could not find.
pub const NOT_SPECIFIED: &str = "Not specified";
pub const UNKNOWN_WORK_AUTH: &str = "Unknown";

/// A persisted candidate. The embedding column is write-only from Rust.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub current_title: Option<String>,
    pub location: Option<String>,
    pub work_auth: Option<String>,
    pub years_exp: Option<i32>,
    pub skills: Vec<String>,
    pub linkedin_url: Option<String>,
    pub resume_url: Option<String>,
    pub raw_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One row of a similarity or text search.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateMatch {
    pub id: Uuid,
    pub name: String,
    pub current_title: Option<String>,
    pub location: Option<String>,
    pub work_auth: Option<String>,
    pub years_exp: Option<i32>,
    pub resume_url: Option<String>,
    pub similarity: f64,
}

/// The extracted columns of a candidate, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub current_title: String,
    pub location: String,
    pub years_exp: Option<i32>,
    pub skills: Vec<String>,
    pub linkedin_url: Option<String>,
    pub raw_text: String,
}

impl CandidateProfile {
    /// Fills absent name, title and location so the stored row is displayable.
    pub fn from_extracted(fields: ExtractedFields, fallback_name: String, raw_text: String) -> Self {
        Self {
            name: fields.name.unwrap_or(fallback_name),
            email: fields.email,
            phone: fields.phone,
            current_title: fields
                .current_title
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            location: fields.location.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            years_exp: fields.years_exp.and_then(|y| i32::try_from(y).ok()),
            skills: fields.hard_skills,
            linkedin_url: fields.linkedin_url,
            raw_text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub id: Uuid,
    pub profile: CandidateProfile,
    pub work_auth: String,
    pub resume_url: Option<String>,
    pub embedding: Vec<f32>,
}

/// Input for re-embedding: only rows with text can be embedded.
#[derive(Debug, Clone, FromRow)]
pub struct EmbeddingSource {
    pub id: Uuid,
    pub raw_text: Option<String>,
}
