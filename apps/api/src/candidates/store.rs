//! Candidate persistence.
//!
//! Handlers and background jobs talk to [`CandidateStore`]; production uses
//! Postgres with the `vector` extension, tests use the in-memory store below.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{
    CandidateMatch, CandidateProfile, CandidateRow, EmbeddingSource, NewCandidate,
};
use crate::search::embedding::to_vector_literal;

#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn insert(&self, candidate: &NewCandidate) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<CandidateRow>, AppError>;

    /// Overwrites the extracted columns and embedding of an existing row.
    async fn update_profile(
        &self,
        id: Uuid,
        profile: &CandidateProfile,
        embedding: &[f32],
    ) -> Result<(), AppError>;

    async fn update_embedding(&self, id: Uuid, embedding: &[f32]) -> Result<(), AppError>;

    async fn list_embedding_sources(&self) -> Result<Vec<EmbeddingSource>, AppError>;

    /// Rows whose cosine similarity to `embedding` is at least `threshold`,
    /// best first, at most `count`.
    async fn match_candidates(
        &self,
        embedding: &[f32],
        threshold: f64,
        count: i64,
    ) -> Result<Vec<CandidateMatch>, AppError>;

    /// Case-insensitive substring search over name, skills and raw text.
    async fn text_search(&self, query: &str, limit: i64) -> Result<Vec<CandidateMatch>, AppError>;
}

pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }
}

const CANDIDATE_COLUMNS: &str = "id, name, email, phone, current_title, location, work_auth, \
     years_exp, skills, linkedin_url, resume_url, raw_text, created_at";

/// Escapes LIKE wildcards so user input matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn insert(&self, candidate: &NewCandidate) -> Result<(), AppError> {
        let p = &candidate.profile;
        sqlx::query(
            "INSERT INTO candidates (id, name, email, phone, current_title, location, work_auth, \
             years_exp, skills, linkedin_url, resume_url, raw_text, embedding) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13::vector)",
        )
        .bind(candidate.id)
        .bind(&p.name)
        .bind(&p.email)
        .bind(&p.phone)
        .bind(&p.current_title)
        .bind(&p.location)
        .bind(&candidate.work_auth)
        .bind(p.years_exp)
        .bind(&p.skills)
        .bind(&p.linkedin_url)
        .bind(&candidate.resume_url)
        .bind(&p.raw_text)
        .bind(to_vector_literal(&candidate.embedding))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<CandidateRow>, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        profile: &CandidateProfile,
        embedding: &[f32],
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE candidates SET name = $2, email = $3, phone = $4, current_title = $5, \
             location = $6, years_exp = $7, skills = $8, linkedin_url = $9, raw_text = $10, \
             embedding = $11::vector WHERE id = $1",
        )
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.current_title)
        .bind(&profile.location)
        .bind(profile.years_exp)
        .bind(&profile.skills)
        .bind(&profile.linkedin_url)
        .bind(&profile.raw_text)
        .bind(to_vector_literal(embedding))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Candidate {id} not found")));
        }
        Ok(())
    }

    async fn update_embedding(&self, id: Uuid, embedding: &[f32]) -> Result<(), AppError> {
        sqlx::query("UPDATE candidates SET embedding = $2::vector WHERE id = $1")
            .bind(id)
            .bind(to_vector_literal(embedding))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_embedding_sources(&self) -> Result<Vec<EmbeddingSource>, AppError> {
        let rows = sqlx::query_as::<_, EmbeddingSource>(
            "SELECT id, raw_text FROM candidates ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn match_candidates(
        &self,
        embedding: &[f32],
        threshold: f64,
        count: i64,
    ) -> Result<Vec<CandidateMatch>, AppError> {
        let rows = sqlx::query_as::<_, CandidateMatch>(
            "SELECT id, name, current_title, location, work_auth, years_exp, resume_url, similarity \
             FROM match_candidates($1::vector, $2::float8, $3::int)",
        )
        .bind(to_vector_literal(embedding))
        .bind(threshold)
        .bind(count)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn text_search(&self, query: &str, limit: i64) -> Result<Vec<CandidateMatch>, AppError> {
        let rows = sqlx::query_as::<_, CandidateMatch>(
            "SELECT id, name, current_title, location, work_auth, years_exp, resume_url, \
             0.0::float8 AS similarity \
             FROM candidates \
             WHERE name ILIKE $1 \
                OR raw_text ILIKE $1 \
                OR EXISTS (SELECT 1 FROM unnest(skills) AS skill WHERE skill ILIKE $1) \
             ORDER BY created_at DESC \
             LIMIT $2",
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
