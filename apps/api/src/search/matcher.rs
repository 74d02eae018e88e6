//! Candidate search: similarity RPC first, substring search as the fallback.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::candidates::store::CandidateStore;
use crate::errors::AppError;
use crate::models::candidate::CandidateMatch;
use crate::search::embedding::pseudo_embedding;

/// Similarity reported for every text-search hit.
pub const FALLBACK_SIMILARITY: f64 = 1.0;
pub const NO_RESULTS_MESSAGE: &str = "No candidates found matching your query.";

#[derive(Debug, Clone, Copy)]
pub struct MatchSettings {
    pub threshold: f64,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub candidates: Vec<CandidateMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Embeds `query`, asks the store for similar rows and falls back to a text
/// search when the RPC returns nothing. Empty queries are rejected before any
/// store call. Non-empty queries are used as given, surrounding whitespace
/// included.
pub async fn search_candidates(
    store: &dyn CandidateStore,
    query: &str,
    settings: MatchSettings,
) -> Result<SearchResponse, AppError> {
    if query.trim().is_empty() {
        return Err(AppError::Validation("Query parameter is required".to_string()));
    }

    let embedding = pseudo_embedding(query);
    let matches = store
        .match_candidates(&embedding, settings.threshold, settings.count)
        .await?;
    if !matches.is_empty() {
        debug!("Similarity search returned {} candidates", matches.len());
        return Ok(SearchResponse {
            candidates: matches,
            message: None,
        });
    }

    info!("No vector matches for query, falling back to text search");
    let mut candidates = store.text_search(query, settings.count).await?;
    for candidate in &mut candidates {
        candidate.similarity = FALLBACK_SIMILARITY;
    }

    let message = candidates
        .is_empty()
        .then(|| NO_RESULTS_MESSAGE.to_string());
    Ok(SearchResponse {
        candidates,
        message,
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::candidates::store::memory::MemoryCandidateStore;
    use crate::models::candidate::{CandidateProfile, NewCandidate};
    use crate::resume::ExtractedFields;

    const DEFAULTS: MatchSettings = MatchSettings {
        threshold: 0.1,
        count: 10,
    };
    /// Cosine similarity never exceeds 1, so the RPC always comes back empty.
    const NO_VECTOR_HITS: MatchSettings = MatchSettings {
        threshold: 1.5,
        count: 10,
    };

    async fn store_with(raw_texts: &[(&str, &str)]) -> MemoryCandidateStore {
        let store = MemoryCandidateStore::default();
        for (name, text) in raw_texts {
            let profile = CandidateProfile::from_extracted(
                ExtractedFields {
                    hard_skills: vec!["Rust".to_string()],
                    ..Default::default()
                },
                name.to_string(),
                text.to_string(),
            );
            store
                .insert(&NewCandidate {
                    id: Uuid::new_v4(),
                    profile,
                    work_auth: "Unknown".to_string(),
                    resume_url: None,
                    embedding: pseudo_embedding(text),
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_store() {
        let store = store_with(&[("Jane Doe", "python developer")]).await;
        for q in ["", "   ", "\n\t"] {
            let err = search_candidates(&store, q, DEFAULTS).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert_eq!(store.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_vector_hit_keeps_similarity() {
        let store = store_with(&[("Jane Doe", "python developer")]).await;
        let response = search_candidates(&store, "python developer", DEFAULTS)
            .await
            .unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert!((response.candidates[0].similarity - 1.0).abs() < 1e-6);
        assert!(response.message.is_none());
        assert_eq!(store.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_fallback_sets_similarity_to_one() {
        let store = store_with(&[
            ("Jane Doe", "Senior Python developer"),
            ("John Roe", "Java architect"),
        ])
        .await;
        let response = search_candidates(&store, "python", NO_VECTOR_HITS)
            .await
            .unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.candidates[0].name, "Jane Doe");
        assert_eq!(response.candidates[0].similarity, FALLBACK_SIMILARITY);
        assert_eq!(store.search_calls(), 2);
    }

    #[tokio::test]
    async fn test_fallback_matches_skills() {
        let store = store_with(&[("Jane Doe", "backend work")]).await;
        let response = search_candidates(&store, "rust", NO_VECTOR_HITS)
            .await
            .unwrap();
        assert_eq!(response.candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_matches_name_only() {
        let store = store_with(&[("Priya Raman", "backend work")]).await;
        let response = search_candidates(&store, "raman", NO_VECTOR_HITS)
            .await
            .unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.candidates[0].name, "Priya Raman");
    }

    #[tokio::test]
    async fn test_query_whitespace_is_kept() {
        let store = store_with(&[("Jane Doe", "python developer")]).await;
        // " python" is not a substring of "python developer" or "Jane Doe".
        let response = search_candidates(&store, " python", NO_VECTOR_HITS)
            .await
            .unwrap();
        assert!(response.candidates.is_empty());
        assert_ne!(
            pseudo_embedding(" python developer"),
            pseudo_embedding("python developer")
        );
    }

    #[tokio::test]
    async fn test_no_results_message() {
        let store = store_with(&[("Jane Doe", "python developer")]).await;
        let response = search_candidates(&store, "cobol", NO_VECTOR_HITS)
            .await
            .unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(response.message.as_deref(), Some(NO_RESULTS_MESSAGE));
    }

    #[tokio::test]
    async fn test_count_limits_fallback() {
        let store = store_with(&[("A One", "go"), ("B Two", "go"), ("C Three", "go")]).await;
        let settings = MatchSettings {
            threshold: 1.5,
            count: 2,
        };
        let response = search_candidates(&store, "go", settings).await.unwrap();
        assert_eq!(response.candidates.len(), 2);
    }
}
