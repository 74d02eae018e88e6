use std::sync::Arc;

use crate::candidates::documents::DocumentStore;
use crate::candidates::store::CandidateStore;
use crate::config::Config;
use crate::llm_client::SummaryClient;
use crate::resume::ExtractionRules;
use crate::search::matcher::MatchSettings;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CandidateStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub summary: SummaryClient,
    /// Compiled once at startup; read-only afterwards.
    pub rules: Arc<ExtractionRules>,
    pub config: Config,
}

impl AppState {
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            threshold: self.config.match_threshold,
            count: self.config.match_count,
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::candidates::documents::memory::MemoryDocumentStore;
    use crate::candidates::store::memory::MemoryCandidateStore;

    /// State over in-memory stores, returned alongside handles to them.
    pub fn test_state(
        documents: MemoryDocumentStore,
    ) -> (AppState, Arc<MemoryCandidateStore>, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryCandidateStore::default());
        let documents = Arc::new(documents);
        let state = AppState {
            store: store.clone(),
            documents: documents.clone(),
            summary: SummaryClient::new(None).unwrap(),
            rules: Arc::new(ExtractionRules::new().unwrap()),
            config: Config::for_tests(),
        };
        (state, store, documents)
    }
}
