use axum::{
    extract::{Query, State},
    Json,
};

use crate::errors::AppError;
use crate::search::matcher::{search_candidates, SearchQuery, SearchResponse};
use crate::state::AppState;

/// GET /api/search?query=...
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.query.unwrap_or_default();
    let response =
        search_candidates(state.store.as_ref(), &query, state.match_settings()).await?;
    Ok(Json(response))
}
