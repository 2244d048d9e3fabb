//! Search API endpoints.

use axum::extract::{rejection::QueryRejection, Query, State};
use serde::{Deserialize, Serialize};

use super::{current_revision, error, query_params, success, ApiResult};
use crate::catalog::{EmptyState, Selection};
use crate::errors::AppError;
use crate::models::{Resource, TrainingModule};
use crate::search::{RecordKind, SearchHit};
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    /// Search query string.
    pub q: String,
    /// Restrict hits to one collection.
    pub kind: Selection<RecordKind>,
    /// Maximum number of results (default: 20).
    pub limit: usize,
    /// Offset for pagination (default: 0).
    pub offset: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            kind: Selection::All,
            limit: 20,
            offset: 0,
        }
    }
}

/// Search result with records and metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
}

/// The record behind a hit, tagged with its collection.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "kebab-case")]
pub enum SearchRecord {
    Resource(Resource),
    Training(TrainingModule),
}

/// Single search result item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub record: SearchRecord,
    pub score: f32,
}

/// Maximum number of search results allowed.
const MAX_SEARCH_LIMIT: usize = 100;

/// GET /api/search - Ranked search across resources and training modules.
pub async fn search_catalog(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<SearchResponse> {
    let revision_id = current_revision(&state).await;

    let params = match query_params(query) {
        Ok(params) => params,
        Err(e) => return error(e, revision_id),
    };

    // Limit the maximum number of results
    let limit = params.limit.min(MAX_SEARCH_LIMIT);

    let page = match state.search.search(
        &params.q,
        params.kind.as_option().copied(),
        limit,
        params.offset,
    ) {
        Ok(page) => page,
        Err(e) => return error(e, revision_id),
    };

    // Fetch full record data for each hit
    let mut results = Vec::with_capacity(page.hits.len());
    for hit in page.hits {
        match load_record(&state, &hit).await {
            Ok(Some(record)) => results.push(SearchResultItem {
                record,
                score: hit.score,
            }),
            Ok(None) => tracing::debug!("Search hit {:?} {} no longer exists", hit.kind, hit.id),
            Err(e) => return error(e, revision_id),
        }
    }

    let empty_state = (page.total == 0).then(|| EmptyState {
        message: "No results found".to_string(),
    });

    success(
        SearchResponse {
            results,
            total: page.total,
            limit,
            offset: params.offset,
            empty_state,
        },
        revision_id,
    )
}

async fn load_record(state: &AppState, hit: &SearchHit) -> Result<Option<SearchRecord>, AppError> {
    Ok(match hit.kind {
        RecordKind::Resource => state
            .store
            .get_resource(hit.id)
            .await?
            .map(SearchRecord::Resource),
        RecordKind::Training => state
            .store
            .get_training(hit.id)
            .await?
            .map(SearchRecord::Training),
    })
}
