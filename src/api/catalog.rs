//! Whole-catalog snapshot endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::errors::AppErrorWithRevision;
use crate::models::{CatalogSnapshot, RevisionInfo};
use crate::AppState;

/// GET /api/catalog - Every collection in one payload.
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<CatalogSnapshot> {
    let snapshot = state
        .store
        .snapshot()
        .await
        .map_err(|e| AppErrorWithRevision {
            error: e,
            revision_id: 0,
        })?;

    let revision_id = snapshot.revision_id;
    success(snapshot, revision_id)
}

/// GET /api/catalog/revision - Get the current revision info.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_info = state
        .store
        .revision_info()
        .await
        .map_err(|e| AppErrorWithRevision {
            error: e,
            revision_id: 0,
        })?;

    let revision_id = revision_info.revision_id;
    success(revision_info, revision_id)
}
