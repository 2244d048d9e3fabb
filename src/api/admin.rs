//! Administrative endpoints.

use axum::extract::State;

use super::{current_revision, error, success, ApiResult};
use crate::errors::AppError;
use crate::models::RevisionInfo;
use crate::AppState;

/// POST /api/admin/reset - Discard all changes and restore the seed data.
pub async fn reset_catalog(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_id = current_revision(&state).await;

    match reset_and_reindex(&state).await {
        Ok(info) => {
            tracing::info!(revision_id = info.revision_id, "Catalog reset");
            let new_revision = info.revision_id;
            success(info, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

async fn reset_and_reindex(state: &AppState) -> Result<RevisionInfo, AppError> {
    state.store.reset().await?;

    let resources = state.store.list_resources().await?;
    let training = state.store.list_training().await?;
    state.search.rebuild(&resources, &training).await?;

    state.store.revision_info().await
}
