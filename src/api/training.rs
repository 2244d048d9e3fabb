//! Training catalog API endpoints.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};

use super::{current_revision, error, json_body, query_params, record_id, success, ApiResult};
use crate::catalog::{run_pipeline, Listing, TrainingQuery};
use crate::errors::{AppError, FieldErrors};
use crate::models::{ProgressUpdateRequest, TrainingModule};
use crate::AppState;

/// GET /api/training - Filtered, sorted training listing.
pub async fn list_training(
    State(state): State<AppState>,
    query: Result<Query<TrainingQuery>, QueryRejection>,
) -> ApiResult<Listing<TrainingModule>> {
    let revision_id = current_revision(&state).await;

    let params = match query_params(query) {
        Ok(params) => params,
        Err(e) => return error(e, revision_id),
    };

    match state.store.list_training().await {
        Ok(modules) => success(
            run_pipeline(
                modules,
                &params.predicate(),
                params.sort_key(),
                params.page(),
                "training modules",
            ),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/training/:id - Get a single training module.
pub async fn get_training(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<TrainingModule> {
    let revision_id = current_revision(&state).await;

    let id = match record_id(path) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    match state.store.get_training(id).await {
        Ok(Some(module)) => success(module, revision_id),
        Ok(None) => error(AppError::not_found("Training module", id), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/training/:id/progress - Record the learner's progress.
pub async fn set_training_progress(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProgressUpdateRequest>, JsonRejection>,
) -> ApiResult<TrainingModule> {
    let revision_id = current_revision(&state).await;

    let (id, request) = match (record_id(path), json_body(body)) {
        (Ok(id), Ok(request)) => (id, request),
        (Err(e), _) | (_, Err(e)) => return error(e, revision_id),
    };

    let progress = match u8::try_from(request.progress) {
        Ok(progress) if progress <= 100 => progress,
        _ => {
            let mut fields = FieldErrors::new();
            fields.insert(
                "progress".to_string(),
                "Progress must be between 0 and 100".to_string(),
            );
            return error(AppError::InvalidFields(fields), revision_id);
        }
    };

    match state.store.set_training_progress(id, progress).await {
        Ok(module) => {
            let new_revision = current_revision(&state).await;
            success(module, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
