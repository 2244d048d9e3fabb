//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod account;
mod admin;
mod catalog;
mod dashboard;
mod members;
mod notifications;
mod preferences;
mod resources;
mod search;
mod training;

pub use account::*;
pub use admin::*;
pub use catalog::*;
pub use dashboard::*;
pub use members::*;
pub use notifications::*;
pub use preferences::*;
pub use resources::*;
pub use search::*;
pub use training::*;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// Revision to stamp on a response; a failing store reads as revision 0.
async fn current_revision(state: &AppState) -> i64 {
    state.store.revision_id().await.unwrap_or(0)
}

// Extractor rejections are folded into the error envelope instead of axum's
// plain-text bodies.

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

fn record_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

/// Keep the search index in step with a changed resource; failures only log.
async fn reindex_resource(state: &AppState, resource: &crate::models::Resource) {
    if let Err(e) = state.search.index_resource(resource).await {
        tracing::warn!("Failed to re-index resource {}: {}", resource.id, e);
    }
}
