//! Notification inbox API endpoints.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    extract::{Path, Query, State},
};
use serde::Serialize;

use super::{current_revision, error, query_params, record_id, success, ApiResult};
use crate::catalog::{run_pipeline, Listing, NotificationQuery};
use crate::models::Notification;
use crate::AppState;

/// Outcome of marking the whole inbox as read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResult {
    pub updated: usize,
}

/// GET /api/notifications - Filtered, sorted notification listing.
pub async fn list_notifications(
    State(state): State<AppState>,
    query: Result<Query<NotificationQuery>, QueryRejection>,
) -> ApiResult<Listing<Notification>> {
    let revision_id = current_revision(&state).await;

    let params = match query_params(query) {
        Ok(params) => params,
        Err(e) => return error(e, revision_id),
    };

    match state.store.list_notifications().await {
        Ok(notifications) => success(
            run_pipeline(
                notifications,
                &params.predicate(),
                params.sort_key(),
                params.page(),
                "notifications",
            ),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/notifications/:id/read - Mark one notification as read.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Notification> {
    let revision_id = current_revision(&state).await;

    let id = match record_id(path) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    match state.store.mark_notification_read(id).await {
        Ok(notification) => {
            let new_revision = current_revision(&state).await;
            success(notification, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/notifications/read-all - Mark every notification as read.
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
) -> ApiResult<MarkAllReadResult> {
    let revision_id = current_revision(&state).await;

    match state.store.mark_all_notifications_read().await {
        Ok(updated) => {
            let new_revision = current_revision(&state).await;
            success(MarkAllReadResult { updated }, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/notifications/:id - Dismiss a notification.
pub async fn delete_notification(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;

    let id = match record_id(path) {
        Ok(id) => id,
        Err(e) => return error(e, revision_id),
    };

    match state.store.delete_notification(id).await {
        Ok(()) => {
            let new_revision = current_revision(&state).await;
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
