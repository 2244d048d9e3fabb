//! Learner dashboard endpoint.

use axum::extract::State;

use super::{current_revision, error, success, ApiResult};
use crate::errors::AppError;
use crate::models::DashboardSummary;
use crate::AppState;

/// GET /api/dashboard - Headline numbers for the learner dashboard.
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<DashboardSummary> {
    let revision_id = current_revision(&state).await;

    match summarize(&state).await {
        Ok(summary) => success(summary, revision_id),
        Err(e) => error(e, revision_id),
    }
}

async fn summarize(state: &AppState) -> Result<DashboardSummary, AppError> {
    let resources = state.store.list_resources().await?;
    let training = state.store.list_training().await?;
    let notifications = state.store.list_notifications().await?;
    let members = state.store.list_members().await?;

    Ok(DashboardSummary::compute(
        &resources,
        &training,
        &notifications,
        &members,
    ))
}
