//! Notification preference endpoints.

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};

use super::{current_revision, error, json_body, success, ApiResult};
use crate::errors::AppError;
use crate::models::{NotificationPreferences, PreferencesRecord};
use crate::AppState;

fn check_user_id(user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("User id is required".to_string()));
    }
    Ok(())
}

/// GET /api/users/:userId/preferences - Stored preferences or the defaults.
pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<PreferencesRecord> {
    let revision_id = current_revision(&state).await;

    if let Err(e) = check_user_id(&user_id) {
        return error(e, revision_id);
    }

    match state.store.get_preferences(&user_id).await {
        Ok(Some(record)) => success(record, revision_id),
        Ok(None) => success(PreferencesRecord::defaults_for(&user_id), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/users/:userId/preferences - Replace the user's preferences.
///
/// Omitted flags take their default value.
pub async fn put_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<NotificationPreferences>, JsonRejection>,
) -> ApiResult<PreferencesRecord> {
    let revision_id = current_revision(&state).await;

    let preferences = match check_user_id(&user_id).and_then(|()| json_body(body)) {
        Ok(preferences) => preferences,
        Err(e) => return error(e, revision_id),
    };

    match state.store.put_preferences(&user_id, &preferences).await {
        Ok(record) => {
            let new_revision = current_revision(&state).await;
            success(record, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
