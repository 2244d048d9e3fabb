//! Account settings endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;

use super::{current_revision, error, json_body, success, ApiResult};
use crate::forms::{simulate_latency, validate_password_change};
use crate::models::{OperationReceipt, PasswordChangeRequest};
use crate::AppState;

/// POST /api/account/password - Simulated password change.
///
/// Nothing is stored; a valid form succeeds after the simulated delay.
pub async fn change_password(
    State(state): State<AppState>,
    body: Result<Json<PasswordChangeRequest>, JsonRejection>,
) -> ApiResult<OperationReceipt> {
    let revision_id = current_revision(&state).await;

    let request = match json_body(body) {
        Ok(request) => request,
        Err(e) => return error(e, revision_id),
    };

    if let Err(e) = validate_password_change(&request) {
        return error(e, revision_id);
    }

    simulate_latency(state.config.simulated_latency).await;
    tracing::info!("Password change accepted");

    success(
        OperationReceipt {
            message: "Password updated successfully".to_string(),
            completed_at: Utc::now().to_rfc3339(),
        },
        revision_id,
    )
}
