//! Account settings requests.

use serde::{Deserialize, Serialize};

/// Request body of the change-password form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

/// Acknowledgement returned once a simulated account operation completes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationReceipt {
    pub message: String,
    pub completed_at: String,
}
