//! Change-password form validation.

use super::{finish, required_text};
use crate::errors::{AppError, FieldErrors};
use crate::models::PasswordChangeRequest;

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Check the change-password form. No credential store exists, so a valid
/// form is all that is needed for the simulated change to succeed.
pub fn validate_password_change(request: &PasswordChangeRequest) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();

    let current = required_text(
        &mut errors,
        "currentPassword",
        request.current_password.as_deref(),
        "Current password is required",
    );
    let new = required_text(
        &mut errors,
        "newPassword",
        request.new_password.as_deref(),
        "New password is required",
    );
    let confirm = required_text(
        &mut errors,
        "confirmPassword",
        request.confirm_password.as_deref(),
        "Please confirm the new password",
    );

    if let Some(new) = &new {
        if new.chars().count() < MIN_PASSWORD_CHARS {
            errors.insert(
                "newPassword".to_string(),
                format!(
                    "Password must be at least {} characters",
                    MIN_PASSWORD_CHARS
                ),
            );
        } else if current.as_ref() == Some(new) {
            errors.insert(
                "newPassword".to_string(),
                "New password must differ from the current one".to_string(),
            );
        }
        if let Some(confirm) = &confirm {
            if confirm != new {
                errors.insert(
                    "confirmPassword".to_string(),
                    "Passwords do not match".to_string(),
                );
            }
        }
    }

    finish(errors, || Some(()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(current: &str, new: &str, confirm: &str) -> PasswordChangeRequest {
        PasswordChangeRequest {
            current_password: Some(current.to_string()),
            new_password: Some(new.to_string()),
            confirm_password: Some(confirm.to_string()),
        }
    }

    fn fields(result: Result<(), AppError>) -> FieldErrors {
        match result {
            Err(AppError::InvalidFields(fields)) => fields,
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_change() {
        assert!(validate_password_change(&request("old-secret", "new-secret", "new-secret")).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let errors = fields(validate_password_change(&PasswordChangeRequest::default()));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_short_and_mismatched() {
        let errors = fields(validate_password_change(&request("old-secret", "short", "shorter")));
        assert!(errors["newPassword"].contains("at least 8"));
        assert_eq!(errors["confirmPassword"], "Passwords do not match");
    }

    #[test]
    fn test_reuse_is_rejected() {
        let errors = fields(validate_password_change(&request(
            "same-secret",
            "same-secret",
            "same-secret",
        )));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("newPassword"));
    }
}
