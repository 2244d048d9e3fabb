//! Form validation and simulated asynchronous completion.
//!
//! Validators collect every problem into a [`FieldErrors`] map so the client
//! can mark all offending inputs at once. Nothing here touches the store.

mod password;
mod upload;

pub use password::*;
pub use upload::*;

use std::time::Duration;

use crate::errors::{AppError, FieldErrors};

/// Wait out the artificial processing delay of upload-style flows.
///
/// Dropping the future (client disconnect) cancels the wait, so callers
/// must only mutate after this returns.
pub async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Trimmed value of a required text field, recording a message when blank.
fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    message: &str,
) -> Option<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => {
            errors.insert(field.to_string(), message.to_string());
            None
        }
    }
}

/// Turn collected field errors into the request outcome.
fn finish<T>(errors: FieldErrors, value: impl FnOnce() -> Option<T>) -> Result<T, AppError> {
    if !errors.is_empty() {
        return Err(AppError::InvalidFields(errors));
    }
    value().ok_or_else(|| AppError::Internal("Validated form is incomplete".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims_and_reports() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            required_text(&mut errors, "title", Some("  Guide "), "Title is required"),
            Some("Guide".to_string())
        );
        assert_eq!(
            required_text(&mut errors, "title", Some("   "), "Title is required"),
            None
        );
        assert_eq!(errors.get("title").map(String::as_str), Some("Title is required"));
    }

    #[tokio::test]
    async fn test_zero_latency_returns_immediately() {
        let started = std::time::Instant::now();
        simulate_latency(Duration::ZERO).await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_waits_for_the_configured_delay() {
        let started = tokio::time::Instant::now();
        simulate_latency(Duration::from_millis(1500)).await;
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
