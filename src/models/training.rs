//! Training module model for the course catalog and learner dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Category, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// Where the current learner stands on a module, derived from progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearnerStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl LearnerStatus {
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => LearnerStatus::NotStarted,
            100..=u8::MAX => LearnerStatus::Completed,
            _ => LearnerStatus::InProgress,
        }
    }
}

/// A self-paced training module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingModule {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub level: Level,
    pub language: Vec<Language>,
    pub duration_minutes: u32,
    pub enrolled: u64,
    pub rating: f64,
    pub date_added: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Completion percentage, 0..=100
    #[serde(default)]
    pub progress: u8,
    /// Always recomputed from `progress`; never trusted from input
    #[serde(default)]
    pub status: LearnerStatus,
}

impl TrainingModule {
    /// Set progress, clamped to 100, and refresh the derived status.
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.status = LearnerStatus::from_progress(self.progress);
    }
}

/// Request body for recording learner progress on a module.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdateRequest {
    /// Percent complete; range-checked by the handler
    pub progress: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_progress() {
        assert_eq!(LearnerStatus::from_progress(0), LearnerStatus::NotStarted);
        assert_eq!(LearnerStatus::from_progress(1), LearnerStatus::InProgress);
        assert_eq!(LearnerStatus::from_progress(99), LearnerStatus::InProgress);
        assert_eq!(LearnerStatus::from_progress(100), LearnerStatus::Completed);
    }
}
