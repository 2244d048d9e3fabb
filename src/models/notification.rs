//! Notification inbox and per-user subscription preferences.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    NewResource,
    TrainingReminder,
    Event,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadState {
    Read,
    Unread,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_on: NaiveDate,
}

impl Notification {
    pub fn read_state(&self) -> ReadState {
        if self.read {
            ReadState::Read
        } else {
            ReadState::Unread
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
    Never,
}

/// Subscription flags a user toggles on the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPreferences {
    pub new_resources: bool,
    pub training_reminders: bool,
    pub event_updates: bool,
    pub in_app: bool,
    pub newsletter: bool,
    pub digest: DigestFrequency,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            new_resources: true,
            training_reminders: true,
            event_updates: true,
            in_app: true,
            newsletter: false,
            digest: DigestFrequency::Weekly,
        }
    }
}

/// Preferences as stored for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRecord {
    pub user_id: String,
    pub preferences: NotificationPreferences,
    /// `None` while the user still reads the defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PreferencesRecord {
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            preferences: NotificationPreferences::default(),
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_preferences_fill_defaults() {
        let prefs: NotificationPreferences =
            serde_json::from_str(r#"{ "newsletter": true, "digest": "daily" }"#).unwrap();
        assert!(prefs.newsletter);
        assert!(prefs.new_resources);
        assert_eq!(prefs.digest, DigestFrequency::Daily);
    }
}
