//! Record store abstraction and its implementations.
//!
//! Handlers only see [`CatalogStore`]; the in-memory store backs tests and the
//! default configuration, the SQLite store persists across restarts.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{init_database, SqliteStore};

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{
    CatalogSnapshot, Member, NewResource, Notification, NotificationPreferences,
    PreferencesRecord, Resource, RevisionInfo, TrainingModule, UpdateMemberRequest,
    UpdateResourceRequest,
};

pub const SCHEMA_VERSION: i32 = 1;

/// Repository over every catalog collection.
///
/// Lists come back in store order (ascending id). Every successful write
/// bumps the revision id.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Get revision info.
    async fn revision_info(&self) -> Result<RevisionInfo, AppError>;

    /// Get the current revision ID.
    async fn revision_id(&self) -> Result<i64, AppError> {
        Ok(self.revision_info().await?.revision_id)
    }

    /// Get every collection at once.
    async fn snapshot(&self) -> Result<CatalogSnapshot, AppError> {
        let info = self.revision_info().await?;
        Ok(CatalogSnapshot {
            schema_version: SCHEMA_VERSION,
            generated_at: info.generated_at,
            revision_id: info.revision_id,
            resources: self.list_resources().await?,
            training_modules: self.list_training().await?,
            members: self.list_members().await?,
            notifications: self.list_notifications().await?,
        })
    }

    /// Discard all changes and restore the bundled seed.
    async fn reset(&self) -> Result<(), AppError>;

    // ==================== RESOURCES ====================

    async fn list_resources(&self) -> Result<Vec<Resource>, AppError>;
    async fn get_resource(&self, id: i64) -> Result<Option<Resource>, AppError>;
    async fn create_resource(&self, new: &NewResource) -> Result<Resource, AppError>;
    /// Update a resource with optimistic concurrency control.
    async fn update_resource(
        &self,
        id: i64,
        changes: &UpdateResourceRequest,
    ) -> Result<Resource, AppError>;
    async fn delete_resource(&self, id: i64) -> Result<(), AppError>;

    // ==================== TRAINING ====================

    async fn list_training(&self) -> Result<Vec<TrainingModule>, AppError>;
    async fn get_training(&self, id: i64) -> Result<Option<TrainingModule>, AppError>;
    async fn set_training_progress(&self, id: i64, progress: u8)
        -> Result<TrainingModule, AppError>;

    // ==================== MEMBERS ====================

    async fn list_members(&self) -> Result<Vec<Member>, AppError>;
    async fn get_member(&self, id: i64) -> Result<Option<Member>, AppError>;
    async fn update_member(
        &self,
        id: i64,
        changes: &UpdateMemberRequest,
    ) -> Result<Member, AppError>;
    async fn delete_member(&self, id: i64) -> Result<(), AppError>;

    // ==================== NOTIFICATIONS ====================

    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError>;
    async fn mark_notification_read(&self, id: i64) -> Result<Notification, AppError>;
    /// Returns how many notifications changed state.
    async fn mark_all_notifications_read(&self) -> Result<usize, AppError>;
    async fn delete_notification(&self, id: i64) -> Result<(), AppError>;

    // ==================== PREFERENCES ====================

    /// Stored preferences, or `None` when the user never saved any.
    async fn get_preferences(&self, user_id: &str) -> Result<Option<PreferencesRecord>, AppError>;
    async fn put_preferences(
        &self,
        user_id: &str,
        preferences: &NotificationPreferences,
    ) -> Result<PreferencesRecord, AppError>;
}

/// Reject a write whose expected version no longer matches.
pub(crate) fn check_version(expected: Option<i64>, current: i64) -> Result<(), AppError> {
    match expected {
        Some(expected) if expected != current => Err(AppError::Conflict {
            message: format!(
                "Version mismatch: expected {}, current {}",
                expected, current
            ),
            current_version: current,
        }),
        _ => Ok(()),
    }
}

/// Build a stored resource from validated upload metadata.
pub(crate) fn resource_from_new(
    id: i64,
    new: &NewResource,
    now: &chrono::DateTime<chrono::Utc>,
) -> Resource {
    Resource {
        id,
        title: new.title.clone(),
        description: new.description.clone(),
        resource_type: new.resource_type,
        category: new.category,
        sector: new.sector,
        language: new.language.clone(),
        downloads: 0,
        popularity: 0.0,
        date_added: now.date_naive(),
        featured: new.featured,
        status: new.status,
        is_public: new.is_public,
        tags: new.tags.clone(),
        file_name: Some(new.file_name.clone()),
        file_size: new.file_size,
        file_key: Some(new.file_key.clone()),
        updated_at: now.to_rfc3339(),
        version: 1,
    }
}
