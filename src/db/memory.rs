//! In-memory record store seeded from the bundled catalog.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{check_version, resource_from_new, CatalogStore};
use crate::errors::AppError;
use crate::models::{
    Member, NewResource, Notification, NotificationPreferences, PreferencesRecord, Resource,
    RevisionInfo, TrainingModule, UpdateMemberRequest, UpdateResourceRequest,
};
use crate::seed::Seed;

struct MemoryState {
    revision_id: i64,
    generated_at: String,
    next_resource_id: i64,
    resources: Vec<Resource>,
    training: Vec<TrainingModule>,
    members: Vec<Member>,
    notifications: Vec<Notification>,
    preferences: HashMap<String, PreferencesRecord>,
}

impl MemoryState {
    fn from_seed(seed: &Seed, revision_id: i64) -> Self {
        Self {
            revision_id,
            generated_at: Utc::now().to_rfc3339(),
            next_resource_id: seed.next_resource_id(),
            resources: seed.resources.clone(),
            training: seed.training_modules.clone(),
            members: seed.members.clone(),
            notifications: seed.notifications.clone(),
            preferences: HashMap::new(),
        }
    }

    fn bump_revision(&mut self) {
        self.revision_id += 1;
        self.generated_at = Utc::now().to_rfc3339();
    }
}

/// Volatile store; all changes are lost on restart or `reset`.
pub struct MemoryStore {
    seed: Seed,
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new(seed: Seed) -> Self {
        let state = MemoryState::from_seed(&seed, 0);
        Self {
            seed,
            state: RwLock::new(state),
        }
    }

    /// Store populated with the bundled sample catalog.
    pub fn seeded() -> Result<Self, AppError> {
        Ok(Self::new(Seed::load()?))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn revision_info(&self) -> Result<RevisionInfo, AppError> {
        let state = self.state.read().await;
        Ok(RevisionInfo {
            revision_id: state.revision_id,
            generated_at: state.generated_at.clone(),
        })
    }

    async fn reset(&self) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        // Revision keeps counting so clients notice the reset.
        *state = MemoryState::from_seed(&self.seed, state.revision_id + 1);
        tracing::info!("In-memory catalog reset to seed data");
        Ok(())
    }

    // ==================== RESOURCES ====================

    async fn list_resources(&self) -> Result<Vec<Resource>, AppError> {
        Ok(self.state.read().await.resources.clone())
    }

    async fn get_resource(&self, id: i64) -> Result<Option<Resource>, AppError> {
        let state = self.state.read().await;
        Ok(state.resources.iter().find(|r| r.id == id).cloned())
    }

    async fn create_resource(&self, new: &NewResource) -> Result<Resource, AppError> {
        let mut state = self.state.write().await;
        let id = state.next_resource_id;
        state.next_resource_id += 1;

        let resource = resource_from_new(id, new, &Utc::now());
        state.resources.push(resource.clone());
        state.bump_revision();
        Ok(resource)
    }

    async fn update_resource(
        &self,
        id: i64,
        changes: &UpdateResourceRequest,
    ) -> Result<Resource, AppError> {
        let mut state = self.state.write().await;
        let slot = state
            .resources
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("Resource", id))?;

        check_version(changes.expected_version, slot.version)?;

        let mut updated = changes.apply_to(slot);
        updated.version = slot.version + 1;
        updated.updated_at = Utc::now().to_rfc3339();
        *slot = updated.clone();

        state.bump_revision();
        Ok(updated)
    }

    async fn delete_resource(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let before = state.resources.len();
        state.resources.retain(|r| r.id != id);
        if state.resources.len() == before {
            return Err(AppError::not_found("Resource", id));
        }
        state.bump_revision();
        Ok(())
    }

    // ==================== TRAINING ====================

    async fn list_training(&self) -> Result<Vec<TrainingModule>, AppError> {
        Ok(self.state.read().await.training.clone())
    }

    async fn get_training(&self, id: i64) -> Result<Option<TrainingModule>, AppError> {
        let state = self.state.read().await;
        Ok(state.training.iter().find(|m| m.id == id).cloned())
    }

    async fn set_training_progress(
        &self,
        id: i64,
        progress: u8,
    ) -> Result<TrainingModule, AppError> {
        let mut state = self.state.write().await;
        let module = state
            .training
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::not_found("Training module", id))?;
        module.set_progress(progress);
        let module = module.clone();
        state.bump_revision();
        Ok(module)
    }

    // ==================== MEMBERS ====================

    async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        Ok(self.state.read().await.members.clone())
    }

    async fn get_member(&self, id: i64) -> Result<Option<Member>, AppError> {
        let state = self.state.read().await;
        Ok(state.members.iter().find(|m| m.id == id).cloned())
    }

    async fn update_member(
        &self,
        id: i64,
        changes: &UpdateMemberRequest,
    ) -> Result<Member, AppError> {
        let mut state = self.state.write().await;
        let slot = state
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::not_found("Member", id))?;
        *slot = changes.apply_to(slot);
        let member = slot.clone();
        state.bump_revision();
        Ok(member)
    }

    async fn delete_member(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let before = state.members.len();
        state.members.retain(|m| m.id != id);
        if state.members.len() == before {
            return Err(AppError::not_found("Member", id));
        }
        state.bump_revision();
        Ok(())
    }

    // ==================== NOTIFICATIONS ====================

    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        Ok(self.state.read().await.notifications.clone())
    }

    async fn mark_notification_read(&self, id: i64) -> Result<Notification, AppError> {
        let mut state = self.state.write().await;
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::not_found("Notification", id))?;
        notification.read = true;
        let notification = notification.clone();
        state.bump_revision();
        Ok(notification)
    }

    async fn mark_all_notifications_read(&self) -> Result<usize, AppError> {
        let mut state = self.state.write().await;
        let mut changed = 0;
        for notification in state.notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        if changed > 0 {
            state.bump_revision();
        }
        Ok(changed)
    }

    async fn delete_notification(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let before = state.notifications.len();
        state.notifications.retain(|n| n.id != id);
        if state.notifications.len() == before {
            return Err(AppError::not_found("Notification", id));
        }
        state.bump_revision();
        Ok(())
    }

    // ==================== PREFERENCES ====================

    async fn get_preferences(&self, user_id: &str) -> Result<Option<PreferencesRecord>, AppError> {
        Ok(self.state.read().await.preferences.get(user_id).cloned())
    }

    async fn put_preferences(
        &self,
        user_id: &str,
        preferences: &NotificationPreferences,
    ) -> Result<PreferencesRecord, AppError> {
        let mut state = self.state.write().await;
        let record = PreferencesRecord {
            user_id: user_id.to_string(),
            preferences: preferences.clone(),
            updated_at: Some(Utc::now().to_rfc3339()),
        };
        state
            .preferences
            .insert(user_id.to_string(), record.clone());
        state.bump_revision();
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Language, PublishStatus, ResourceType, Sector};

    fn new_resource(title: &str) -> NewResource {
        NewResource {
            title: title.to_string(),
            description: "Uploaded during tests".to_string(),
            resource_type: ResourceType::Pdf,
            category: Category::Toolkit,
            sector: Sector::General,
            language: vec![Language::En],
            tags: Vec::new(),
            featured: false,
            is_public: true,
            status: PublishStatus::Draft,
            file_name: "test.pdf".to_string(),
            file_size: Some(10),
            file_key: "key".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let store = MemoryStore::seeded().unwrap();
        let before = store.list_resources().await.unwrap().len();

        store.delete_resource(6).await.unwrap();

        let after = store.list_resources().await.unwrap();
        assert_eq!(after.len(), before - 1);
        assert!(after.iter().all(|r| r.id != 6));
        assert!(matches!(
            store.delete_resource(6).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let store = MemoryStore::seeded().unwrap();
        let first = store.create_resource(&new_resource("First")).await.unwrap();
        assert_eq!(first.id, 13);
        store.delete_resource(first.id).await.unwrap();
        let second = store.create_resource(&new_resource("Second")).await.unwrap();
        assert_eq!(second.id, 14);
    }

    #[tokio::test]
    async fn test_update_checks_version() {
        let store = MemoryStore::seeded().unwrap();
        let changes = UpdateResourceRequest {
            featured: Some(true),
            expected_version: Some(1),
            ..Default::default()
        };
        let updated = store.update_resource(2, &changes).await.unwrap();
        assert!(updated.featured);
        assert_eq!(updated.version, 2);

        // Same expected version again is now stale.
        let err = store.update_resource(2, &changes).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { current_version: 2, .. }));
    }

    #[tokio::test]
    async fn test_reset_restores_seed_and_advances_revision() {
        let store = MemoryStore::seeded().unwrap();
        store.delete_resource(1).await.unwrap();
        store.mark_all_notifications_read().await.unwrap();
        let before_reset = store.revision_id().await.unwrap();

        store.reset().await.unwrap();

        assert_eq!(store.list_resources().await.unwrap().len(), 12);
        assert!(store
            .list_notifications()
            .await
            .unwrap()
            .iter()
            .any(|n| !n.read));
        assert_eq!(store.revision_id().await.unwrap(), before_reset + 1);
    }

    #[tokio::test]
    async fn test_mark_all_read_counts_changes() {
        let store = MemoryStore::seeded().unwrap();
        assert_eq!(store.mark_all_notifications_read().await.unwrap(), 3);
        let revision = store.revision_id().await.unwrap();
        assert_eq!(store.mark_all_notifications_read().await.unwrap(), 0);
        assert_eq!(store.revision_id().await.unwrap(), revision);
    }

    #[tokio::test]
    async fn test_preferences_default_to_none() {
        let store = MemoryStore::seeded().unwrap();
        assert!(store.get_preferences("u-1").await.unwrap().is_none());
        let prefs = NotificationPreferences {
            newsletter: true,
            ..Default::default()
        };
        let saved = store.put_preferences("u-1", &prefs).await.unwrap();
        assert!(saved.updated_at.is_some());
        assert_eq!(
            store.get_preferences("u-1").await.unwrap().unwrap().preferences,
            prefs
        );
    }
}
