//! SQLite-backed record store.
//!
//! Uses prepared statements and transactions for data integrity. Enumerated
//! fields are stored as their serialized names, lists as JSON arrays.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;

use super::{check_version, resource_from_new, CatalogStore, SCHEMA_VERSION};
use crate::errors::AppError;
use crate::models::{
    name_of, parse_name, Member, NewResource, Notification, NotificationPreferences,
    PreferencesRecord, Resource, RevisionInfo, TrainingModule, UpdateMemberRequest,
    UpdateResourceRequest,
};
use crate::seed::Seed;

const RESOURCE_COLUMNS: &str = "id, title, description, resource_type, category, sector, \
     language, downloads, popularity, date_added, featured, status, is_public, tags, \
     file_name, file_size, file_key, updated_at, version";

const TRAINING_COLUMNS: &str = "id, title, description, category, level, language, \
     duration_minutes, enrolled, rating, date_added, tags, progress";

const MEMBER_COLUMNS: &str =
    "id, name, email, organization, role, status, joined_on, courses_completed";

const NOTIFICATION_COLUMNS: &str = "id, title, message, kind, read, created_on";

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL DEFAULT 1,
            revision_id INTEGER NOT NULL DEFAULT 0,
            generated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO meta (id, schema_version, revision_id, generated_at)
        VALUES (1, 1, 0, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    // AUTOINCREMENT keeps deleted resource ids from being handed out again.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            resource_type TEXT NOT NULL,
            category TEXT NOT NULL,
            sector TEXT NOT NULL,
            language TEXT NOT NULL,
            downloads INTEGER NOT NULL DEFAULT 0,
            popularity REAL NOT NULL DEFAULT 0,
            date_added TEXT NOT NULL,
            featured INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL,
            is_public INTEGER NOT NULL DEFAULT 1,
            tags TEXT NOT NULL,
            file_name TEXT,
            file_size INTEGER,
            file_key TEXT,
            updated_at TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS training_modules (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            level TEXT NOT NULL,
            language TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            enrolled INTEGER NOT NULL DEFAULT 0,
            rating REAL NOT NULL DEFAULT 0,
            date_added TEXT NOT NULL,
            tags TEXT NOT NULL,
            progress INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            organization TEXT NOT NULL,
            role TEXT NOT NULL,
            status TEXT NOT NULL,
            joined_on TEXT NOT NULL,
            courses_completed INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            kind TEXT NOT NULL,
            read INTEGER NOT NULL DEFAULT 0,
            created_on TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS preferences (
            user_id TEXT PRIMARY KEY,
            body TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_resources_category ON resources(category);
        CREATE INDEX IF NOT EXISTS idx_resources_status ON resources(status);
        CREATE INDEX IF NOT EXISTS idx_members_status ON members(status);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Persistent store over a SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    seed: Seed,
}

impl SqliteStore {
    /// Wrap a migrated pool, inserting the seed when the database is new.
    pub async fn open(pool: SqlitePool, seed: Seed) -> Result<Self, AppError> {
        let store = Self { pool, seed };

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM resources")
            .fetch_one(&store.pool)
            .await?
            .try_get("n")?;
        let meta_revision = store.revision_id().await?;

        // A fresh database has no rows and has never been written to.
        if count == 0 && meta_revision == 0 {
            let mut tx = store.pool.begin().await?;
            insert_seed(&mut tx, &store.seed).await?;
            tx.commit().await?;
            tracing::info!(
                "Seeded database with {} resources",
                store.seed.resources.len()
            );
        }

        Ok(store)
    }

    /// Increment the revision ID and return the new value.
    async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.revision_id().await
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.try_get("revision_id")?,
            generated_at: row.try_get("generated_at")?,
        })
    }

    async fn reset(&self) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM resources;
            DELETE FROM training_modules;
            DELETE FROM members;
            DELETE FROM notifications;
            DELETE FROM preferences;
            DELETE FROM sqlite_sequence WHERE name = 'resources';
            "#,
        )
        .execute(&mut *tx)
        .await?;

        insert_seed(&mut tx, &self.seed).await?;

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE meta SET revision_id = revision_id + 1, generated_at = ?, schema_version = ? WHERE id = 1",
        )
        .bind(&now)
        .bind(SCHEMA_VERSION)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!("SQLite catalog reset to seed data");
        Ok(())
    }

    // ==================== RESOURCE OPERATIONS ====================

    async fn list_resources(&self) -> Result<Vec<Resource>, AppError> {
        let sql = format!("SELECT {} FROM resources ORDER BY id", RESOURCE_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(resource_from_row).collect()
    }

    async fn get_resource(&self, id: i64) -> Result<Option<Resource>, AppError> {
        let sql = format!("SELECT {} FROM resources WHERE id = ?", RESOURCE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(resource_from_row).transpose()
    }

    async fn create_resource(&self, new: &NewResource) -> Result<Resource, AppError> {
        let mut conn = self.pool.acquire().await?;
        // The id is assigned by SQLite; 0 is a placeholder until the insert returns.
        let mut resource = resource_from_new(0, new, &Utc::now());
        resource.id = insert_resource(&mut conn, &resource, false).await?;
        drop(conn);

        self.increment_revision().await?;
        Ok(resource)
    }

    async fn update_resource(
        &self,
        id: i64,
        changes: &UpdateResourceRequest,
    ) -> Result<Resource, AppError> {
        let existing = self
            .get_resource(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource", id))?;

        check_version(changes.expected_version, existing.version)?;

        let mut updated = changes.apply_to(&existing);
        updated.version = existing.version + 1;
        updated.updated_at = Utc::now().to_rfc3339();

        // Conditional UPDATE with version check to prevent lost updates
        let result = sqlx::query(
            "UPDATE resources SET title = ?, description = ?, resource_type = ?, category = ?, sector = ?, language = ?, featured = ?, status = ?, is_public = ?, tags = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?",
        )
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(name_of(&updated.resource_type))
        .bind(name_of(&updated.category))
        .bind(name_of(&updated.sector))
        .bind(serde_json::to_string(&updated.language)?)
        .bind(updated.featured)
        .bind(name_of(&updated.status))
        .bind(updated.is_public)
        .bind(serde_json::to_string(&updated.tags)?)
        .bind(&updated.updated_at)
        .bind(updated.version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Version changed between read and write
            let current = self.get_resource(id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|r| r.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;
        Ok(updated)
    }

    async fn delete_resource(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Resource", id));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== TRAINING OPERATIONS ====================

    async fn list_training(&self) -> Result<Vec<TrainingModule>, AppError> {
        let sql = format!(
            "SELECT {} FROM training_modules ORDER BY id",
            TRAINING_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(training_from_row).collect()
    }

    async fn get_training(&self, id: i64) -> Result<Option<TrainingModule>, AppError> {
        let sql = format!(
            "SELECT {} FROM training_modules WHERE id = ?",
            TRAINING_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(training_from_row).transpose()
    }

    async fn set_training_progress(
        &self,
        id: i64,
        progress: u8,
    ) -> Result<TrainingModule, AppError> {
        let result = sqlx::query("UPDATE training_modules SET progress = ? WHERE id = ?")
            .bind(i64::from(progress.min(100)))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Training module", id));
        }

        self.increment_revision().await?;
        self.get_training(id)
            .await?
            .ok_or_else(|| AppError::not_found("Training module", id))
    }

    // ==================== MEMBER OPERATIONS ====================

    async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        let sql = format!("SELECT {} FROM members ORDER BY id", MEMBER_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(member_from_row).collect()
    }

    async fn get_member(&self, id: i64) -> Result<Option<Member>, AppError> {
        let sql = format!("SELECT {} FROM members WHERE id = ?", MEMBER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(member_from_row).transpose()
    }

    async fn update_member(
        &self,
        id: i64,
        changes: &UpdateMemberRequest,
    ) -> Result<Member, AppError> {
        let existing = self
            .get_member(id)
            .await?
            .ok_or_else(|| AppError::not_found("Member", id))?;
        let updated = changes.apply_to(&existing);

        let result = sqlx::query(
            "UPDATE members SET role = ?, status = ?, organization = ? WHERE id = ?",
        )
        .bind(name_of(&updated.role))
        .bind(name_of(&updated.status))
        .bind(&updated.organization)
        .bind(id)
        .execute(&self.pool)
        .await?;

        // Deleted between the read and the write
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Member", id));
        }

        self.increment_revision().await?;
        Ok(updated)
    }

    async fn delete_member(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Member", id));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== NOTIFICATION OPERATIONS ====================

    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        let sql = format!(
            "SELECT {} FROM notifications ORDER BY id",
            NOTIFICATION_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(notification_from_row).collect()
    }

    async fn mark_notification_read(&self, id: i64) -> Result<Notification, AppError> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Notification", id));
        }

        self.increment_revision().await?;

        let sql = format!(
            "SELECT {} FROM notifications WHERE id = ?",
            NOTIFICATION_COLUMNS
        );
        let row = sqlx::query(&sql).bind(id).fetch_one(&self.pool).await?;
        notification_from_row(&row)
    }

    async fn mark_all_notifications_read(&self) -> Result<usize, AppError> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE read = 0")
            .execute(&self.pool)
            .await?;

        let changed = result.rows_affected() as usize;
        if changed > 0 {
            self.increment_revision().await?;
        }
        Ok(changed)
    }

    async fn delete_notification(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Notification", id));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== PREFERENCE OPERATIONS ====================

    async fn get_preferences(&self, user_id: &str) -> Result<Option<PreferencesRecord>, AppError> {
        let row = sqlx::query("SELECT user_id, body, updated_at FROM preferences WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<PreferencesRecord, AppError> {
            Ok(PreferencesRecord {
                user_id: row.try_get("user_id")?,
                preferences: json_col(&row, "body")?,
                updated_at: Some(row.try_get("updated_at")?),
            })
        })
        .transpose()
    }

    async fn put_preferences(
        &self,
        user_id: &str,
        preferences: &NotificationPreferences,
    ) -> Result<PreferencesRecord, AppError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO preferences (user_id, body, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(serde_json::to_string(preferences)?)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(PreferencesRecord {
            user_id: user_id.to_string(),
            preferences: preferences.clone(),
            updated_at: Some(now),
        })
    }
}

// Seeding

async fn insert_seed(conn: &mut SqliteConnection, seed: &Seed) -> Result<(), AppError> {
    for resource in &seed.resources {
        insert_resource(conn, resource, true).await?;
    }

    for module in &seed.training_modules {
        let sql = format!(
            "INSERT INTO training_modules ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TRAINING_COLUMNS
        );
        sqlx::query(&sql)
            .bind(module.id)
            .bind(&module.title)
            .bind(&module.description)
            .bind(name_of(&module.category))
            .bind(name_of(&module.level))
            .bind(serde_json::to_string(&module.language)?)
            .bind(i64::from(module.duration_minutes))
            .bind(module.enrolled as i64)
            .bind(module.rating)
            .bind(module.date_added)
            .bind(serde_json::to_string(&module.tags)?)
            .bind(i64::from(module.progress))
            .execute(&mut *conn)
            .await?;
    }

    for member in &seed.members {
        let sql = format!(
            "INSERT INTO members ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            MEMBER_COLUMNS
        );
        sqlx::query(&sql)
            .bind(member.id)
            .bind(&member.name)
            .bind(&member.email)
            .bind(&member.organization)
            .bind(name_of(&member.role))
            .bind(name_of(&member.status))
            .bind(member.joined_on)
            .bind(i64::from(member.courses_completed))
            .execute(&mut *conn)
            .await?;
    }

    for notification in &seed.notifications {
        let sql = format!(
            "INSERT INTO notifications ({}) VALUES (?, ?, ?, ?, ?, ?)",
            NOTIFICATION_COLUMNS
        );
        sqlx::query(&sql)
            .bind(notification.id)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(name_of(&notification.kind))
            .bind(notification.read)
            .bind(notification.created_on)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Insert a resource row and return its id. `keep_id` preserves seed ids.
async fn insert_resource(
    conn: &mut SqliteConnection,
    resource: &Resource,
    keep_id: bool,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO resources (id, title, description, resource_type, category, sector, language, downloads, popularity, date_added, featured, status, is_public, tags, file_name, file_size, file_key, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(keep_id.then_some(resource.id))
    .bind(&resource.title)
    .bind(&resource.description)
    .bind(name_of(&resource.resource_type))
    .bind(name_of(&resource.category))
    .bind(name_of(&resource.sector))
    .bind(serde_json::to_string(&resource.language)?)
    .bind(resource.downloads as i64)
    .bind(resource.popularity)
    .bind(resource.date_added)
    .bind(resource.featured)
    .bind(name_of(&resource.status))
    .bind(resource.is_public)
    .bind(serde_json::to_string(&resource.tags)?)
    .bind(&resource.file_name)
    .bind(resource.file_size.map(|s| s as i64))
    .bind(&resource.file_key)
    .bind(&resource.updated_at)
    .bind(resource.version)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

// Helper functions for row conversion

fn enum_col<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T, AppError> {
    let raw: String = row.try_get(column)?;
    parse_name(&raw).map_err(|e| {
        AppError::Database(format!("Invalid value '{}' in column {}: {}", raw, column, e))
    })
}

fn json_col<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T, AppError> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::Database(format!("Invalid JSON in column {}: {}", column, e)))
}

fn resource_from_row(row: &SqliteRow) -> Result<Resource, AppError> {
    let downloads: i64 = row.try_get("downloads")?;
    let file_size: Option<i64> = row.try_get("file_size")?;
    let date_added: NaiveDate = row.try_get("date_added")?;

    Ok(Resource {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        resource_type: enum_col(row, "resource_type")?,
        category: enum_col(row, "category")?,
        sector: enum_col(row, "sector")?,
        language: json_col(row, "language")?,
        downloads: downloads.max(0) as u64,
        popularity: row.try_get("popularity")?,
        date_added,
        featured: row.try_get("featured")?,
        status: enum_col(row, "status")?,
        is_public: row.try_get("is_public")?,
        tags: json_col(row, "tags")?,
        file_name: row.try_get("file_name")?,
        file_size: file_size.map(|s| s.max(0) as u64),
        file_key: row.try_get("file_key")?,
        updated_at: row.try_get("updated_at")?,
        version: row.try_get("version")?,
    })
}

fn training_from_row(row: &SqliteRow) -> Result<TrainingModule, AppError> {
    let duration: i64 = row.try_get("duration_minutes")?;
    let enrolled: i64 = row.try_get("enrolled")?;
    let progress: i64 = row.try_get("progress")?;

    let mut module = TrainingModule {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category: enum_col(row, "category")?,
        level: enum_col(row, "level")?,
        language: json_col(row, "language")?,
        duration_minutes: duration.max(0) as u32,
        enrolled: enrolled.max(0) as u64,
        rating: row.try_get("rating")?,
        date_added: row.try_get("date_added")?,
        tags: json_col(row, "tags")?,
        progress: 0,
        status: Default::default(),
    };
    module.set_progress(progress.clamp(0, 100) as u8);
    Ok(module)
}

fn member_from_row(row: &SqliteRow) -> Result<Member, AppError> {
    let courses_completed: i64 = row.try_get("courses_completed")?;
    Ok(Member {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        organization: row.try_get("organization")?,
        role: enum_col(row, "role")?,
        status: enum_col(row, "status")?,
        joined_on: row.try_get("joined_on")?,
        courses_completed: courses_completed.max(0) as u32,
    })
}

fn notification_from_row(row: &SqliteRow) -> Result<Notification, AppError> {
    Ok(Notification {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        kind: enum_col(row, "kind")?,
        read: row.try_get("read")?,
        created_on: row.try_get("created_on")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Category, Language, MemberStatus, PublishStatus, ResourceType, Sector,
    };
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir) -> SqliteStore {
        let pool = init_database(&dir.path().join("hub.sqlite")).await.unwrap();
        SqliteStore::open(pool, Seed::load().unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn test_seed_round_trips_through_sqlite() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let seed = Seed::load().unwrap();

        assert_eq!(store.list_resources().await.unwrap(), seed.resources);
        assert_eq!(store.list_training().await.unwrap(), seed.training_modules);
        assert_eq!(store.list_members().await.unwrap(), seed.members);
        assert_eq!(store.list_notifications().await.unwrap(), seed.notifications);
    }

    #[tokio::test]
    async fn test_reopen_does_not_reseed() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir).await;
            store.delete_resource(6).await.unwrap();
        }
        let store = open_store(&dir).await;
        let resources = store.list_resources().await.unwrap();
        assert_eq!(resources.len(), 11);
        assert!(resources.iter().all(|r| r.id != 6));
    }

    #[tokio::test]
    async fn test_create_update_and_reset() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let new = NewResource {
            title: "Field Guide".to_string(),
            description: "Pocket guide".to_string(),
            resource_type: ResourceType::Pdf,
            category: Category::Guidelines,
            sector: Sector::Health,
            language: vec![Language::En, Language::Fr],
            tags: vec!["pocket".to_string()],
            featured: false,
            is_public: true,
            status: PublishStatus::Draft,
            file_name: "field-guide.pdf".to_string(),
            file_size: Some(2048),
            file_key: "abc".to_string(),
        };
        let created = store.create_resource(&new).await.unwrap();
        assert_eq!(created.id, 13);
        assert_eq!(store.get_resource(13).await.unwrap(), Some(created.clone()));

        let updated = store
            .update_resource(
                13,
                &UpdateResourceRequest {
                    status: Some(PublishStatus::Published),
                    expected_version: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, PublishStatus::Published);
        assert_eq!(updated.version, 2);

        let stale = store
            .update_resource(
                13,
                &UpdateResourceRequest {
                    expected_version: Some(1),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(stale, Err(AppError::Conflict { .. })));

        store.reset().await.unwrap();
        assert_eq!(store.list_resources().await.unwrap().len(), 12);
        assert!(store.get_resource(13).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_member_and_notification_writes() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let start = store.revision_id().await.unwrap();

        let member = store
            .update_member(
                4,
                &UpdateMemberRequest {
                    status: Some(MemberStatus::Active),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(member.status, MemberStatus::Active);

        let read = store.mark_notification_read(1).await.unwrap();
        assert!(read.read);
        assert_eq!(store.mark_all_notifications_read().await.unwrap(), 2);

        let module = store.set_training_progress(4, 150).await.unwrap();
        assert_eq!(module.progress, 100);

        assert_eq!(store.revision_id().await.unwrap(), start + 4);
    }

    #[tokio::test]
    async fn test_update_of_deleted_member_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.delete_member(2).await.unwrap();
        let after_delete = store.revision_id().await.unwrap();

        let result = store
            .update_member(
                2,
                &UpdateMemberRequest {
                    organization: Some("Field Office".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.revision_id().await.unwrap(), after_delete);
    }

    #[tokio::test]
    async fn test_preferences_upsert() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        assert!(store.get_preferences("learner-1").await.unwrap().is_none());
        let mut prefs = NotificationPreferences::default();
        store.put_preferences("learner-1", &prefs).await.unwrap();
        prefs.newsletter = true;
        store.put_preferences("learner-1", &prefs).await.unwrap();

        let stored = store.get_preferences("learner-1").await.unwrap().unwrap();
        assert!(stored.preferences.newsletter);
    }
}
