//! Catalog snapshot matching the frontend's bundled mock data.

use serde::{Deserialize, Serialize};

use super::{Member, Notification, Resource, TrainingModule};

/// Every collection the views render, in store order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub schema_version: i32,
    pub generated_at: String,
    pub revision_id: i64,
    pub resources: Vec<Resource>,
    pub training_modules: Vec<TrainingModule>,
    pub members: Vec<Member>,
    pub notifications: Vec<Notification>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
