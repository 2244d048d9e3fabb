//! Resource model matching the frontend resource library card.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Category, Language, PublishStatus, ResourceType, Sector};

/// A downloadable document in the resource library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub category: Category,
    pub sector: Sector,
    pub language: Vec<Language>,
    pub downloads: u64,
    pub popularity: f64,
    pub date_added: NaiveDate,
    pub featured: bool,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    #[serde(default)]
    pub updated_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

fn default_public() -> bool {
    true
}

/// Metadata collected by the upload form.
///
/// Every field is optional on the wire so that a missing or malformed value
/// surfaces as a per-field validation message instead of a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResourceRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub language: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// A validated resource ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    pub title: String,
    pub description: String,
    pub resource_type: ResourceType,
    pub category: Category,
    pub sector: Sector,
    pub language: Vec<Language>,
    pub tags: Vec<String>,
    pub featured: bool,
    pub is_public: bool,
    pub status: PublishStatus,
    pub file_name: String,
    pub file_size: Option<u64>,
    pub file_key: String,
}

/// Request body for updating an existing resource.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub resource_type: Option<ResourceType>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub sector: Option<Sector>,
    #[serde(default)]
    pub language: Option<Vec<Language>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub status: Option<PublishStatus>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

impl UpdateResourceRequest {
    /// Merge these changes over `existing`, leaving id, counters and bookkeeping untouched.
    pub fn apply_to(&self, existing: &Resource) -> Resource {
        let mut merged = existing.clone();
        if let Some(title) = &self.title {
            merged.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            merged.description = description.trim().to_string();
        }
        if let Some(resource_type) = self.resource_type {
            merged.resource_type = resource_type;
        }
        if let Some(category) = self.category {
            merged.category = category;
        }
        if let Some(sector) = self.sector {
            merged.sector = sector;
        }
        if let Some(language) = &self.language {
            merged.language = language.clone();
        }
        if let Some(tags) = &self.tags {
            merged.tags = tags.clone();
        }
        if let Some(featured) = self.featured {
            merged.featured = featured;
        }
        if let Some(is_public) = self.is_public {
            merged.is_public = is_public;
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        merged
    }
}

/// Request body for publishing, unpublishing or archiving a resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub status: PublishStatus,
    #[serde(default)]
    pub expected_version: Option<i64>,
}
