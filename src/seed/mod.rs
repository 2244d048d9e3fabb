//! Hard-coded sample catalog the hub ships with.
//!
//! Both stores start from this data, and `reset` restores it.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Member, Notification, Resource, TrainingModule};

const CATALOG_JSON: &str = include_str!("catalog.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub resources: Vec<Resource>,
    pub training_modules: Vec<TrainingModule>,
    pub members: Vec<Member>,
    pub notifications: Vec<Notification>,
}

impl Seed {
    /// Parse the bundled catalog and fill in bookkeeping fields.
    pub fn load() -> Result<Self, AppError> {
        let mut seed: Seed = serde_json::from_str(CATALOG_JSON)
            .map_err(|e| AppError::Internal(format!("Bundled catalog is invalid: {}", e)))?;

        for resource in &mut seed.resources {
            if resource.updated_at.is_empty() {
                resource.updated_at = format!("{}T00:00:00+00:00", resource.date_added);
            }
            if resource.version == 0 {
                resource.version = 1;
            }
        }
        for module in &mut seed.training_modules {
            module.set_progress(module.progress);
        }

        Ok(seed)
    }

    pub fn next_resource_id(&self) -> i64 {
        self.resources.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }
}
