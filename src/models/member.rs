//! Organization member model for the admin user-management table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberRole {
    Admin,
    Editor,
    Learner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberStatus {
    Active,
    Invited,
    Suspended,
}

/// A person registered with a member organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub joined_on: NaiveDate,
    #[serde(default)]
    pub courses_completed: u32,
}

/// Request body for updating a member's role, status or organization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub role: Option<MemberRole>,
    #[serde(default)]
    pub status: Option<MemberStatus>,
    #[serde(default)]
    pub organization: Option<String>,
}

impl UpdateMemberRequest {
    pub fn apply_to(&self, existing: &Member) -> Member {
        let mut merged = existing.clone();
        if let Some(role) = self.role {
            merged.role = role;
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        if let Some(organization) = &self.organization {
            merged.organization = organization.trim().to_string();
        }
        merged
    }
}
