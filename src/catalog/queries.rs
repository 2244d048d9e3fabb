//! Query-string filter state for each catalog view.

use serde::Deserialize;

use super::{Page, Predicate, Selection, SortKey};
use crate::models::{
    Category, Language, LearnerStatus, Level, Member, MemberRole, MemberStatus, Notification,
    NotificationKind, PublishStatus, ReadState, Resource, ResourceType, Sector, TrainingModule,
};

/// Filters of the resource library and the content-management table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceQuery {
    pub q: Option<String>,
    pub category: Selection<Category>,
    #[serde(rename = "type")]
    pub resource_type: Selection<ResourceType>,
    pub sector: Selection<Sector>,
    pub language: Selection<Language>,
    pub status: Selection<PublishStatus>,
    /// Category tab; ANDed with `category`
    pub tab: Selection<Category>,
    pub featured: Selection<bool>,
    pub sort: Selection<SortKey>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ResourceQuery {
    pub fn predicate(&self) -> Predicate<Resource> {
        Predicate::new()
            .search(self.q.as_deref())
            .field(&self.category, |r: &Resource| r.category)
            .field(&self.tab, |r: &Resource| r.category)
            .field(&self.resource_type, |r: &Resource| r.resource_type)
            .field(&self.sector, |r: &Resource| r.sector)
            .contains(&self.language, |r: &Resource| r.language.as_slice())
            .field(&self.status, |r: &Resource| r.status)
            .field(&self.featured, |r: &Resource| r.featured)
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.as_option().copied()
    }

    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Filters of the training catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainingQuery {
    pub q: Option<String>,
    pub category: Selection<Category>,
    pub level: Selection<Level>,
    pub language: Selection<Language>,
    pub status: Selection<LearnerStatus>,
    /// "My learning" tab; ANDed with `status`
    pub tab: Selection<LearnerStatus>,
    pub sort: Selection<SortKey>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl TrainingQuery {
    pub fn predicate(&self) -> Predicate<TrainingModule> {
        Predicate::new()
            .search(self.q.as_deref())
            .field(&self.category, |m: &TrainingModule| m.category)
            .field(&self.level, |m: &TrainingModule| m.level)
            .contains(&self.language, |m: &TrainingModule| m.language.as_slice())
            .field(&self.status, |m: &TrainingModule| m.status)
            .field(&self.tab, |m: &TrainingModule| m.status)
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.as_option().copied()
    }

    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Filters of the organization members table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemberQuery {
    pub q: Option<String>,
    pub role: Selection<MemberRole>,
    pub status: Selection<MemberStatus>,
    pub sort: Selection<SortKey>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl MemberQuery {
    pub fn predicate(&self) -> Predicate<Member> {
        Predicate::new()
            .search(self.q.as_deref())
            .field(&self.role, |m: &Member| m.role)
            .field(&self.status, |m: &Member| m.status)
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.as_option().copied()
    }

    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Filters of the notification inbox.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationQuery {
    pub q: Option<String>,
    pub kind: Selection<NotificationKind>,
    pub status: Selection<ReadState>,
    /// Read/unread tab; ANDed with `status`
    pub tab: Selection<ReadState>,
    pub sort: Selection<SortKey>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl NotificationQuery {
    pub fn predicate(&self) -> Predicate<Notification> {
        Predicate::new()
            .search(self.q.as_deref())
            .field(&self.kind, |n: &Notification| n.kind)
            .field(&self.status, Notification::read_state)
            .field(&self.tab, Notification::read_state)
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.as_option().copied()
    }

    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}
