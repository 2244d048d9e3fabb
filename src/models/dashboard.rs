//! Learner dashboard summary derived from the catalog collections.

use serde::Serialize;

use super::{
    LearnerStatus, Member, MemberStatus, Notification, PublishStatus, Resource, TrainingModule,
};

/// How many featured resources the dashboard highlights.
pub const FEATURED_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgressSummary {
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub average_progress: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub published_resources: usize,
    pub total_downloads: u64,
    pub featured: Vec<Resource>,
    pub training: TrainingProgressSummary,
    pub unread_notifications: usize,
    pub active_members: usize,
}

impl DashboardSummary {
    pub fn compute(
        resources: &[Resource],
        training: &[TrainingModule],
        notifications: &[Notification],
        members: &[Member],
    ) -> Self {
        let published: Vec<&Resource> = resources
            .iter()
            .filter(|r| r.status == PublishStatus::Published)
            .collect();

        let mut featured: Vec<Resource> = published
            .iter()
            .filter(|r| r.featured)
            .map(|r| (*r).clone())
            .collect();
        featured.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        featured.truncate(FEATURED_LIMIT);

        let count = |status: LearnerStatus| training.iter().filter(|m| m.status == status).count();
        let average_progress = if training.is_empty() {
            0.0
        } else {
            training.iter().map(|m| f64::from(m.progress)).sum::<f64>() / training.len() as f64
        };

        Self {
            published_resources: published.len(),
            total_downloads: published.iter().map(|r| r.downloads).sum(),
            featured,
            training: TrainingProgressSummary {
                not_started: count(LearnerStatus::NotStarted),
                in_progress: count(LearnerStatus::InProgress),
                completed: count(LearnerStatus::Completed),
                average_progress,
            },
            unread_notifications: notifications.iter().filter(|n| !n.read).count(),
            active_members: members
                .iter()
                .filter(|m| m.status == MemberStatus::Active)
                .count(),
        }
    }
}
