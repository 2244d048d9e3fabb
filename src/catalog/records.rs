//! How each catalog record exposes itself to search and sorting.

use chrono::NaiveDate;

use super::{Searchable, Sortable};
use crate::models::{Member, Notification, Resource, TrainingModule};

impl Searchable for Resource {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

impl Sortable for Resource {
    fn sort_title(&self) -> &str {
        &self.title
    }
    fn sort_date(&self) -> NaiveDate {
        self.date_added
    }
    fn popularity(&self) -> f64 {
        self.popularity
    }
    fn downloads(&self) -> u64 {
        self.downloads
    }
}

// The training catalog also matches on tags.
impl Searchable for TrainingModule {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

impl Sortable for TrainingModule {
    fn sort_title(&self) -> &str {
        &self.title
    }
    fn sort_date(&self) -> NaiveDate {
        self.date_added
    }
    fn popularity(&self) -> f64 {
        self.rating
    }
    fn downloads(&self) -> u64 {
        self.enrolled
    }
}

impl Searchable for Member {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.organization.as_str(),
        ]
    }
}

impl Sortable for Member {
    fn sort_title(&self) -> &str {
        &self.name
    }
    fn sort_date(&self) -> NaiveDate {
        self.joined_on
    }
    fn popularity(&self) -> f64 {
        f64::from(self.courses_completed)
    }
}

impl Searchable for Notification {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.message.as_str()]
    }
}

impl Sortable for Notification {
    fn sort_title(&self) -> &str {
        &self.title
    }
    fn sort_date(&self) -> NaiveDate {
        self.created_on
    }
}
