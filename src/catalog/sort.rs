//! Sort keys offered by the catalog "Sort by" dropdowns.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Highest rating first
    Popularity,
    /// Most downloaded (or enrolled) first
    Downloads,
    /// Most recently added first
    Newest,
    /// Earliest added first
    Oldest,
    /// Title A to Z, ignoring case
    Alphabetical,
}

/// Scalar fields a record exposes to the sort keys.
///
/// Records without a popularity or download notion keep the defaults, which
/// makes those keys leave their relative order unchanged.
pub trait Sortable {
    fn sort_title(&self) -> &str;
    fn sort_date(&self) -> NaiveDate;
    fn popularity(&self) -> f64 {
        0.0
    }
    fn downloads(&self) -> u64 {
        0
    }
}

impl SortKey {
    pub fn compare<R: Sortable>(self, a: &R, b: &R) -> Ordering {
        match self {
            SortKey::Popularity => b.popularity().total_cmp(&a.popularity()),
            SortKey::Downloads => b.downloads().cmp(&a.downloads()),
            SortKey::Newest => b.sort_date().cmp(&a.sort_date()),
            SortKey::Oldest => a.sort_date().cmp(&b.sort_date()),
            SortKey::Alphabetical => a
                .sort_title()
                .to_lowercase()
                .cmp(&b.sort_title().to_lowercase()),
        }
    }
}

/// Sort in place; `None` keeps the incoming order.
pub fn sort_records<R: Sortable>(records: &mut [R], key: Option<SortKey>) {
    if let Some(key) = key {
        records.sort_by(|a, b| key.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Row {
        id: u32,
        title: &'static str,
        date: NaiveDate,
        rating: f64,
        downloads: u64,
    }

    impl Sortable for Row {
        fn sort_title(&self) -> &str {
            self.title
        }
        fn sort_date(&self) -> NaiveDate {
            self.date
        }
        fn popularity(&self) -> f64 {
            self.rating
        }
        fn downloads(&self) -> u64 {
            self.downloads
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                title: "beta",
                date: date(2023, 5, 1),
                rating: 4.1,
                downloads: 10,
            },
            Row {
                id: 2,
                title: "Alpha",
                date: date(2024, 1, 1),
                rating: 4.8,
                downloads: 5,
            },
            Row {
                id: 3,
                title: "gamma",
                date: date(2022, 9, 9),
                rating: 3.0,
                downloads: 30,
            },
        ]
    }

    fn ids(key: Option<SortKey>) -> Vec<u32> {
        let mut rows = rows();
        sort_records(&mut rows, key);
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_each_key_orders_as_labelled() {
        assert_eq!(ids(None), vec![1, 2, 3]);
        assert_eq!(ids(Some(SortKey::Popularity)), vec![2, 1, 3]);
        assert_eq!(ids(Some(SortKey::Downloads)), vec![3, 1, 2]);
        assert_eq!(ids(Some(SortKey::Newest)), vec![2, 1, 3]);
        assert_eq!(ids(Some(SortKey::Oldest)), vec![3, 1, 2]);
        assert_eq!(ids(Some(SortKey::Alphabetical)), vec![2, 1, 3]);
    }

    #[test]
    fn test_key_names() {
        let key: SortKey = serde_json::from_str(r#""downloads""#).unwrap();
        assert_eq!(key, SortKey::Downloads);
    }
}
