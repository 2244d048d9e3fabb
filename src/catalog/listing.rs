//! The filter-sort pipeline and the listing envelope it produces.

use serde::Serialize;

use super::{sort_records, Predicate, Searchable, SortKey, Sortable};

/// Upper bound on a single page of results.
pub const MAX_PAGE_SIZE: usize = 100;

/// Optional page window over a filtered listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Page {
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.min(MAX_PAGE_SIZE)),
            offset: offset.unwrap_or(0),
        }
    }
}

/// Shown instead of an empty list when nothing matches the filters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<R> {
    pub items: Vec<R>,
    /// Matches before paging
    pub total: usize,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
}

/// Filter `records` in order, then sort them when a key is selected.
pub fn filter_sort<R>(records: Vec<R>, predicate: &Predicate<R>, sort: Option<SortKey>) -> Vec<R>
where
    R: Searchable + Sortable,
{
    let mut matched: Vec<R> = records
        .into_iter()
        .filter(|record| predicate.matches(record))
        .collect();
    sort_records(&mut matched, sort);
    matched
}

impl<R> Listing<R> {
    /// Page an already filtered and sorted sequence.
    ///
    /// `noun` names the collection in the empty-state message, e.g. "resources".
    pub fn paginate(matched: Vec<R>, page: Page, noun: &str) -> Self {
        let total = matched.len();
        let empty_state = (total == 0).then(|| EmptyState {
            message: format!("No {} found", noun),
        });

        let window = matched.into_iter().skip(page.offset);
        let items = match page.limit {
            Some(limit) => window.take(limit).collect(),
            None => window.collect(),
        };

        Self {
            items,
            total,
            offset: page.offset,
            limit: page.limit,
            empty_state,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Run the whole pipeline: filter, sort, page.
pub fn run_pipeline<R>(
    records: Vec<R>,
    predicate: &Predicate<R>,
    sort: Option<SortKey>,
    page: Page,
    noun: &str,
) -> Listing<R>
where
    R: Searchable + Sortable,
{
    Listing::paginate(filter_sort(records, predicate, sort), page, noun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_has_empty_state() {
        let listing: Listing<u32> = Listing::paginate(Vec::new(), Page::default(), "resources");
        assert!(listing.is_empty());
        assert_eq!(
            listing.empty_state,
            Some(EmptyState {
                message: "No resources found".to_string()
            })
        );
    }

    #[test]
    fn test_paging_past_the_end_is_not_empty_state() {
        let listing = Listing::paginate(vec![1, 2, 3], Page::new(Some(2), Some(5)), "resources");
        assert!(listing.items.is_empty());
        assert_eq!(listing.total, 3);
        assert!(listing.empty_state.is_none());
    }

    #[test]
    fn test_page_window() {
        let listing = Listing::paginate(vec![1, 2, 3, 4, 5], Page::new(Some(2), Some(1)), "items");
        assert_eq!(listing.items, vec![2, 3]);
        assert_eq!(listing.total, 5);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(Page::new(Some(10_000), None).limit, Some(MAX_PAGE_SIZE));
    }
}
