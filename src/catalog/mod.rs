//! Catalog filter/sort engine shared by every listing view.
//!
//! A listing request becomes a typed query struct, the query builds a
//! [`Predicate`], and [`run_pipeline`] filters the store's records in order,
//! applies the optional [`SortKey`] and cuts the requested [`Page`].

mod listing;
mod predicate;
mod queries;
mod records;
mod selection;
mod sort;

pub use listing::*;
pub use predicate::*;
pub use queries::*;
pub use selection::*;
pub use sort::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Language, Resource, Sector};
    use crate::seed::Seed;

    fn resources() -> Vec<Resource> {
        Seed::load().unwrap().resources
    }

    fn ids(records: &[Resource]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_default_query_returns_store_in_order() {
        let store = resources();
        let query = ResourceQuery::default();
        let out = filter_sort(store.clone(), &query.predicate(), query.sort_key());
        assert_eq!(out, store);
    }

    #[test]
    fn test_downloads_sort_puts_most_downloaded_first() {
        let query = ResourceQuery {
            sort: Selection::Only(SortKey::Downloads),
            ..Default::default()
        };
        let out = filter_sort(resources(), &query.predicate(), query.sort_key());
        assert_eq!(out[0].id, 3);
        assert_eq!(out[0].downloads, 312);
        assert!(out.windows(2).all(|w| w[0].downloads >= w[1].downloads));
    }

    #[test]
    fn test_wash_search_matches_title_or_description() {
        let store = resources();
        let query = ResourceQuery {
            q: Some("WaSh".to_string()),
            ..Default::default()
        };
        let out = filter_sort(store.clone(), &query.predicate(), None);

        let expected: Vec<i64> = store
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains("wash")
                    || r.description.to_lowercase().contains("wash")
            })
            .map(|r| r.id)
            .collect();
        assert_eq!(ids(&out), expected);
        assert_eq!(ids(&out), vec![1, 7, 9]);
        assert_eq!(out[0].title, "Disability Inclusion in WASH Programs");
    }

    #[test]
    fn test_every_result_satisfies_every_active_filter() {
        let store = resources();
        let categories = [
            Selection::All,
            Selection::Only(Category::Guidelines),
            Selection::Only(Category::Research),
        ];
        let sectors = [
            Selection::All,
            Selection::Only(Sector::Wash),
            Selection::Only(Sector::General),
        ];
        let languages = [
            Selection::All,
            Selection::Only(Language::Fr),
            Selection::Only(Language::Ar),
        ];

        for category in &categories {
            for sector in &sectors {
                for language in &languages {
                    let query = ResourceQuery {
                        category: *category,
                        sector: *sector,
                        language: *language,
                        sort: Selection::Only(SortKey::Newest),
                        ..Default::default()
                    };
                    let out = filter_sort(store.clone(), &query.predicate(), query.sort_key());
                    for r in &out {
                        assert!(store.contains(r));
                        assert!(category.admits(&r.category));
                        assert!(sector.admits(&r.sector));
                        if let Selection::Only(lang) = language {
                            assert!(r.language.contains(lang));
                        }
                    }
                    // Idempotent: same state, same sequence.
                    let again = filter_sort(store.clone(), &query.predicate(), query.sort_key());
                    assert_eq!(ids(&out), ids(&again));
                }
            }
        }
    }

    #[test]
    fn test_tab_is_anded_with_category() {
        let query = ResourceQuery {
            category: Selection::Only(Category::Guidelines),
            tab: Selection::Only(Category::Research),
            ..Default::default()
        };
        let listing = run_pipeline(
            resources(),
            &query.predicate(),
            None,
            query.page(),
            "resources",
        );
        assert!(listing.items.is_empty());
        assert_eq!(
            listing.empty_state.map(|e| e.message),
            Some("No resources found".to_string())
        );
    }
}
