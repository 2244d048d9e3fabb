//! Predicate builder composing free-text search with facet constraints.

use super::Selection;

/// Exposes the text a catalog search box looks at.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

type Clause<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// Conjunction of a case-insensitive search term and facet clauses.
///
/// Clauses are only added for active selections, so a predicate built from
/// an all-`all` filter state with an empty term admits every record.
pub struct Predicate<R> {
    needle: Option<String>,
    clauses: Vec<Clause<R>>,
}

impl<R> Default for Predicate<R> {
    fn default() -> Self {
        Self {
            needle: None,
            clauses: Vec::new(),
        }
    }
}

impl<R: Searchable> Predicate<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match `term` as a substring of any search field. Blank terms are ignored.
    pub fn search(mut self, term: Option<&str>) -> Self {
        self.needle = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        self
    }

    /// Constrain a scalar field to the selected value.
    pub fn field<T, F>(mut self, selection: &Selection<T>, extract: F) -> Self
    where
        T: PartialEq + Clone + Send + Sync + 'static,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        if let Selection::Only(wanted) = selection {
            let wanted = wanted.clone();
            self.clauses
                .push(Box::new(move |record| extract(record) == wanted));
        }
        self
    }

    /// Constrain a set-valued field to contain the selected value.
    pub fn contains<T, F>(mut self, selection: &Selection<T>, extract: F) -> Self
    where
        T: PartialEq + Clone + Send + Sync + 'static,
        F: Fn(&R) -> &[T] + Send + Sync + 'static,
    {
        if let Selection::Only(wanted) = selection {
            let wanted = wanted.clone();
            self.clauses
                .push(Box::new(move |record| extract(record).contains(&wanted)));
        }
        self
    }

    pub fn matches(&self, record: &R) -> bool {
        self.matches_search(record) && self.clauses.iter().all(|clause| clause(record))
    }

    fn matches_search(&self, record: &R) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.needle.is_none() && self.clauses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Shape {
        Round,
        Square,
    }

    struct Item {
        name: &'static str,
        shape: Shape,
        colors: Vec<&'static str>,
    }

    impl Searchable for Item {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name]
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                name: "Red Ball",
                shape: Shape::Round,
                colors: vec!["red"],
            },
            Item {
                name: "Blue Box",
                shape: Shape::Square,
                colors: vec!["blue", "red"],
            },
            Item {
                name: "Green Ball",
                shape: Shape::Round,
                colors: vec!["green"],
            },
        ]
    }

    #[test]
    fn test_unconstrained_admits_everything() {
        let predicate = Predicate::<Item>::new().search(Some("  "));
        assert!(predicate.is_unconstrained());
        assert!(items().iter().all(|i| predicate.matches(i)));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let predicate = Predicate::<Item>::new().search(Some("BALL"));
        let names: Vec<&str> = items()
            .iter()
            .filter(|i| predicate.matches(i))
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Red Ball", "Green Ball"]);
    }

    #[test]
    fn test_constraints_are_anded() {
        let predicate = Predicate::<Item>::new()
            .field(&Selection::Only(Shape::Round), |i: &Item| i.shape)
            .contains(&Selection::Only("red"), |i: &Item| i.colors.as_slice());
        let names: Vec<&str> = items()
            .iter()
            .filter(|i| predicate.matches(i))
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Red Ball"]);
    }

    #[test]
    fn test_unmatched_combination_is_empty_not_error() {
        let predicate = Predicate::<Item>::new()
            .search(Some("box"))
            .field(&Selection::Only(Shape::Round), |i: &Item| i.shape);
        assert!(!items().iter().any(|i| predicate.matches(i)));
    }
}
