//! Filter selections: either the `all` sentinel or one enumerated value.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};

use crate::models::parse_name;

/// Sentinel the filter dropdowns send for "no constraint".
pub const ALL: &str = "all";

/// A single filter dropdown's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    /// Parse a raw dropdown value. Blank and `all` (any case) mean no constraint.
    pub fn parse(raw: &str) -> Result<Self, String>
    where
        T: DeserializeOwned,
    {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            return Ok(Selection::All);
        }
        parse_name(trimmed).map(Selection::Only)
    }

    pub fn admits(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Selection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Selection::parse(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Sector};

    #[test]
    fn test_sentinels_mean_all() {
        assert_eq!(Selection::<Category>::parse("all"), Ok(Selection::All));
        assert_eq!(Selection::<Category>::parse("ALL"), Ok(Selection::All));
        assert_eq!(Selection::<Category>::parse(""), Ok(Selection::All));
        assert_eq!(Selection::<Category>::parse("   "), Ok(Selection::All));
    }

    #[test]
    fn test_values_and_rejections() {
        assert_eq!(
            Selection::<Sector>::parse("wash"),
            Ok(Selection::Only(Sector::Wash))
        );
        assert!(Selection::<Sector>::parse("mining").is_err());
    }

    #[test]
    fn test_admits() {
        let any: Selection<Sector> = Selection::All;
        let wash = Selection::Only(Sector::Wash);
        assert!(any.admits(&Sector::Health));
        assert!(wash.admits(&Sector::Wash));
        assert!(!wash.admits(&Sector::Health));
    }

    #[test]
    fn test_deserialize_from_json_string() {
        let sel: Selection<Category> = serde_json::from_str(r#""case-study""#).unwrap();
        assert_eq!(sel, Selection::Only(Category::CaseStudy));
        let err = serde_json::from_str::<Selection<Category>>(r#""nope""#);
        assert!(err.is_err());
    }
}
