//! Client-side list filtering and pagination.
//!
//! Wire APIs accept only a few server-side filters. Whatever they cannot
//! express is applied here, after decoding, preserving the server's order.

use serde::{Deserialize, Serialize};

/// Offset/limit pagination applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of matching items to skip.
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of items to return; `None` returns everything.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Pagination {
    /// Paginate with a limit and offset.
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    /// Returns true if this pagination keeps every item.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.offset == 0 && self.limit.is_none()
    }
}

/// One page of a filtered collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of items that matched the filter, before pagination.
    pub total: usize,
}

impl<T> Page<T> {
    /// A page holding every item.
    #[must_use]
    pub fn all(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }

    /// Returns true if the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// A post-decode filter over a collection of `T`.
pub trait ListFilter<T> {
    /// Returns true if `item` passes every criterion.
    fn matches(&self, item: &T) -> bool;

    /// Pagination to apply after filtering.
    fn pagination(&self) -> Pagination;
}

/// Filter then paginate `items`, keeping their original order.
///
/// A `None` filter returns the input unchanged.
pub fn apply_filter<T, F>(items: Vec<T>, filter: Option<&F>) -> Page<T>
where
    F: ListFilter<T> + ?Sized,
{
    let Some(filter) = filter else {
        return Page::all(items);
    };

    let matched: Vec<T> = items.into_iter().filter(|item| filter.matches(item)).collect();
    paginate(matched, filter.pagination())
}

/// Apply pagination to an already filtered collection.
#[must_use]
pub fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Page<T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(pagination.offset)
        .take(pagination.limit.unwrap_or(usize::MAX))
        .collect();
    Page { items, total }
}

/// True if `allowed` is empty or contains `value`.
pub(crate) fn any_of<T: PartialEq>(allowed: &[T], value: &T) -> bool {
    allowed.is_empty() || allowed.contains(value)
}

/// True if `allowed` is empty or contains the string `value`.
pub(crate) fn any_str(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a == value)
}

/// True if `allowed` is empty or contains `value`, where an absent value never matches.
pub(crate) fn any_of_opt(allowed: &[String], value: Option<&str>) -> bool {
    allowed.is_empty() || value.is_some_and(|v| allowed.iter().any(|a| a == v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct NameFilter {
        names: Vec<String>,
        page: Pagination,
    }

    impl ListFilter<String> for NameFilter {
        fn matches(&self, item: &String) -> bool {
            any_str(&self.names, item)
        }

        fn pagination(&self) -> Pagination {
            self.page
        }
    }

    fn items() -> Vec<String> {
        vec!["debug".into(), "batch".into(), "gpu".into(), "long".into()]
    }

    #[test]
    fn test_absent_name_yields_empty_page() {
        let filter = NameFilter {
            names: vec!["missing".into()],
            page: Pagination::default(),
        };
        let page = apply_filter(items(), Some(&filter));
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_none_filter_returns_input_unchanged() {
        let page = apply_filter::<String, NameFilter>(items(), None);
        assert_eq!(page.items, items());
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_empty_filter_keeps_order() {
        let filter = NameFilter {
            names: Vec::new(),
            page: Pagination::default(),
        };
        assert_eq!(apply_filter(items(), Some(&filter)).items, items());
    }

    #[test]
    fn test_pagination_after_filter() {
        let filter = NameFilter {
            names: Vec::new(),
            page: Pagination::new(1, 2),
        };
        let page = apply_filter(items(), Some(&filter));
        assert_eq!(page.items, vec!["batch".to_string(), "gpu".to_string()]);
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_offset_past_end() {
        let page = paginate(items(), Pagination::new(10, 5));
        assert!(page.is_empty());
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_any_of_opt_absent_value() {
        assert!(any_of_opt(&[], None));
        assert!(!any_of_opt(&["a".to_string()], None));
        assert!(any_of_opt(&["a".to_string()], Some("a")));
    }

    proptest! {
        #[test]
        fn prop_filtering_preserves_relative_order(
            values in proptest::collection::vec("[a-d]", 0..20),
            keep in proptest::collection::vec("[a-d]", 0..3),
        ) {
            let filter = NameFilter { names: keep.clone(), page: Pagination::default() };
            let page = apply_filter(values.clone(), Some(&filter));
            let expected: Vec<String> = values
                .into_iter()
                .filter(|v| keep.is_empty() || keep.contains(v))
                .collect();
            prop_assert_eq!(page.items, expected);
        }
    }
}
