//! Deterministic ordering of requests.
//!
//! Requests are sorted by the rank of their method in [`METHODS_ORDER`] and then by display
//! name. Collections and folders both keep their requests in an [`OrderedRequests`] list,
//! which re-sorts on every insertion so it is always fully ordered.

use crate::error::{Error, Result};
use crate::route::HttpMethod;
use std::cmp::Ordering;

/// Canonical method precedence
pub const METHODS_ORDER: [&str; 11] = [
    "GET", "POST", "PUT", "PATCH", "DELETE", "COPY", "HEAD", "OPTIONS", "LINK", "UNLINK",
    "PURGE",
];

/// Position of a method in [`METHODS_ORDER`].
///
/// # Errors
///
/// Returns [`Error::MethodOrdering`] for a method outside the canonical list.
pub fn method_rank(method: &HttpMethod) -> Result<usize> {
    METHODS_ORDER
        .iter()
        .position(|m| *m == method.as_str())
        .ok_or_else(|| Error::MethodOrdering {
            method: method.as_str().to_string(),
        })
}

/// Compare two (method, name) keys
pub fn compare_keys(a: (usize, &str), b: (usize, &str)) -> Ordering {
    a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1))
}

#[derive(Debug, Clone)]
struct Entry<T> {
    rank: usize,
    name: String,
    item: T,
}

/// A list kept sorted by (method rank, name).
///
/// Ties keep insertion order.
#[derive(Debug, Clone)]
pub struct OrderedRequests<T> {
    entries: Vec<Entry<T>>,
}

impl<T> OrderedRequests<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an item and re-sort.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MethodOrdering`] if `method` has no canonical rank; the list is left
    /// untouched in that case.
    pub fn insert(&mut self, method: &HttpMethod, name: &str, item: T) -> Result<()> {
        let rank = method_rank(method)?;
        self.entries.push(Entry {
            rank,
            name: name.to_string(),
            item,
        });
        // sort_by is stable
        self.entries
            .sort_by(|a, b| compare_keys((a.rank, &a.name), (b.rank, &b.name)));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for OrderedRequests<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_rank() {
        assert_eq!(method_rank(&HttpMethod::Get).unwrap(), 0);
        assert_eq!(method_rank(&HttpMethod::Options).unwrap(), 7);
        assert_eq!(method_rank(&HttpMethod::Purge).unwrap(), 10);
    }

    #[test]
    fn test_unknown_method_is_an_error() {
        let err = method_rank(&HttpMethod::parse("TRACE")).unwrap_err();
        assert!(matches!(err, Error::MethodOrdering { ref method } if method == "TRACE"));
    }

    #[test]
    fn test_rank_dominates_name() {
        let mut list = OrderedRequests::new();
        list.insert(&HttpMethod::Post, "aaa", "post").unwrap();
        list.insert(&HttpMethod::Get, "zzz", "get").unwrap();
        list.insert(&HttpMethod::Purge, "a", "purge").unwrap();
        list.insert(&HttpMethod::Delete, "b", "delete").unwrap();

        let items: Vec<_> = list.iter().copied().collect();
        assert_eq!(items, vec!["get", "post", "delete", "purge"]);
    }

    #[test]
    fn test_equal_rank_sorts_by_name() {
        let mut list = OrderedRequests::new();
        list.insert(&HttpMethod::Get, "users", 1).unwrap();
        list.insert(&HttpMethod::Get, "posts", 2).unwrap();
        list.insert(&HttpMethod::Get, "comments", 3).unwrap();

        let items: Vec<_> = list.iter().copied().collect();
        assert_eq!(items, vec![3, 2, 1]);
    }

    #[test]
    fn test_full_ties_keep_insertion_order() {
        let mut list = OrderedRequests::new();
        list.insert(&HttpMethod::Get, "index", "first").unwrap();
        list.insert(&HttpMethod::Get, "index", "second").unwrap();
        list.insert(&HttpMethod::Get, "index", "third").unwrap();

        let items: Vec<_> = list.iter().copied().collect();
        assert_eq!(items, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failed_insert_leaves_list_untouched() {
        let mut list = OrderedRequests::new();
        list.insert(&HttpMethod::Get, "index", 1).unwrap();
        assert!(list.insert(&HttpMethod::parse("TRACE"), "index", 2).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_every_intermediate_state_is_sorted() {
        let mut list = OrderedRequests::new();
        let inputs = [
            (HttpMethod::Put, "b"),
            (HttpMethod::Get, "b"),
            (HttpMethod::Put, "a"),
            (HttpMethod::Get, "a"),
        ];
        for (method, name) in inputs.iter() {
            list.insert(method, name, (method.clone(), name.to_string()))
                .unwrap();
            let keys: Vec<_> = list
                .iter()
                .map(|(m, n)| (method_rank(m).unwrap(), n.clone()))
                .collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted);
        }
    }
}
