//! The mutable set of candidate URLs for one site.
//!
//! A pipeline run owns exactly one [`WorkingSet`]. Checks get it through
//! `&mut` for the duration of their `run` call and may only `add` or `remove`
//! entries. Anything that iterates while mutating must iterate a
//! [`WorkingSet::snapshot`] taken before the loop.

use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkingSet {
    urls: BTreeSet<String>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a set with a single URL.
    pub fn seeded(url: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.add(url);
        set
    }

    /// Idempotent insert.
    pub fn add(&mut self, url: impl Into<String>) {
        self.urls.insert(url.into());
    }

    /// Idempotent delete; absent URLs are ignored.
    pub fn remove(&mut self, url: &str) {
        self.urls.remove(url);
    }

    /// Ordered copy, safe to iterate while the live set is mutated.
    pub fn snapshot(&self) -> Vec<String> {
        self.urls.iter().cloned().collect()
    }

    /// Current contents, in order.
    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for WorkingSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for url in iter {
            set.add(url);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut set = WorkingSet::new();
        set.add("http://example.com/");
        set.add("http://example.com/");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set = WorkingSet::seeded("http://example.com/");
        set.remove("http://other.example/");
        set.remove("http://example.com/");
        set.remove("http://example.com/");
        assert!(set.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_from_live_set() {
        let mut set = WorkingSet::seeded("http://a.example/");
        let snapshot = set.snapshot();
        for url in &snapshot {
            set.add(format!("{}x", url));
        }
        assert_eq!(snapshot.len(), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_list_is_sorted() {
        let set: WorkingSet = ["https://b.example/", "http://a.example/"]
            .into_iter()
            .collect();
        let urls: Vec<&str> = set.list().collect();
        assert_eq!(urls, vec!["http://a.example/", "https://b.example/"]);
    }
}
