use std::collections::BTreeMap;

use crate::item::Item;

/// Pages fetched so far, keyed by 1-based page number
///
/// Owned by the caller. Every mutation bumps `revision`, which is what the
/// pager compares to decide whether its display list is out of date.
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    pages: BTreeMap<u32, Vec<Item>>,
    revision: u64,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the items of a page
    pub fn insert(&mut self, page: u32, items: Vec<Item>) {
        self.pages.insert(page, items);
        self.revision += 1;
    }

    #[inline]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }

    /// Number of cached pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Total number of cached items across all pages
    pub fn item_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// Cached pages in ascending page order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Item])> {
        self.pages.iter().map(|(page, items)| (*page, items.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<Item> {
        (0..n).map(|i| Item::with_title(format!("item {}", i))).collect()
    }

    #[test]
    fn test_insert_bumps_revision() {
        let mut cache = PageCache::new();
        assert_eq!(cache.revision(), 0);

        cache.insert(2, items(3));
        cache.insert(1, items(2));
        assert_eq!(cache.revision(), 2);
        assert!(cache.contains(1));
        assert!(!cache.contains(3));
        assert_eq!(cache.item_count(), 5);
    }

    #[test]
    fn test_iter_in_page_order() {
        let mut cache = PageCache::new();
        cache.insert(3, items(1));
        cache.insert(1, items(1));
        cache.insert(2, items(1));

        let pages: Vec<u32> = cache.iter().map(|(p, _)| p).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_replacing_a_page_bumps_revision() {
        let mut cache = PageCache::new();
        assert!(cache.is_empty());

        cache.insert(1, items(2));
        cache.insert(1, items(4));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.item_count(), 4);
        assert_eq!(cache.revision(), 2);
    }
}
