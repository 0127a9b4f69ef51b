use std::collections::BTreeMap;

use crate::cache::PageCache;
use crate::item::Item;

/// Flattened view of every cached page, in page order
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    /// Cache revision this list was built from (None before the first build)
    revision: Option<u64>,
    items: Vec<Item>,
    /// Row index at which each cached page starts
    page_starts: BTreeMap<u32, usize>,
}

impl DisplayList {
    /// Whether the list already reflects this cache
    #[inline]
    pub fn is_current(&self, cache: &PageCache) -> bool {
        self.revision == Some(cache.revision())
    }

    /// Rebuild from the cache if its revision changed
    ///
    /// Returns true when the list was rebuilt.
    pub fn sync(&mut self, cache: &PageCache) -> bool {
        if self.is_current(cache) {
            return false;
        }

        self.items.clear();
        self.page_starts.clear();
        for (page, items) in cache.iter() {
            self.page_starts.insert(page, self.items.len());
            self.items.extend_from_slice(items);
        }
        self.revision = Some(cache.revision());
        true
    }

    pub fn clear(&mut self) {
        self.revision = None;
        self.items.clear();
        self.page_starts.clear();
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Row at which a cached page starts
    pub fn page_start(&self, page: u32) -> Option<usize> {
        self.page_starts.get(&page).copied()
    }

    /// Cached pages with their starting rows, ascending
    pub fn page_starts(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.page_starts.iter().map(|(page, row)| (*page, *row))
    }

    pub fn last_page(&self) -> Option<u32> {
        self.page_starts.keys().next_back().copied()
    }

    /// Page that owns a row
    pub fn page_of_row(&self, row: usize) -> Option<u32> {
        if row >= self.items.len() {
            return None;
        }
        self.page_starts
            .iter()
            .take_while(|(_, start)| **start <= row)
            .last()
            .map(|(page, _)| *page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, tag: &str) -> Vec<Item> {
        (0..n).map(|i| Item::with_title(format!("{} {}", tag, i))).collect()
    }

    #[test]
    fn test_flattens_in_page_order() {
        let mut cache = PageCache::new();
        cache.insert(2, page(2, "b"));
        cache.insert(1, page(3, "a"));

        let mut display = DisplayList::default();
        assert!(display.sync(&cache));

        let titles: Vec<&str> = display.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a 0", "a 1", "a 2", "b 0", "b 1"]);
        assert_eq!(display.page_start(1), Some(0));
        assert_eq!(display.page_start(2), Some(3));
        assert_eq!(display.page_start(3), None);
    }

    #[test]
    fn test_unchanged_cache_is_not_rebuilt() {
        let mut cache = PageCache::new();
        cache.insert(1, page(2, "a"));

        let mut display = DisplayList::default();
        assert!(display.sync(&cache));
        assert!(!display.sync(&cache));

        cache.insert(2, page(1, "b"));
        assert!(display.sync(&cache));
        assert_eq!(display.len(), 3);
    }

    #[test]
    fn test_empty_cache_builds_empty_list() {
        let cache = PageCache::new();
        let mut display = DisplayList::default();

        assert!(display.sync(&cache));
        assert!(display.is_empty());
        assert_eq!(display.last_page(), None);
    }

    #[test]
    fn test_page_of_row() {
        let mut cache = PageCache::new();
        cache.insert(1, page(2, "a"));
        cache.insert(3, page(2, "c"));

        let mut display = DisplayList::default();
        display.sync(&cache);

        assert_eq!(display.page_of_row(0), Some(1));
        assert_eq!(display.page_of_row(1), Some(1));
        assert_eq!(display.page_of_row(2), Some(3));
        assert_eq!(display.page_of_row(4), None);
    }
}
