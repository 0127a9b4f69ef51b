//! Page offset index
//!
//! The single authority on where each page begins. Both the scroll-driven
//! page inference and the page-change recorder go through it.

use std::collections::BTreeMap;

use super::display::DisplayList;

/// Page number -> scroll offset at which that page begins
///
/// Entries are added at most once per page and never removed until `clear`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOffsetIndex {
    offsets: BTreeMap<u32, u32>,
}

impl PageOffsetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page boundary if the page has none yet
    ///
    /// Returns true when an entry was added.
    pub fn record(&mut self, page: u32, offset: u32) -> bool {
        if self.contains(page) {
            return false;
        }
        self.offsets.insert(page, offset);
        true
    }

    #[inline]
    pub fn get(&self, page: u32) -> Option<u32> {
        self.offsets.get(&page).copied()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.offsets.contains_key(&page)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Boundaries in page order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.offsets.iter().map(|(page, offset)| (*page, *offset))
    }

    pub fn last_page(&self) -> Option<u32> {
        self.offsets.keys().next_back().copied()
    }

    /// Page the viewport is considered to be on
    ///
    /// The page of the first boundary past `scroll_offset - viewport_height / 2`,
    /// or the last recorded page when every boundary is above that line.
    pub fn infer_page(&self, scroll_offset: u32, viewport_height: u32) -> Option<u32> {
        let line = i64::from(scroll_offset) - i64::from(viewport_height / 2);
        self.offsets
            .iter()
            .find(|(_, offset)| i64::from(**offset) > line)
            .map(|(page, _)| *page)
            .or_else(|| self.last_page())
    }

    /// Move recorded boundaries of laid-out pages to their layout start
    ///
    /// Returns the number of entries that changed.
    pub fn reanchor(&mut self, display: &DisplayList, row_height: u32) -> usize {
        let mut changed = 0;
        for (page, row) in display.page_starts() {
            if let Some(offset) = self.offsets.get_mut(&page) {
                let start = u32::try_from(row)
                    .unwrap_or(u32::MAX)
                    .saturating_mul(row_height);
                if *offset != start {
                    *offset = start;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Offsets never decrease in page order
    pub fn is_monotonic(&self) -> bool {
        self.offsets
            .values()
            .zip(self.offsets.values().skip(1))
            .all(|(a, b)| a <= b)
    }

    pub fn clear(&mut self) {
        self.offsets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PageCache;
    use crate::item::Item;

    fn index(entries: &[(u32, u32)]) -> PageOffsetIndex {
        let mut index = PageOffsetIndex::new();
        for (page, offset) in entries {
            index.record(*page, *offset);
        }
        index
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut index = PageOffsetIndex::new();
        assert!(index.record(2, 100));
        assert!(!index.record(2, 250));

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(2), Some(100));
    }

    #[test]
    fn test_out_of_order_inserts_iterate_by_page() {
        let index = index(&[(3, 200), (1, 0), (2, 100)]);
        let offsets: Vec<u32> = index.iter().map(|(_, o)| o).collect();
        assert_eq!(offsets, vec![0, 100, 200]);
        assert!(index.is_monotonic());
    }

    #[test]
    fn test_infer_page_first_boundary_past_half_viewport() {
        let index = index(&[(1, 0), (2, 100), (3, 200)]);
        let height = 40;

        for scroll in 0..=260u32 {
            let line = scroll as i64 - (height / 2) as i64;
            let expected = [(1u32, 0i64), (2, 100), (3, 200)]
                .iter()
                .find(|(_, offset)| *offset > line)
                .map(|(page, _)| *page)
                .unwrap_or(3);
            assert_eq!(index.infer_page(scroll, height), Some(expected), "scroll {}", scroll);
        }
    }

    #[test]
    fn test_infer_page_edges() {
        let index = index(&[(1, 0), (2, 100)]);
        assert_eq!(index.infer_page(0, 40), Some(1));
        assert_eq!(index.infer_page(19, 40), Some(1));
        assert_eq!(index.infer_page(20, 40), Some(2));
        assert_eq!(index.infer_page(500, 40), Some(2));

        assert_eq!(PageOffsetIndex::new().infer_page(10, 40), None);
    }

    #[test]
    fn test_reanchor_after_prepend() {
        let mut cache = PageCache::new();
        cache.insert(3, (0..4).map(|i| Item::with_title(format!("c{}", i))).collect());

        let mut display = DisplayList::default();
        display.sync(&cache);

        let mut index = PageOffsetIndex::new();
        index.record(3, 0);

        cache.insert(2, (0..5).map(|i| Item::with_title(format!("b{}", i))).collect());
        display.sync(&cache);
        index.record(2, 0);

        assert_eq!(index.reanchor(&display, 2), 1);
        assert_eq!(index.get(2), Some(0));
        assert_eq!(index.get(3), Some(10));
        assert!(index.is_monotonic());
    }
}
