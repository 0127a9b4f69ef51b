use crate::cache::PageCache;
use crate::error::{Error, Result};

/// Which neighbor a load fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Handle for one in-flight page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub id: u64,
    pub page: u32,
    pub direction: Direction,
}

/// Instruction for the caller, produced by the pager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch `ticket.page`, then report back with `complete_load(ticket.id, ..)`
    RequestPage(LoadTicket),
    /// The visible page changed because of scrolling
    SetCurrentPage(u32),
    /// Move the view to an absolute offset
    ScrollTo(u32),
    /// The page-change handshake was consumed
    ClearPageChange,
}

/// Scroll position and visible height reported by the view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_offset: u32,
    pub viewport_height: u32,
}

impl Viewport {
    pub fn new(scroll_offset: u32, viewport_height: u32) -> Self {
        Self {
            scroll_offset,
            viewport_height,
        }
    }
}

/// Viewport plus the content height of the display list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub scroll_offset: u32,
    pub viewport_height: u32,
    pub content_height: u32,
}

impl ScrollMetrics {
    #[inline]
    pub fn max_scroll(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Within `threshold` of the end of content
    #[inline]
    pub fn near_bottom(&self, threshold: u32) -> bool {
        u64::from(self.scroll_offset) + u64::from(self.viewport_height) + u64::from(threshold)
            >= u64::from(self.content_height)
    }
}

/// Caller-owned state handed to the pager on every event
#[derive(Debug, Clone, Copy)]
pub struct PagerProps<'a> {
    pub total_pages: u32,
    /// 1-based
    pub current_page: u32,
    pub items_per_page: u32,
    pub cache: &'a PageCache,
    /// Set by the caller after it changed the page itself
    pub is_page_change: bool,
}

impl<'a> PagerProps<'a> {
    pub fn validate(&self) -> Result<()> {
        let last = self.total_pages.max(1);
        if self.current_page == 0 || self.current_page > last {
            return Err(Error::OutOfRange {
                page: self.current_page,
                total_pages: self.total_pages,
            });
        }
        if self.items_per_page == 0 {
            return Err(Error::Other("items_per_page must be at least 1".to_string()));
        }
        Ok(())
    }

    #[inline]
    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    #[inline]
    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages
    }
}
