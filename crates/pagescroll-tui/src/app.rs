use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use pagescroll_core::{
    AppConfig, Effect, Item, PageCache, PagerProps, Result, ScrollPager, Viewport,
};
use tracing::{debug, error, warn};

use crate::event::PageLoadResult;
use crate::input::Action;
use crate::theme::Theme;

/// A page the app wants fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    /// Pager ticket to report back with, None for app-initiated fetches
    pub ticket: Option<u64>,
}

/// Everything the app owns on the pager's behalf
#[derive(Debug, Default)]
pub struct Listing {
    pub cache: PageCache,
    pub total_pages: u32,
    pub items_per_page: u32,
    /// 1-based
    pub current_page: u32,
    /// Set when the app changed the page itself, cleared by the pager
    pub is_page_change: bool,
}

impl Listing {
    pub fn props(&self) -> PagerProps<'_> {
        PagerProps {
            total_pages: self.total_pages,
            current_page: self.current_page,
            items_per_page: self.items_per_page,
            cache: &self.cache,
            is_page_change: self.is_page_change,
        }
    }
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub listing: Listing,
    pub pager: ScrollPager,
    /// Scroll offset in pager units
    pub scroll_offset: u32,
    /// Visible list height in terminal rows
    pub viewport_rows: u32,
    /// Pages being fetched outside the pager (startup and jumps)
    pub pending_jumps: BTreeSet<u32>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Arc<AppConfig>, total_pages: u32, items_per_page: u32) -> Self {
        let current_page = config.source.start_page.clamp(1, total_pages.max(1));
        let pager = ScrollPager::new(config.pager.clone());
        Self {
            config,
            theme: Theme::default(),
            listing: Listing {
                cache: PageCache::new(),
                total_pages,
                items_per_page,
                current_page,
                is_page_change: false,
            },
            pager,
            scroll_offset: 0,
            viewport_rows: 0,
            pending_jumps: BTreeSet::new(),
            should_quit: false,
            status_message: None,
        }
    }

    /// Fetch the start page
    pub fn start(&mut self, now: Instant) -> Vec<PageRequest> {
        self.jump_to_page(self.listing.current_page, now)
    }

    #[inline]
    fn row_height(&self) -> u32 {
        self.config.pager.row_height.max(1)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.scroll_offset, self.viewport_rows * self.row_height())
    }

    pub fn max_scroll(&self) -> u32 {
        self.pager
            .content_height()
            .saturating_sub(self.viewport_rows * self.row_height())
    }

    /// Update the visible height after a resize or layout change
    pub fn set_viewport_rows(&mut self, rows: u32) {
        self.viewport_rows = rows;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.pager.is_loading()
    }

    /// Display rows currently on screen
    pub fn visible_rows(&self) -> Range<usize> {
        let len = self.pager.display().len();
        let start = ((self.scroll_offset / self.row_height()) as usize).min(len);
        let end = (start + self.viewport_rows as usize).min(len);
        start..end
    }

    pub fn visible_items(&self) -> &[Item] {
        &self.pager.display().items()[self.visible_rows()]
    }

    /// Map an input action to state changes
    pub fn handle_action(&mut self, action: Action, now: Instant) -> Vec<PageRequest> {
        let page_units = (self.viewport_rows * self.row_height()) as i64;
        match action {
            Action::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            Action::ScrollDown => self.scroll_lines(1, now),
            Action::ScrollUp => self.scroll_lines(-1, now),
            Action::ScrollHalfPageDown => self.scroll_by((page_units / 2).max(1), now),
            Action::ScrollHalfPageUp => self.scroll_by(-(page_units / 2).max(1), now),
            Action::ScrollPageDown => self.scroll_by(page_units.max(1), now),
            Action::ScrollPageUp => self.scroll_by(-page_units.max(1), now),
            Action::JumpToTop => self.scroll_to(0, now),
            Action::JumpToBottom => self.scroll_to(self.max_scroll(), now),
            Action::NextPage => self.jump_to_page(self.listing.current_page + 1, now),
            Action::PrevPage => match self.listing.current_page.checked_sub(1) {
                Some(page) if page > 0 => self.jump_to_page(page, now),
                _ => Vec::new(),
            },
            Action::None => Vec::new(),
        }
    }

    /// Scroll by whole item rows
    pub fn scroll_lines(&mut self, lines: i64, now: Instant) -> Vec<PageRequest> {
        self.scroll_by(lines * i64::from(self.row_height()), now)
    }

    pub fn scroll_by(&mut self, delta: i64, now: Instant) -> Vec<PageRequest> {
        let target = (i64::from(self.scroll_offset) + delta).clamp(0, i64::from(self.max_scroll()));
        self.scroll_to(target as u32, now)
    }

    /// User scroll to an absolute offset
    ///
    /// The pager sees every scroll input, even one that cannot move the view,
    /// so a short list at its bottom edge still prefetches.
    pub fn scroll_to(&mut self, offset: u32, now: Instant) -> Vec<PageRequest> {
        self.scroll_offset = offset.min(self.max_scroll());
        let viewport = self.viewport();
        let effects = self.pager.on_scroll(&self.listing.props(), viewport, now);
        self.apply(effects)
    }

    /// Make `page` current, fetching it first if needed
    pub fn jump_to_page(&mut self, page: u32, now: Instant) -> Vec<PageRequest> {
        if page == 0 || page > self.listing.total_pages {
            self.set_status(format!("No page {}", page));
            return Vec::new();
        }

        if self.listing.cache.contains(page) {
            self.listing.current_page = page;
            self.listing.is_page_change = true;
            let viewport = self.viewport();
            let effects = self
                .pager
                .record_page_change(&self.listing.props(), viewport, now);
            return self.apply(effects);
        }

        // Already on its way as a prefetch; its arrival makes it current
        if self.pager.pending_load().is_some_and(|t| t.page == page) {
            self.set_status(format!("Loading page {}...", page));
            return Vec::new();
        }

        if self.pending_jumps.insert(page) {
            self.set_status(format!("Loading page {}...", page));
            vec![PageRequest { page, ticket: None }]
        } else {
            Vec::new()
        }
    }

    /// Whether a fetch result is one the app is still waiting for
    fn is_awaited(&self, page: u32, ticket: Option<u64>) -> bool {
        match ticket {
            Some(id) => self.pager.pending_load().is_some_and(|t| t.id == id),
            None => self.pending_jumps.contains(&page),
        }
    }

    /// A fetch finished
    pub fn page_loaded(&mut self, result: PageLoadResult, now: Instant) -> Vec<PageRequest> {
        match result {
            PageLoadResult::Success {
                page,
                items,
                ticket,
            } => {
                debug!(page, items = items.len(), ?ticket, "Page arrived");
                let awaited = self.is_awaited(page, ticket);
                self.pending_jumps.remove(&page);
                self.listing.cache.insert(page, items);

                if !awaited {
                    // Late or duplicate: keep the data, stay on the current page
                    debug!(page, ?ticket, "Keeping unexpected page");
                    let viewport = self.viewport();
                    let effects = self.pager.refresh(&self.listing.props(), viewport);
                    return self.apply(effects);
                }

                // The arrived page becomes current; the pager records where it starts
                self.listing.current_page = page;
                self.listing.is_page_change = true;
                let viewport = self.viewport();
                let effects = self
                    .pager
                    .record_page_change(&self.listing.props(), viewport, now);
                let mut requests = self.apply(effects);

                if let Some(id) = ticket {
                    requests.extend(self.finish_load(id, Ok(()), now));
                }
                self.clear_status();
                requests
            }
            PageLoadResult::Failure {
                page,
                error,
                ticket,
            } => {
                self.pending_jumps.remove(&page);
                self.set_status(error.to_string());
                match ticket {
                    Some(id) => self.finish_load(id, Err(error), now),
                    None if error.is_recoverable() => {
                        warn!(page, error = %error, "Page fetch failed");
                        Vec::new()
                    }
                    None => {
                        error!(page, error = %error, "Page fetch failed");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Advance pager timers
    pub fn tick(&mut self, now: Instant) -> Vec<PageRequest> {
        let viewport = self.viewport();
        let effects = self.pager.tick(&self.listing.props(), viewport, now);
        self.apply(effects)
    }

    fn finish_load(&mut self, ticket: u64, outcome: Result<()>, now: Instant) -> Vec<PageRequest> {
        let viewport = self.viewport();
        match self
            .pager
            .complete_load(ticket, outcome, &self.listing.props(), viewport, now)
        {
            Ok(effects) => self.apply(effects),
            Err(e) if e.is_recoverable() => {
                debug!(error = %e, "Ignoring load completion");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Load completion rejected");
                Vec::new()
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Vec<PageRequest> {
        let mut requests = Vec::new();
        for effect in effects {
            match effect {
                Effect::RequestPage(ticket) => requests.push(PageRequest {
                    page: ticket.page,
                    ticket: Some(ticket.id),
                }),
                Effect::SetCurrentPage(page) => self.listing.current_page = page,
                Effect::ScrollTo(offset) => self.scroll_offset = offset.min(self.max_scroll()),
                Effect::ClearPageChange => self.listing.is_page_change = false,
            }
        }
        requests
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pagescroll_core::{Error, Item};

    use super::*;

    const PER_PAGE: usize = 20;

    fn items(page: u32) -> Vec<Item> {
        (0..PER_PAGE)
            .map(|i| Item::with_title(format!("p{} #{}", page, i)))
            .collect()
    }

    fn arrived(page: u32, ticket: Option<u64>) -> PageLoadResult {
        PageLoadResult::Success {
            page,
            items: items(page),
            ticket,
        }
    }

    fn app(total_pages: u32) -> (App, Instant) {
        let mut app = App::new(Arc::new(AppConfig::default()), total_pages, PER_PAGE as u32);
        app.set_viewport_rows(10);
        (app, Instant::now())
    }

    fn ms(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    /// Jump to a page and deliver it
    fn open(app: &mut App, page: u32, now: Instant) {
        app.jump_to_page(page, now);
        app.page_loaded(arrived(page, None), now);
    }

    #[test]
    fn test_start_requests_first_page() {
        let (mut app, start) = app(3);
        let requests = app.start(start);

        assert_eq!(requests, vec![PageRequest { page: 1, ticket: None }]);
        assert!(app.visible_items().is_empty());
        assert!(!app.is_loading());

        // Asking again while in flight does not duplicate
        assert!(app.start(start).is_empty());
    }

    #[test]
    fn test_scroll_to_bottom_prefetches_next_page() {
        let (mut app, start) = app(3);
        app.start(start);
        app.page_loaded(arrived(1, None), start);
        assert_eq!(app.listing.current_page, 1);
        assert_eq!(app.pager.offsets().get(1), Some(0));

        let requests = app.handle_action(Action::JumpToBottom, ms(start, 1000));
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].page, 2);
        let ticket = requests[0].ticket;
        assert!(ticket.is_some());
        assert!(app.is_loading());

        assert!(app.handle_action(Action::ScrollDown, ms(start, 1010)).is_empty());
        assert!(app.handle_action(Action::ScrollUp, ms(start, 1020)).is_empty());

        app.page_loaded(arrived(2, ticket), ms(start, 1400));
        assert!(!app.is_loading());
        assert_eq!(app.listing.current_page, 2);
        assert_eq!(app.scroll_offset, 20);
        assert_eq!(app.visible_items()[0].title, "p2 #0");
    }

    #[test]
    fn test_jump_to_cached_page_restores_boundary() {
        let (mut app, start) = app(3);
        open(&mut app, 1, start);
        open(&mut app, 2, start);
        assert_eq!(app.scroll_offset, 20);

        let requests = app.handle_action(Action::PrevPage, ms(start, 100));
        assert!(requests.is_empty());
        assert_eq!(app.listing.current_page, 1);
        assert_eq!(app.scroll_offset, 0);
        assert!(!app.listing.is_page_change);
    }

    #[test]
    fn test_jump_to_uncached_page_fetches_it() {
        let (mut app, start) = app(5);
        open(&mut app, 1, start);

        let requests = app.handle_action(Action::NextPage, ms(start, 100));
        assert_eq!(requests, vec![PageRequest { page: 2, ticket: None }]);
        assert!(app.status_message.is_some());

        app.page_loaded(arrived(2, None), ms(start, 300));
        assert_eq!(app.listing.current_page, 2);
        assert!(app.pending_jumps.is_empty());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_jump_out_of_range() {
        let (mut app, start) = app(2);
        assert!(app.jump_to_page(3, start).is_empty());
        assert!(app.jump_to_page(0, start).is_empty());
        assert_eq!(app.status_message.as_deref(), Some("No page 0"));
    }

    #[test]
    fn test_failed_prefetch_clears_loading() {
        let (mut app, start) = app(3);
        open(&mut app, 1, start);
        let requests = app.handle_action(Action::JumpToBottom, ms(start, 1000));

        app.page_loaded(
            PageLoadResult::Failure {
                page: 2,
                error: Error::FetchFailed {
                    page: 2,
                    reason: "offline".to_string(),
                },
                ticket: requests[0].ticket,
            },
            ms(start, 1200),
        );

        assert!(!app.is_loading());
        assert!(app.status_message.as_deref().unwrap().contains("offline"));
        assert_eq!(app.listing.current_page, 1);

        // Next crossing retries
        assert_eq!(app.handle_action(Action::ScrollDown, ms(start, 1300)).len(), 1);
    }

    #[test]
    fn test_jump_to_page_being_prefetched_does_not_refetch() {
        let (mut app, start) = app(3);
        open(&mut app, 1, start);

        let prefetch = app.handle_action(Action::JumpToBottom, ms(start, 1000));
        assert_eq!(prefetch.len(), 1);
        assert_eq!(prefetch[0].page, 2);

        assert!(app.handle_action(Action::NextPage, ms(start, 1100)).is_empty());
        assert!(app.pending_jumps.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Loading page 2..."));

        app.page_loaded(arrived(2, prefetch[0].ticket), ms(start, 1400));
        assert!(!app.is_loading());
        assert_eq!(app.listing.current_page, 2);
        assert_eq!(app.scroll_offset, 20);
        assert_eq!(app.listing.cache.len(), 2);
    }

    #[test]
    fn test_late_prefetch_is_kept_without_moving() {
        let (mut app, start) = app(3);
        open(&mut app, 1, start);
        let ticket = app.handle_action(Action::JumpToBottom, ms(start, 1000))[0].ticket;

        app.tick(ms(start, 4000));
        assert!(!app.is_loading());
        assert_eq!(app.scroll_offset, 0);

        app.page_loaded(arrived(2, ticket), ms(start, 4100));
        assert!(app.listing.cache.contains(2));
        assert_eq!(app.pager.display().len(), 2 * PER_PAGE);
        assert_eq!(app.listing.current_page, 1);
        assert_eq!(app.scroll_offset, 0);
        assert_eq!(app.pager.offsets().get(2), None);
    }

    #[test]
    fn test_zero_row_height_still_scrolls() {
        let mut config = AppConfig::default();
        config.pager.row_height = 0;
        let mut app = App::new(Arc::new(config), 3, PER_PAGE as u32);
        app.set_viewport_rows(10);
        let start = Instant::now();
        open(&mut app, 1, start);

        assert_eq!(app.pager.content_height(), PER_PAGE as u32);
        assert!(app.handle_action(Action::ScrollDown, ms(start, 1000)).is_empty());
        assert_eq!(app.scroll_offset, 1);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_quit() {
        let (mut app, start) = app(1);
        app.handle_action(Action::Quit, start);
        assert!(app.should_quit);
    }
}
