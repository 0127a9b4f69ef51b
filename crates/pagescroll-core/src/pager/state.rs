//! Scroll pager state machine
//!
//! Idle -> Loading when a neighbor page is needed at an edge, Loading -> Idle
//! on the load's completion signal or its fallback timeout.

use std::time::Instant;

use tracing::{debug, warn};

use crate::cache::PageCache;
use crate::config::PagerConfig;
use crate::error::{Error, Result};

use super::display::DisplayList;
use super::offsets::PageOffsetIndex;
use super::timer::SettleTimer;
use super::types::{Direction, Effect, LoadTicket, PagerProps, ScrollMetrics, Viewport};

/// A load that has been requested but not reported back
#[derive(Debug, Clone)]
struct PendingLoad {
    ticket: LoadTicket,
    started: Instant,
    /// Fallback in case the completion never arrives
    timeout: SettleTimer,
}

/// Page-boundary bookkeeping for one list instance
///
/// Owns the offset index, the display list, the loading state and the
/// suppression timer. Everything else (cache, current page, page-change
/// flag) belongs to the caller and arrives through `PagerProps`.
#[derive(Debug, Clone)]
pub struct ScrollPager {
    config: PagerConfig,
    offsets: PageOffsetIndex,
    display: DisplayList,
    load: Option<PendingLoad>,
    /// Mutes the scroll listener after a programmatic page change
    settle: SettleTimer,
    next_ticket: u64,
    last_error: Option<String>,
}

impl Default for ScrollPager {
    fn default() -> Self {
        Self::new(PagerConfig::default())
    }
}

impl ScrollPager {
    /// A `row_height` of 0 is treated as 1
    pub fn new(mut config: PagerConfig) -> Self {
        config.row_height = config.row_height.max(1);
        Self {
            config,
            offsets: PageOffsetIndex::new(),
            display: DisplayList::default(),
            load: None,
            settle: SettleTimer::default(),
            next_ticket: 0,
            last_error: None,
        }
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    pub fn offsets(&self) -> &PageOffsetIndex {
        &self.offsets
    }

    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.load.is_some()
    }

    pub fn pending_load(&self) -> Option<LoadTicket> {
        self.load.as_ref().map(|load| load.ticket)
    }

    /// Scroll listener muted by the settle timer
    #[inline]
    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.settle.is_pending(now)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Height of the display list in scroll units
    pub fn content_height(&self) -> u32 {
        let rows = u32::try_from(self.display.len()).unwrap_or(u32::MAX);
        rows.saturating_mul(self.config.row_height)
    }

    pub fn metrics(&self, viewport: Viewport) -> ScrollMetrics {
        ScrollMetrics {
            scroll_offset: viewport.scroll_offset,
            viewport_height: viewport.viewport_height,
            content_height: self.content_height(),
        }
    }

    /// Rebuild the display list if the cache changed
    ///
    /// Recorded boundaries of laid-out pages follow the new layout, so a page
    /// prepended above them shifts them down.
    pub fn sync_cache(&mut self, cache: &PageCache) -> bool {
        if !self.display.sync(cache) {
            return false;
        }
        let moved = self.offsets.reanchor(&self.display, self.config.row_height);
        debug!(
            rows = self.display.len(),
            pages = cache.len(),
            moved,
            monotonic = self.offsets.is_monotonic(),
            "Display list rebuilt"
        );
        true
    }

    /// Sync with the cache and restore the scroll position if it changed
    pub fn refresh(&mut self, props: &PagerProps<'_>, viewport: Viewport) -> Vec<Effect> {
        if self.sync_cache(props.cache) {
            vec![Effect::ScrollTo(self.restore_target(props, viewport))]
        } else {
            Vec::new()
        }
    }

    /// React to a user scroll
    pub fn on_scroll(
        &mut self,
        props: &PagerProps<'_>,
        viewport: Viewport,
        now: Instant,
    ) -> Vec<Effect> {
        if self.settle.is_pending(now) || self.load.is_some() {
            return Vec::new();
        }
        if let Err(e) = props.validate() {
            warn!(error = %e, "Ignoring scroll with invalid pager props");
            return Vec::new();
        }

        self.sync_cache(props.cache);
        let metrics = self.metrics(viewport);
        let page = props.current_page;
        let threshold = self.config.threshold;
        let mut effects = Vec::new();

        // Neighbors only make sense around a page that is on screen
        if props.cache.contains(page) {
            if metrics.near_bottom(threshold)
                && !props.is_last_page()
                && !props.cache.contains(page + 1)
            {
                effects.push(self.begin_load(page + 1, Direction::Next, now));
            } else if !props.is_first_page()
                && !props.cache.contains(page - 1)
                && self
                    .boundary(page)
                    .is_some_and(|start| metrics.scroll_offset <= start.saturating_add(threshold))
            {
                effects.push(self.begin_load(page - 1, Direction::Prev, now));
            }
        }

        if let Some(inferred) = self
            .offsets
            .infer_page(metrics.scroll_offset, metrics.viewport_height)
        {
            if inferred != page {
                effects.push(Effect::SetCurrentPage(inferred));
            }
        }

        effects
    }

    /// Consume the caller's page-change handshake
    ///
    /// Records where the current page begins (once per page), mutes the
    /// scroll listener for the settle duration and moves the view there.
    pub fn record_page_change(
        &mut self,
        props: &PagerProps<'_>,
        viewport: Viewport,
        now: Instant,
    ) -> Vec<Effect> {
        if !props.is_page_change {
            return Vec::new();
        }
        if let Err(e) = props.validate() {
            warn!(error = %e, "Dropping page change with invalid pager props");
            return vec![Effect::ClearPageChange];
        }

        self.sync_cache(props.cache);
        let page = props.current_page;
        let offset = self.layout_start(page).unwrap_or(viewport.scroll_offset);
        if self.offsets.record(page, offset) {
            debug!(page, offset, "Recorded page boundary");
        }
        self.settle.arm(now, self.config.settle_duration());

        vec![
            Effect::ClearPageChange,
            Effect::ScrollTo(self.restore_target(props, viewport)),
        ]
    }

    /// Where the view should sit for the current page
    pub fn restore_target(&self, props: &PagerProps<'_>, viewport: Viewport) -> u32 {
        let metrics = self.metrics(viewport);
        let page = props.current_page;

        let target = if let Some(offset) = self.offsets.get(page) {
            offset
        } else if props.is_first_page() {
            0
        } else if let Some(start) = self.layout_start(page) {
            start
        } else if self.display.last_page().map_or(true, |last| page > last) {
            // Still loading below the content
            metrics.max_scroll()
        } else {
            let total = u64::from(props.total_pages.max(1));
            (u64::from(metrics.content_height) * u64::from(page - 1) / total) as u32
        };

        target.min(metrics.max_scroll())
    }

    /// Completion signal for a requested page
    ///
    /// Call after the cache and current page reflect the fetched data.
    pub fn complete_load(
        &mut self,
        ticket_id: u64,
        outcome: Result<()>,
        props: &PagerProps<'_>,
        viewport: Viewport,
        now: Instant,
    ) -> Result<Vec<Effect>> {
        let load = match self.load.take() {
            Some(load) if load.ticket.id == ticket_id => load,
            other => {
                self.load = other;
                return Err(Error::StaleCallback { ticket: ticket_id });
            }
        };
        let elapsed_ms = now.saturating_duration_since(load.started).as_millis() as u64;

        self.sync_cache(props.cache);
        match outcome {
            Ok(()) => {
                debug!(page = load.ticket.page, elapsed_ms, "Page load completed");
                self.last_error = None;
                Ok(vec![Effect::ScrollTo(self.restore_target(props, viewport))])
            }
            Err(e) => {
                warn!(page = load.ticket.page, elapsed_ms, error = %e, "Page load failed");
                self.last_error = Some(e.to_string());
                Ok(Vec::new())
            }
        }
    }

    /// Advance timers
    pub fn tick(&mut self, props: &PagerProps<'_>, viewport: Viewport, now: Instant) -> Vec<Effect> {
        if self.settle.fire(now) {
            debug!("Scroll listener re-enabled");
        }

        let timed_out = self
            .load
            .as_mut()
            .is_some_and(|load| load.timeout.fire(now));
        if !timed_out {
            return Vec::new();
        }

        if let Some(load) = self.load.take() {
            warn!(
                page = load.ticket.page,
                ticket = load.ticket.id,
                timeout_ms = self.config.load_timeout_ms,
                "Page load did not complete in time"
            );
            self.last_error = Some(format!("Loading page {} timed out", load.ticket.page));
        }
        self.sync_cache(props.cache);
        vec![Effect::ScrollTo(self.restore_target(props, viewport))]
    }

    /// Tear down: cancel timers and forget all recorded state
    ///
    /// Tickets issued before the reset are stale afterwards.
    pub fn reset(&mut self) {
        self.settle.cancel();
        self.load = None;
        self.offsets.clear();
        self.display.clear();
        self.last_error = None;
    }

    fn begin_load(&mut self, page: u32, direction: Direction, now: Instant) -> Effect {
        self.next_ticket += 1;
        let ticket = LoadTicket {
            id: self.next_ticket,
            page,
            direction,
        };
        let mut timeout = SettleTimer::default();
        timeout.arm(now, self.config.load_timeout());
        self.load = Some(PendingLoad {
            ticket,
            started: now,
            timeout,
        });
        debug!(page, ?direction, ticket = ticket.id, "Requesting page");
        Effect::RequestPage(ticket)
    }

    /// Start of a page in the current layout, in scroll units
    fn layout_start(&self, page: u32) -> Option<u32> {
        self.display
            .page_start(page)
            .map(|row| {
                u32::try_from(row)
                    .unwrap_or(u32::MAX)
                    .saturating_mul(self.config.row_height)
            })
    }

    /// Recorded boundary, or the layout start when none was recorded
    fn boundary(&self, page: u32) -> Option<u32> {
        self.offsets.get(page).or_else(|| self.layout_start(page))
    }
}
