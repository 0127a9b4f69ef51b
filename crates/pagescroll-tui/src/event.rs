use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};
use pagescroll_core::Item;

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

/// Result of an async page fetch
#[derive(Debug)]
pub enum PageLoadResult {
    /// Page fetched successfully
    Success {
        page: u32,
        items: Vec<Item>,
        /// Pager ticket, None for fetches the app started itself
        ticket: Option<u64>,
    },
    /// Page fetch failed
    Failure {
        page: u32,
        error: pagescroll_core::Error,
        ticket: Option<u64>,
    },
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => Ok(Some(AppEvent::WheelDown)),
                    MouseEventKind::ScrollUp => Ok(Some(AppEvent::WheelUp)),
                    _ => Ok(None),
                },
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse wheel moved down
    WheelDown,
    /// Mouse wheel moved up
    WheelUp,
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}
