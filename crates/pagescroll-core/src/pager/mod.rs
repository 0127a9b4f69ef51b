//! Scroll pager: page-boundary bookkeeping for a lazily paginated list
//!
//! The pager is headless. The caller feeds it snapshots of its own state
//! (`PagerProps`), the current `Viewport` and a clock reading, and applies the
//! `Effect`s it returns.
//!
//! # Layers
//!
//! ## Atomic
//! - `timer` - One-shot deadline timer
//! - `offsets` - Page offset index (page -> boundary offset)
//! - `display` - Flattened display list built from the page cache
//! - `types` - Props, viewport, tickets and effects
//!
//! ## Molecular
//! - `state` - `ScrollPager`, the state machine combining the atoms
//!
//! # Usage
//!
//! ```ignore
//! let mut pager = ScrollPager::new(PagerConfig::default());
//!
//! // On every user scroll
//! let effects = pager.on_scroll(&props, viewport, Instant::now());
//!
//! // Each frame
//! let effects = pager.tick(&props, viewport, Instant::now());
//! ```

pub mod display;
pub mod offsets;
pub mod timer;
pub mod types;

pub mod state;

pub use display::DisplayList;
pub use offsets::PageOffsetIndex;
pub use state::ScrollPager;
pub use timer::SettleTimer;
pub use types::{Direction, Effect, LoadTicket, PagerProps, ScrollMetrics, Viewport};
