pub mod cache;
pub mod config;
pub mod error;
pub mod item;
pub mod pager;
pub mod source;

pub use cache::PageCache;
pub use config::{AppConfig, PagerConfig, SourceConfig};
pub use error::{Error, Result};
pub use item::Item;
pub use pager::{Direction, Effect, LoadTicket, PagerProps, ScrollPager, Viewport};
pub use source::{DemoSource, PageSource};
