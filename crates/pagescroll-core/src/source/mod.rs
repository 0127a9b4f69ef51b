mod demo;

pub use demo::DemoSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::item::Item;

/// Something that can hand out pages of items
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Source name for display
    fn name(&self) -> &str;

    fn total_pages(&self) -> u32;

    fn items_per_page(&self) -> u32;

    /// Fetch one 1-based page
    async fn fetch_page(&self, page: u32) -> Result<Vec<Item>>;
}
