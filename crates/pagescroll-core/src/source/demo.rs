use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::PageSource;
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::item::Item;

/// Generated items with simulated latency
///
/// Pages listed in `flaky_pages` fail on their first fetch and succeed
/// afterwards.
pub struct DemoSource {
    config: SourceConfig,
    /// Flaky pages that have already failed once
    failed: Mutex<HashSet<u32>>,
}

impl DemoSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            failed: Mutex::new(HashSet::new()),
        }
    }

    fn per_page(&self) -> u32 {
        self.config.items_per_page.max(1)
    }

    /// Whether this fetch of `page` should be the injected failure
    fn take_failure(&self, page: u32) -> bool {
        if !self.config.flaky_pages.contains(&page) {
            return false;
        }
        match self.failed.lock() {
            Ok(mut failed) => failed.insert(page),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl PageSource for DemoSource {
    fn name(&self) -> &str {
        "demo"
    }

    fn total_pages(&self) -> u32 {
        self.config.total_items.div_ceil(self.per_page())
    }

    fn items_per_page(&self) -> u32 {
        self.per_page()
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<Item>> {
        let total_pages = self.total_pages();
        if page == 0 || page > total_pages {
            return Err(Error::OutOfRange { page, total_pages });
        }

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.take_failure(page) {
            tracing::debug!(page, "Injecting demo fetch failure");
            return Err(Error::FetchFailed {
                page,
                reason: "simulated network error".to_string(),
            });
        }

        let per_page = self.per_page();
        let first = (page - 1) * per_page;
        let last = (first + per_page).min(self.config.total_items);
        Ok((first..last)
            .map(|n| {
                Item::new(
                    Uuid::from_u128(u128::from(n) + 1),
                    format!("Item {} · page {}", n + 1, page),
                )
            })
            .collect())
    }
}
