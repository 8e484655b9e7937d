//! Dashboard configuration built from compile-time defaults

use crate::constants::{COINGECKO_API_URL, HIGHLIGHTS_LEN, PAGE_SIZE, SEARCH_DEBOUNCE_MS};
use std::time::Duration;

/// Settings for a [`Dashboard`](crate::Dashboard) session
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API base URL handed to the default provider
    pub base_url: String,
    /// Rows requested per market page
    pub page_size: u32,
    /// How long the search text must be stable before filtering
    pub search_debounce: Duration,
    /// Entries per highlights panel
    pub highlights_len: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            page_size: PAGE_SIZE,
            search_debounce: Duration::from_millis(SEARCH_DEBOUNCE_MS),
            highlights_len: HIGHLIGHTS_LEN,
        }
    }
}
