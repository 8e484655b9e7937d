//! Provider abstraction for fetching market data from external APIs

use crate::{
    cancel::CancelSignal,
    error::FetchError,
    types::{Coin, CoinDetail, TrendingItem},
};
use async_trait::async_trait;

/// Trait for market-data providers
///
/// Every call takes a [`CancelSignal`]. Once it fires, the call must resolve
/// to [`FetchError::Canceled`] instead of a result.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches one page of the market listing, USD, by descending market cap
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `page_size` - Rows per page
    /// * `cancel` - Cancellation signal for this request
    async fn fetch_markets(
        &self,
        page: u32,
        page_size: u32,
        cancel: &CancelSignal,
    ) -> Result<Vec<Coin>, FetchError>;

    /// Fetches the currently trending coins
    async fn fetch_trending(&self, cancel: &CancelSignal) -> Result<Vec<TrendingItem>, FetchError>;

    /// Fetches the reduced detail payload for one coin
    async fn fetch_coin_detail(
        &self,
        id: &str,
        cancel: &CancelSignal,
    ) -> Result<CoinDetail, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
