//! CoinGecko market-data provider implementation

use crate::{
    cancel::CancelSignal,
    constants::{
        COINGECKO_API_URL, COINGECKO_COIN_ENDPOINT, COINGECKO_MARKETS_ENDPOINT,
        COINGECKO_TRENDING_ENDPOINT, USER_AGENT, VS_CURRENCY,
    },
    error::FetchError,
    provider::MarketDataProvider,
    types::{Coin, CoinDetail, TrendingItem},
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Row of `/coins/markets`
#[derive(Debug, Deserialize)]
struct MarketRow {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    image: Option<String>,
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
    market_cap_rank: Option<u32>,
    #[serde(default)]
    sparkline_in_7d: Option<SparklineIn7d>,
}

#[derive(Debug, Deserialize)]
struct SparklineIn7d {
    #[serde(default)]
    price: Vec<Option<f64>>,
}

impl From<MarketRow> for Coin {
    fn from(row: MarketRow) -> Self {
        Coin {
            id: row.id,
            name: row.name,
            symbol: row.symbol,
            image: row.image.unwrap_or_default(),
            current_price: row.current_price,
            price_change_percentage_24h: row.price_change_percentage_24h,
            market_cap: row.market_cap.unwrap_or_default(),
            total_volume: row.total_volume.unwrap_or_default(),
            market_cap_rank: row.market_cap_rank,
            sparkline: row
                .sparkline_in_7d
                .map(|s| s.price.into_iter().flatten().collect())
                .unwrap_or_default(),
        }
    }
}

/// `/search/trending` response
#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    coins: Vec<TrendingEntry>,
}

#[derive(Debug, Deserialize)]
struct TrendingEntry {
    item: TrendingCoin,
}

#[derive(Debug, Deserialize)]
struct TrendingCoin {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    small: Option<String>,
    #[serde(default)]
    market_cap_rank: Option<u32>,
}

impl From<TrendingEntry> for TrendingItem {
    fn from(entry: TrendingEntry) -> Self {
        let coin = entry.item;
        TrendingItem {
            id: coin.id,
            name: coin.name,
            symbol: coin.symbol,
            thumb: coin.small.unwrap_or_default(),
            market_cap_rank: coin.market_cap_rank,
        }
    }
}

/// `/coins/{id}` response, reduced payload
#[derive(Debug, Deserialize)]
struct DetailResponse {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    image: Option<DetailImage>,
    #[serde(default)]
    market_data: Option<DetailMarketData>,
    #[serde(default)]
    links: Option<DetailLinks>,
}

#[derive(Debug, Deserialize)]
struct DetailImage {
    small: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailMarketData {
    #[serde(default)]
    current_price: UsdValue,
    #[serde(default)]
    market_cap: UsdValue,
    price_change_percentage_24h: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct UsdValue {
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DetailLinks {
    #[serde(default)]
    homepage: Vec<Option<String>>,
}

impl From<DetailResponse> for CoinDetail {
    fn from(response: DetailResponse) -> Self {
        let market_data = response.market_data;
        CoinDetail {
            id: response.id,
            name: response.name,
            symbol: response.symbol,
            image: response
                .image
                .and_then(|image| image.small)
                .unwrap_or_default(),
            current_price_usd: market_data.as_ref().and_then(|m| m.current_price.usd),
            market_cap_usd: market_data.as_ref().and_then(|m| m.market_cap.usd),
            price_change_percentage_24h: market_data.and_then(|m| m.price_change_percentage_24h),
            links: response
                .links
                .map(|links| {
                    links
                        .homepage
                        .into_iter()
                        .flatten()
                        .filter(|url| !url.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// CoinGecko market-data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a provider against the public CoinGecko API
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a provider against another base URL (e.g. a test server)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds the URL for one page of the market listing
    fn markets_url(&self, page: u32, page_size: u32) -> String {
        format!(
            "{}{}?vs_currency={}&order=market_cap_desc&per_page={}&page={}&sparkline=true&price_change_percentage=24h",
            self.base_url, COINGECKO_MARKETS_ENDPOINT, VS_CURRENCY, page_size, page
        )
    }

    fn trending_url(&self) -> String {
        format!("{}{}", self.base_url, COINGECKO_TRENDING_ENDPOINT)
    }

    /// Builds the detail URL; `id` is percent-encoded as one path segment
    fn detail_url(&self, id: &str) -> Result<Url, FetchError> {
        let endpoint = format!("{}{}", self.base_url, COINGECKO_COIN_ENDPOINT);
        let mut url = Url::parse(&endpoint)
            .map_err(|e| FetchError::NetworkError(format!("Invalid base URL {}: {}", endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::NetworkError(format!("Base URL cannot take a path: {}", endpoint)))?
            .push(id);
        url.query_pairs_mut()
            .append_pair("localization", "false")
            .append_pair("tickers", "false")
            .append_pair("community_data", "false")
            .append_pair("developer_data", "false");
        Ok(url)
    }

    /// Issues a GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "Requesting CoinGecko");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ApiError {
                status: status.as_u16(),
            });
        }

        let response_text = response.text().await?;

        serde_json::from_str(&response_text).map_err(|e| {
            FetchError::invalid_response(format!("Failed to parse CoinGecko response: {}", e))
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(
        &self,
        page: u32,
        page_size: u32,
        cancel: &CancelSignal,
    ) -> Result<Vec<Coin>, FetchError> {
        let url = self.markets_url(page, page_size);
        let rows: Vec<MarketRow> = cancel.run(self.get_json(&url)).await?;

        tracing::debug!(page, count = rows.len(), "Fetched market page");

        Ok(rows.into_iter().map(Coin::from).collect())
    }

    async fn fetch_trending(&self, cancel: &CancelSignal) -> Result<Vec<TrendingItem>, FetchError> {
        let url = self.trending_url();
        let response: TrendingResponse = cancel.run(self.get_json(&url)).await?;

        Ok(response.coins.into_iter().map(TrendingItem::from).collect())
    }

    async fn fetch_coin_detail(
        &self,
        id: &str,
        cancel: &CancelSignal,
    ) -> Result<CoinDetail, FetchError> {
        let url = self.detail_url(id)?;
        let response: DetailResponse = cancel.run(self.get_json(url.as_str())).await?;

        Ok(response.into())
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
