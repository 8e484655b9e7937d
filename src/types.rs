//! Types for the market dashboard

use serde::{Deserialize, Serialize};

/// A row of the market listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// CoinGecko id, unique within a session (e.g. "bitcoin")
    pub id: String,
    /// Display name
    pub name: String,
    /// Ticker symbol as returned by the API (lowercase)
    pub symbol: String,
    /// Icon URL
    pub image: String,
    /// Price in USD
    pub current_price: Option<f64>,
    /// 24h price change percentage
    pub price_change_percentage_24h: Option<f64>,
    /// Market capitalization in USD
    pub market_cap: f64,
    /// 24h trading volume in USD
    pub total_volume: f64,
    /// Rank by market cap
    pub market_cap_rank: Option<u32>,
    /// Hourly price samples over the last 7 days, oldest first
    pub sparkline: Vec<f64>,
}

impl Coin {
    /// Create a coin with only identity fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: String::new(),
            current_price: None,
            price_change_percentage_24h: None,
            market_cap: 0.0,
            total_volume: 0.0,
            market_cap_rank: None,
            sparkline: Vec::new(),
        }
    }
}

/// A coin from the trending endpoint
///
/// The endpoint carries no price, so none is modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingItem {
    pub id: String,
    pub name: String,
    pub symbol: String,
    /// Small icon URL
    pub thumb: String,
    pub market_cap_rank: Option<u32>,
}

/// Detail for a single selected coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub name: String,
    pub symbol: String,
    /// Small icon URL
    pub image: String,
    pub current_price_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    /// External links, homepage entries first
    pub links: Vec<String>,
}

impl CoinDetail {
    /// The first homepage link, if any
    pub fn homepage(&self) -> Option<&str> {
        self.links.first().map(String::as_str)
    }
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Rank,
    Name,
    Symbol,
    Price,
    Change24h,
    Volume,
    MarketCap,
}

impl SortKey {
    /// Column header label
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Rank => "#",
            SortKey::Name => "Coin",
            SortKey::Symbol => "Symbol",
            SortKey::Price => "Price",
            SortKey::Change24h => "24h %",
            SortKey::Volume => "Volume",
            SortKey::MarketCap => "Market Cap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header arrow for the active column
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Clicking the active column reverses it; a new column starts ascending
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.reversed())
        } else {
            Self::new(key, SortDirection::Ascending)
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortKey::Rank, SortDirection::Ascending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_same_key_reverses() {
        let spec = SortSpec::default().toggled(SortKey::Rank);
        assert_eq!(spec.direction, SortDirection::Descending);
        assert_eq!(spec.toggled(SortKey::Rank), SortSpec::default());
    }

    #[test]
    fn test_toggle_new_key_is_ascending() {
        let spec = SortSpec::new(SortKey::Price, SortDirection::Descending).toggled(SortKey::Volume);
        assert_eq!(spec, SortSpec::new(SortKey::Volume, SortDirection::Ascending));
    }

    #[test]
    fn test_homepage_is_first_link() {
        let detail = CoinDetail {
            id: "bitcoin".into(),
            name: "Bitcoin".into(),
            symbol: "btc".into(),
            image: String::new(),
            current_price_usd: Some(1.0),
            market_cap_usd: None,
            price_change_percentage_24h: None,
            links: vec!["https://bitcoin.org".into(), "https://example.com".into()],
        };
        assert_eq!(detail.homepage(), Some("https://bitcoin.org"));
    }
}
