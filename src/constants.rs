//! Constants for the market dashboard
//!
//! All defaults are centralized here. No runtime configuration (config file,
//! environment) is read; `DashboardConfig::default()` is built from these.

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Paginated market listing
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Trending search coins
pub const COINGECKO_TRENDING_ENDPOINT: &str = "/search/trending";

/// Single coin detail (the id is appended)
pub const COINGECKO_COIN_ENDPOINT: &str = "/coins";

/// Quote currency for every market request
pub const VS_CURRENCY: &str = "usd";

/// Rows requested per market page
pub const PAGE_SIZE: u32 = 50;

/// Quiescence window before the search query is applied (in milliseconds)
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Entries shown in each highlights panel
pub const HIGHLIGHTS_LEN: usize = 3;

/// Entries shown by the standalone top-gainers panel
pub const STANDALONE_HIGHLIGHTS_LEN: usize = 5;

/// Sparkline viewport used by the table (in pixels)
pub const SPARKLINE_WIDTH: f64 = 120.0;
pub const SPARKLINE_HEIGHT: f64 = 40.0;

/// Columns of the text sparkline in the table's 7d column
pub const SPARKLINE_COLUMNS: usize = 16;

/// Stroke colors for rising and falling trends
pub const TREND_UP_COLOR: &str = "#16c784";
pub const TREND_DOWN_COLOR: &str = "#ea3943";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-dashboard/0.1.0";
