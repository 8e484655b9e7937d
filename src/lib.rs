//! # Coin Market Dashboard
//!
//! The data and view-state layer of a cryptocurrency market dashboard backed
//! by the public CoinGecko API: a paginated, searchable and sortable coin
//! table with 7-day sparklines, trending / top-mover highlights and a coin
//! detail view.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_dashboard::{render::render_dashboard, Dashboard, DashboardConfig, SortKey};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut dashboard = Dashboard::with_coingecko(DashboardConfig::default())?;
//!
//! // Fetch the first page and trending coins
//! dashboard.mount();
//! while dashboard.state().loading {
//!     dashboard.process_next().await;
//! }
//!
//! dashboard.toggle_sort(SortKey::Change24h);
//! dashboard.set_search("bit");
//! // Filtering applies once the search settles (300ms)
//! while dashboard.state().debounced_search != dashboard.state().search {
//!     dashboard.process_next().await;
//! }
//!
//! println!("{}", render_dashboard(&dashboard.view()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Dashboard (controller)
//!     ↓ spawn, scoped by CancelGuard
//! MarketDataProvider (CoinGecko)
//!     ↓ ViewEvent
//! ViewState::apply (pure transitions)
//!     ↓ memoized projections
//! render (text)
//! ```

pub mod cancel;
pub mod config;
pub mod constants;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod format;
pub mod projection;
pub mod provider;
pub mod providers;
pub mod render;
pub mod sparkline;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use cancel::{CancelGuard, CancelSignal};
pub use config::DashboardConfig;
pub use controller::{Dashboard, DashboardView};
pub use error::FetchError;
pub use provider::MarketDataProvider;
pub use providers::CoinGeckoProvider;
pub use state::{Selection, ViewEvent, ViewState};
pub use types::{Coin, CoinDetail, SortDirection, SortKey, SortSpec, TrendingItem};
