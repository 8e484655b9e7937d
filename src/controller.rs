//! Dashboard controller
//!
//! Owns the [`ViewState`] of one session, issues provider requests on the
//! tokio runtime and applies their outcomes in completion order.
//!
//! ```text
//! user action ──► Dashboard ──apply──► ViewState
//!                    │  spawn                ▲
//!                    ▼                       │ ViewEvent (mpsc)
//!           MarketDataProvider ──────────────┘
//! ```
//!
//! Requests are scoped by [`CancelGuard`]s: one per session (initial load,
//! trending, load-more) and one per detail selection. Replacing or dropping a
//! guard cancels its requests, so dropping the `Dashboard` cancels everything.

use crate::{
    cancel::{CancelGuard, CancelSignal},
    config::DashboardConfig,
    constants::STANDALONE_HIGHLIGHTS_LEN,
    debounce::Debouncer,
    error::FetchError,
    projection::{self, Memo},
    provider::MarketDataProvider,
    providers::CoinGeckoProvider,
    state::{Selection, ViewEvent, ViewState},
    types::{Coin, SortKey, SortSpec, TrendingItem},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<FetchError>,
    pub search: String,
    pub sort: SortSpec,
    pub coins: Vec<Coin>,
    pub total_market_cap: f64,
    pub last_updated: Option<DateTime<Utc>>,
    pub show_highlights: bool,
    pub trending: Vec<TrendingItem>,
    pub top_gainers: Vec<Coin>,
    pub top_losers: Vec<Coin>,
    pub selection: Option<Selection>,
}

type VisibleKey = (u64, String, SortSpec);
type HighlightKey = (u64, usize);

/// View-state controller for one dashboard session
pub struct Dashboard {
    provider: Arc<dyn MarketDataProvider>,
    config: DashboardConfig,
    state: ViewState,
    events_tx: mpsc::UnboundedSender<ViewEvent>,
    events_rx: mpsc::UnboundedReceiver<ViewEvent>,
    search: Debouncer<String>,
    session_guard: Option<CancelGuard>,
    detail_guard: Option<CancelGuard>,
    visible: Memo<VisibleKey, Vec<Coin>>,
    gainers: Memo<HighlightKey, Vec<Coin>>,
    losers: Memo<HighlightKey, Vec<Coin>>,
}

impl Dashboard {
    /// Creates an idle dashboard; call [`mount`](Self::mount) to start loading
    ///
    /// Must be called within a tokio runtime.
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: DashboardConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let settled_tx = events_tx.clone();
        let search = Debouncer::spawn(String::new(), config.search_debounce, move |query| {
            let _ = settled_tx.send(ViewEvent::SearchSettled(query));
        });

        Self {
            provider,
            config,
            state: ViewState::new(),
            events_tx,
            events_rx,
            search,
            session_guard: None,
            detail_guard: None,
            visible: Memo::new(),
            gainers: Memo::new(),
            losers: Memo::new(),
        }
    }

    /// Creates an idle dashboard backed by CoinGecko at `config.base_url`
    pub fn with_coingecko(config: DashboardConfig) -> Result<Self, FetchError> {
        let provider = CoinGeckoProvider::with_base_url(config.base_url.clone())?;
        Ok(Self::new(Arc::new(provider), config))
    }

    /// Current view state
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Starts the initial load: first market page and trending, concurrently
    ///
    /// Anything still in flight from the previous session is canceled.
    pub fn mount(&mut self) {
        // Dropping the old guard cancels its requests.
        let guard = CancelGuard::new();
        let signal = guard.signal();
        self.session_guard = Some(guard);

        self.state.apply(ViewEvent::LoadStarted);
        let session = self.state.session;

        tracing::info!(
            session,
            provider = self.provider.provider_name(),
            page_size = self.config.page_size,
            "Starting dashboard session"
        );

        self.spawn_markets(session, signal.clone());
        self.spawn_trending(session, signal);
    }

    /// Manual retry: discards the session and loads from scratch
    pub fn reload(&mut self) {
        self.mount();
    }

    /// Requests the next page
    ///
    /// Returns false (and does nothing) while another load is outstanding.
    pub fn load_more(&mut self) -> bool {
        let signal = match &self.session_guard {
            Some(guard) => guard.signal(),
            None => return false,
        };
        if !self.state.apply(ViewEvent::LoadMoreStarted) {
            tracing::debug!("Load more ignored, a load is already outstanding");
            return false;
        }

        let session = self.state.session;
        let page = self.state.next_page();
        let page_size = self.config.page_size;
        let provider = self.provider.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let event = match provider.fetch_markets(page, page_size, &signal).await {
                Ok(coins) => {
                    tracing::info!(page, count = coins.len(), "Loaded more coins");
                    ViewEvent::MoreLoaded {
                        session,
                        page,
                        coins,
                    }
                }
                Err(FetchError::Canceled) => {
                    tracing::debug!(page, "Load more canceled");
                    return;
                }
                Err(error) => {
                    tracing::warn!(page, error = %error, "Failed to load more coins");
                    ViewEvent::MoreFailed { session, error }
                }
            };
            send_unless_canceled(&tx, &signal, event);
        });

        true
    }

    /// Updates the search box; filtering follows once typing pauses
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search.set(text.clone());
        self.state.apply(ViewEvent::SearchEdited(text));
    }

    /// Column click: reverse the active column or sort ascending by a new one
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.state.apply(ViewEvent::SortToggled(key));
    }

    /// Selects a coin and fetches its detail, canceling any previous detail fetch
    pub fn select_coin(&mut self, id: impl Into<String>) {
        let id = id.into();
        let guard = CancelGuard::new();
        let signal = guard.signal();
        self.detail_guard = Some(guard);

        self.state.apply(ViewEvent::CoinSelected(id.clone()));
        let request = self.state.detail_request;

        let provider = self.provider.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            match provider.fetch_coin_detail(&id, &signal).await {
                Ok(detail) => {
                    send_unless_canceled(&tx, &signal, ViewEvent::DetailLoaded { request, detail });
                }
                Err(FetchError::Canceled) => {
                    tracing::debug!(coin = %id, "Detail fetch canceled");
                }
                Err(error) => {
                    // The detail view stays in its loading state.
                    tracing::warn!(coin = %id, error = %error, "Failed to fetch coin detail");
                }
            }
        });
    }

    /// Closes the detail view immediately
    pub fn clear_selection(&mut self) {
        self.detail_guard = None;
        self.state.apply(ViewEvent::SelectionCleared);
    }

    pub fn dismiss_error(&mut self) {
        self.state.apply(ViewEvent::ErrorDismissed);
    }

    pub fn toggle_highlights(&mut self) {
        self.state.apply(ViewEvent::HighlightsToggled);
    }

    /// Waits for the next completed request and applies it
    ///
    /// Returns whether the state changed.
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    /// Applies every outcome that is already available, without waiting
    ///
    /// Returns the number of events applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: ViewEvent) -> bool {
        let changed = self.state.apply(event);
        if !changed {
            tracing::debug!(session = self.state.session, "Discarded stale or no-op event");
        }
        changed
    }

    /// Filtered and sorted rows, recomputed only when their inputs change
    pub fn visible_coins(&mut self) -> &[Coin] {
        let state = &self.state;
        let key = (state.revision, state.debounced_search.clone(), state.sort);
        self.visible.get_or_compute(key, || {
            projection::visible_coins(&state.coins, &state.debounced_search, state.sort)
        })
    }

    /// How many times the visible rows have been recomputed
    pub fn visible_recomputations(&self) -> u64 {
        self.visible.recomputations()
    }

    /// Top `n` coins by 24h change
    pub fn top_gainers(&mut self, n: usize) -> &[Coin] {
        let state = &self.state;
        self.gainers
            .get_or_compute((state.revision, n), || projection::top_gainers(&state.coins, n))
    }

    /// Bottom `n` coins by 24h change
    pub fn top_losers(&mut self, n: usize) -> &[Coin] {
        let state = &self.state;
        self.losers
            .get_or_compute((state.revision, n), || projection::top_losers(&state.coins, n))
    }

    /// Top gainers for the standalone panel
    pub fn standalone_gainers(&mut self) -> &[Coin] {
        self.top_gainers(STANDALONE_HIGHLIGHTS_LEN)
    }

    pub fn total_market_cap(&self) -> f64 {
        projection::total_market_cap(&self.state.coins)
    }

    /// Snapshot for rendering
    pub fn view(&mut self) -> DashboardView {
        let n = self.config.highlights_len;
        let coins = self.visible_coins().to_vec();
        let top_gainers = self.top_gainers(n).to_vec();
        let top_losers = self.top_losers(n).to_vec();
        let state = &self.state;

        DashboardView {
            loading: state.loading,
            loading_more: state.loading_more,
            error: state.error.clone(),
            search: state.search.clone(),
            sort: state.sort,
            coins,
            total_market_cap: projection::total_market_cap(&state.coins),
            last_updated: state.last_updated,
            show_highlights: state.show_highlights,
            trending: state.trending.clone(),
            top_gainers,
            top_losers,
            selection: state.selection.clone(),
        }
    }

    fn spawn_markets(&self, session: u64, signal: CancelSignal) {
        let provider = self.provider.clone();
        let tx = self.events_tx.clone();
        let page_size = self.config.page_size;

        tokio::spawn(async move {
            let event = match provider.fetch_markets(1, page_size, &signal).await {
                Ok(coins) => {
                    tracing::info!(session, count = coins.len(), "Loaded market listing");
                    ViewEvent::MarketsLoaded {
                        session,
                        coins,
                        fetched_at: Utc::now(),
                    }
                }
                Err(FetchError::Canceled) => {
                    tracing::debug!(session, "Market listing canceled");
                    return;
                }
                Err(error) => {
                    tracing::warn!(session, error = %error, "Failed to load market listing");
                    ViewEvent::MarketsFailed { session, error }
                }
            };
            send_unless_canceled(&tx, &signal, event);
        });
    }

    fn spawn_trending(&self, session: u64, signal: CancelSignal) {
        let provider = self.provider.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            match provider.fetch_trending(&signal).await {
                Ok(items) => {
                    tracing::debug!(session, count = items.len(), "Loaded trending coins");
                    send_unless_canceled(&tx, &signal, ViewEvent::TrendingLoaded { session, items });
                }
                Err(FetchError::Canceled) => {
                    tracing::debug!(session, "Trending fetch canceled");
                }
                Err(error) => {
                    tracing::warn!(session, error = %error, "Failed to fetch trending coins");
                }
            }
        });
    }
}

/// A request that completed after its scope was canceled must not reach state
fn send_unless_canceled(
    tx: &mpsc::UnboundedSender<ViewEvent>,
    signal: &CancelSignal,
    event: ViewEvent,
) {
    if signal.is_canceled() {
        tracing::debug!("Dropping result of canceled request");
        return;
    }
    let _ = tx.send(event);
}
