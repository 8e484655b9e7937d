//! Dashboard view state and its event transitions
//!
//! [`ViewState::apply`] is the only way state changes. It performs no I/O;
//! the controller issues requests and feeds their outcomes back in as
//! [`ViewEvent`]s. Outcomes tagged with a superseded session or request id
//! are discarded here.

use crate::error::FetchError;
use crate::types::{Coin, CoinDetail, SortKey, SortSpec, TrendingItem};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// The coin shown in the detail view
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub coin_id: String,
    /// Id of the detail request that belongs to this selection
    pub request: u64,
    /// `None` while the detail is loading
    pub detail: Option<CoinDetail>,
}

impl Selection {
    pub fn is_loading(&self) -> bool {
        self.detail.is_none()
    }
}

/// Everything that can change the view state
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A new initial load begins (mount or manual reload)
    LoadStarted,
    MarketsLoaded {
        session: u64,
        coins: Vec<Coin>,
        fetched_at: DateTime<Utc>,
    },
    MarketsFailed {
        session: u64,
        error: FetchError,
    },
    TrendingLoaded {
        session: u64,
        items: Vec<TrendingItem>,
    },
    LoadMoreStarted,
    MoreLoaded {
        session: u64,
        page: u32,
        coins: Vec<Coin>,
    },
    MoreFailed {
        session: u64,
        error: FetchError,
    },
    SearchEdited(String),
    SearchSettled(String),
    SortToggled(SortKey),
    CoinSelected(String),
    DetailLoaded {
        request: u64,
        detail: CoinDetail,
    },
    SelectionCleared,
    ErrorDismissed,
    HighlightsToggled,
}

/// State of one dashboard session
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Loaded coins, in page order, unique by id
    pub coins: Vec<Coin>,
    /// Last loaded page (1-based; 0 before the first load)
    pub page: u32,
    /// Bumped whenever `coins` changes
    pub revision: u64,
    pub trending: Vec<TrendingItem>,
    pub search: String,
    pub debounced_search: String,
    pub sort: SortSpec,
    pub selection: Option<Selection>,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<FetchError>,
    pub show_highlights: bool,
    /// Generation of the current initial load
    pub session: u64,
    /// Id handed to the most recent detail request
    pub detail_request: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            coins: Vec::new(),
            page: 0,
            revision: 0,
            trending: Vec::new(),
            search: String::new(),
            debounced_search: String::new(),
            sort: SortSpec::default(),
            selection: None,
            loading: false,
            loading_more: false,
            error: None,
            show_highlights: true,
            session: 0,
            detail_request: 0,
            last_updated: None,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event
    ///
    /// Returns false when the event was rejected or stale and nothing changed.
    pub fn apply(&mut self, event: ViewEvent) -> bool {
        match event {
            ViewEvent::LoadStarted => {
                // The collection belongs to a session; a retry starts empty.
                self.session += 1;
                self.coins.clear();
                self.page = 0;
                self.revision += 1;
                self.trending.clear();
                self.loading = true;
                self.loading_more = false;
                self.error = None;
                true
            }
            ViewEvent::MarketsLoaded {
                session,
                coins,
                fetched_at,
            } => {
                if session != self.session {
                    return false;
                }
                self.coins = dedup_by_id(coins, &HashSet::new());
                self.page = 1;
                self.revision += 1;
                self.loading = false;
                self.last_updated = Some(fetched_at);
                true
            }
            ViewEvent::MarketsFailed { session, error } => {
                if session != self.session || error.is_canceled() {
                    return false;
                }
                self.loading = false;
                self.error = Some(error);
                true
            }
            ViewEvent::TrendingLoaded { session, items } => {
                if session != self.session {
                    return false;
                }
                self.trending = items;
                true
            }
            ViewEvent::LoadMoreStarted => {
                if self.loading || self.loading_more {
                    return false;
                }
                self.loading_more = true;
                true
            }
            ViewEvent::MoreLoaded {
                session,
                page,
                coins,
            } => {
                if session != self.session || !self.loading_more || page != self.page + 1 {
                    return false;
                }
                let known: HashSet<&str> = self.coins.iter().map(|c| c.id.as_str()).collect();
                let fresh = dedup_by_id(coins, &known);
                self.coins.extend(fresh);
                self.page = page;
                self.revision += 1;
                self.loading_more = false;
                true
            }
            ViewEvent::MoreFailed { session, error } => {
                if session != self.session || error.is_canceled() {
                    return false;
                }
                self.loading_more = false;
                self.error = Some(error);
                true
            }
            ViewEvent::SearchEdited(text) => {
                self.search = text;
                true
            }
            ViewEvent::SearchSettled(text) => {
                if self.debounced_search == text {
                    return false;
                }
                self.debounced_search = text;
                true
            }
            ViewEvent::SortToggled(key) => {
                self.sort = self.sort.toggled(key);
                true
            }
            ViewEvent::CoinSelected(coin_id) => {
                self.detail_request += 1;
                self.selection = Some(Selection {
                    coin_id,
                    request: self.detail_request,
                    detail: None,
                });
                true
            }
            ViewEvent::DetailLoaded { request, detail } => match &mut self.selection {
                Some(selection) if selection.request == request => {
                    selection.detail = Some(detail);
                    true
                }
                _ => false,
            },
            ViewEvent::SelectionCleared => self.selection.take().is_some(),
            ViewEvent::ErrorDismissed => self.error.take().is_some(),
            ViewEvent::HighlightsToggled => {
                self.show_highlights = !self.show_highlights;
                true
            }
        }
    }

    /// Page number the next load-more should request
    pub fn next_page(&self) -> u32 {
        self.page + 1
    }
}

/// Drops coins whose id is already in `known` or earlier in `coins`
fn dedup_by_id(coins: Vec<Coin>, known: &HashSet<&str>) -> Vec<Coin> {
    let mut seen = HashSet::new();
    coins
        .into_iter()
        .filter(|coin| !known.contains(coin.id.as_str()) && seen.insert(coin.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortDirection;

    fn coins(range: std::ops::RangeInclusive<u32>) -> Vec<Coin> {
        range
            .map(|rank| Coin {
                market_cap_rank: Some(rank),
                ..Coin::new(format!("coin-{rank}"), format!("Coin {rank}"), format!("c{rank}"))
            })
            .collect()
    }

    fn detail(id: &str) -> CoinDetail {
        CoinDetail {
            id: id.to_string(),
            name: id.to_string(),
            symbol: id.to_string(),
            image: String::new(),
            current_price_usd: Some(1.0),
            market_cap_usd: None,
            price_change_percentage_24h: None,
            links: Vec::new(),
        }
    }

    fn loaded(range: std::ops::RangeInclusive<u32>) -> ViewState {
        let mut state = ViewState::new();
        state.apply(ViewEvent::LoadStarted);
        state.apply(ViewEvent::MarketsLoaded {
            session: state.session,
            coins: coins(range),
            fetched_at: Utc::now(),
        });
        state
    }

    #[test]
    fn test_initial_load_replaces_collection() {
        let mut state = loaded(1..=10);
        assert!(!state.loading);
        assert_eq!(state.page, 1);
        assert_eq!(state.coins.len(), 10);

        state.apply(ViewEvent::LoadStarted);
        assert!(state.loading);
        assert!(state.coins.is_empty());
        assert_eq!(state.page, 0);
        state.apply(ViewEvent::MarketsLoaded {
            session: state.session,
            coins: coins(1..=3),
            fetched_at: Utc::now(),
        });
        assert_eq!(state.coins.len(), 3);
    }

    #[test]
    fn test_stale_session_results_are_discarded() {
        let mut state = ViewState::new();
        state.apply(ViewEvent::LoadStarted);
        let stale = state.session;
        state.apply(ViewEvent::LoadStarted);

        assert!(!state.apply(ViewEvent::MarketsLoaded {
            session: stale,
            coins: coins(1..=5),
            fetched_at: Utc::now(),
        }));
        assert!(state.coins.is_empty());
        assert!(state.loading);
    }

    #[test]
    fn test_load_more_appends_and_advances() {
        let mut state = loaded(1..=50);
        assert!(state.apply(ViewEvent::LoadMoreStarted));
        assert!(state.apply(ViewEvent::MoreLoaded {
            session: state.session,
            page: 2,
            coins: coins(51..=100),
        }));

        assert_eq!(state.page, 2);
        assert_eq!(state.coins.len(), 100);
        assert_eq!(state.coins[50].market_cap_rank, Some(51));
        assert!(!state.loading_more);
    }

    #[test]
    fn test_load_more_is_not_reentrant() {
        let mut state = loaded(1..=50);
        assert!(state.apply(ViewEvent::LoadMoreStarted));
        assert!(!state.apply(ViewEvent::LoadMoreStarted));
    }

    #[test]
    fn test_load_more_rejected_during_initial_load() {
        let mut state = ViewState::new();
        state.apply(ViewEvent::LoadStarted);
        assert!(!state.apply(ViewEvent::LoadMoreStarted));
    }

    #[test]
    fn test_load_more_skips_known_ids() {
        let mut state = loaded(1..=50);
        state.apply(ViewEvent::LoadMoreStarted);
        state.apply(ViewEvent::MoreLoaded {
            session: state.session,
            page: 2,
            coins: coins(48..=60),
        });
        assert_eq!(state.coins.len(), 60);
        let unique: HashSet<_> = state.coins.iter().map(|c| &c.id).collect();
        assert_eq!(unique.len(), 60);
    }

    #[test]
    fn test_load_more_failure_keeps_cursor() {
        let mut state = loaded(1..=50);
        state.apply(ViewEvent::LoadMoreStarted);
        state.apply(ViewEvent::MoreFailed {
            session: state.session,
            error: FetchError::ApiError { status: 500 },
        });
        assert_eq!(state.page, 1);
        assert!(!state.loading_more);
        assert_eq!(state.error, Some(FetchError::ApiError { status: 500 }));
    }

    #[test]
    fn test_canceled_never_becomes_visible_error() {
        let mut state = ViewState::new();
        state.apply(ViewEvent::LoadStarted);
        assert!(!state.apply(ViewEvent::MarketsFailed {
            session: state.session,
            error: FetchError::Canceled,
        }));
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_initial_failure_stores_error_and_stops_loading() {
        let mut state = ViewState::new();
        state.apply(ViewEvent::LoadStarted);
        state.apply(ViewEvent::MarketsFailed {
            session: state.session,
            error: FetchError::NetworkError("offline".into()),
        });
        assert!(!state.loading);
        assert!(state.coins.is_empty());
        assert!(state.error.is_some());

        assert!(state.apply(ViewEvent::ErrorDismissed));
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_failed_retry_leaves_no_rows_from_previous_session() {
        let mut state = loaded(1..=50);
        state.apply(ViewEvent::LoadMoreStarted);
        state.apply(ViewEvent::MoreLoaded {
            session: state.session,
            page: 2,
            coins: coins(51..=100),
        });
        state.trending = vec![TrendingItem {
            id: "pepe".into(),
            name: "Pepe".into(),
            symbol: "pepe".into(),
            thumb: String::new(),
            market_cap_rank: None,
        }];
        let revision = state.revision;

        state.apply(ViewEvent::LoadStarted);
        state.apply(ViewEvent::MarketsFailed {
            session: state.session,
            error: FetchError::NetworkError("offline".into()),
        });

        assert!(state.coins.is_empty());
        assert!(state.trending.is_empty());
        assert_eq!(state.page, 0);
        assert_eq!(state.next_page(), 1);
        assert!(state.revision > revision);
        assert!(state.error.is_some());
    }

    #[test]
    fn test_detail_for_superseded_selection_is_discarded() {
        let mut state = ViewState::new();
        state.apply(ViewEvent::CoinSelected("a".into()));
        let request_a = state.detail_request;
        state.apply(ViewEvent::CoinSelected("b".into()));
        let request_b = state.detail_request;

        assert!(!state.apply(ViewEvent::DetailLoaded {
            request: request_a,
            detail: detail("a"),
        }));
        assert!(state.selection.as_ref().unwrap().is_loading());

        assert!(state.apply(ViewEvent::DetailLoaded {
            request: request_b,
            detail: detail("b"),
        }));
        assert_eq!(
            state.selection.as_ref().and_then(|s| s.detail.as_ref()).map(|d| d.id.as_str()),
            Some("b")
        );
    }

    #[test]
    fn test_clearing_selection_drops_detail() {
        let mut state = ViewState::new();
        state.apply(ViewEvent::CoinSelected("a".into()));
        let request = state.detail_request;
        state.apply(ViewEvent::SelectionCleared);
        assert!(!state.apply(ViewEvent::DetailLoaded {
            request,
            detail: detail("a"),
        }));
        assert_eq!(state.selection, None);
    }

    #[test]
    fn test_search_and_sort_transitions() {
        let mut state = ViewState::new();
        state.apply(ViewEvent::SearchEdited("bit".into()));
        assert_eq!(state.search, "bit");
        assert_eq!(state.debounced_search, "");
        assert!(state.apply(ViewEvent::SearchSettled("bit".into())));
        assert!(!state.apply(ViewEvent::SearchSettled("bit".into())));

        state.apply(ViewEvent::SortToggled(SortKey::Price));
        assert_eq!(state.sort, SortSpec::new(SortKey::Price, SortDirection::Ascending));
        state.apply(ViewEvent::SortToggled(SortKey::Price));
        assert_eq!(state.sort.direction, SortDirection::Descending);
    }
}
