//! Derived projections over the coin collection
//!
//! Filtering, sorting and highlights are pure functions of their inputs.
//! [`Memo`] caches the last result so a projection is only recomputed when
//! one of its inputs changed.

use crate::types::{Coin, SortDirection, SortKey, SortSpec};
use std::cmp::Ordering;

/// Coins whose name or symbol contains `query`, case-insensitively
///
/// The query is trimmed; an empty query matches every coin. Order is kept.
pub fn filter_coins(coins: &[Coin], query: &str) -> Vec<Coin> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return coins.to_vec();
    }

    coins
        .iter()
        .filter(|coin| {
            coin.name.to_lowercase().contains(&needle)
                || coin.symbol.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Stable sort by `spec`, with missing values last in either direction
pub fn sort_coins(coins: &mut [Coin], spec: SortSpec) {
    coins.sort_by(|a, b| compare(a, b, spec));
}

/// Value of one sortable column
#[derive(Debug, PartialEq, PartialOrd)]
enum SortValue {
    Number(f64),
    Text(String),
}

fn sort_value(coin: &Coin, key: SortKey) -> Option<SortValue> {
    match key {
        SortKey::Rank => coin.market_cap_rank.map(|r| SortValue::Number(f64::from(r))),
        SortKey::Name => Some(SortValue::Text(coin.name.to_lowercase())),
        SortKey::Symbol => Some(SortValue::Text(coin.symbol.to_lowercase())),
        SortKey::Price => coin.current_price.map(SortValue::Number),
        SortKey::Change24h => coin.price_change_percentage_24h.map(SortValue::Number),
        SortKey::Volume => Some(SortValue::Number(coin.total_volume)),
        SortKey::MarketCap => Some(SortValue::Number(coin.market_cap)),
    }
    .filter(|value| !matches!(value, SortValue::Number(n) if n.is_nan()))
}

fn compare(a: &Coin, b: &Coin, spec: SortSpec) -> Ordering {
    match (sort_value(a, spec.key), sort_value(b, spec.key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ordering = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

/// Filter then sort: the rows the table shows
pub fn visible_coins(coins: &[Coin], query: &str, spec: SortSpec) -> Vec<Coin> {
    let mut visible = filter_coins(coins, query);
    sort_coins(&mut visible, spec);
    visible
}

/// The `n` coins with the largest 24h change
pub fn top_gainers(coins: &[Coin], n: usize) -> Vec<Coin> {
    ranked_by_change(coins, SortDirection::Descending, n)
}

/// The `n` coins with the smallest 24h change
pub fn top_losers(coins: &[Coin], n: usize) -> Vec<Coin> {
    ranked_by_change(coins, SortDirection::Ascending, n)
}

fn ranked_by_change(coins: &[Coin], direction: SortDirection, n: usize) -> Vec<Coin> {
    let mut ranked: Vec<Coin> = coins
        .iter()
        .filter(|coin| coin.price_change_percentage_24h.is_some_and(f64::is_finite))
        .cloned()
        .collect();
    sort_coins(&mut ranked, SortSpec::new(SortKey::Change24h, direction));
    ranked.truncate(n);
    ranked
}

/// Sum of market caps of the loaded coins
pub fn total_market_cap(coins: &[Coin]) -> f64 {
    coins.iter().map(|coin| coin.market_cap).sum()
}

/// Single-entry cache keyed on a projection's inputs
#[derive(Debug)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    recomputations: u64,
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            entry: None,
            recomputations: 0,
        }
    }

    /// Returns the cached value for `key`, computing it on a miss
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let hit = matches!(&self.entry, Some((cached, _)) if *cached == key);
        if !hit {
            self.recomputations += 1;
            self.entry = None;
        }
        let (_, value) = self.entry.get_or_insert_with(|| (key, compute()));
        value
    }

    /// How many times the value was (re)computed
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

impl<K: PartialEq, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
