//! Text rendering of the dashboard
//!
//! Pure functions of a [`DashboardView`]; nothing here touches state.

use crate::{
    constants::{SPARKLINE_COLUMNS, SPARKLINE_HEIGHT, SPARKLINE_WIDTH},
    controller::DashboardView,
    error::FetchError,
    format::{format_compact_currency, format_currency, format_percent},
    sparkline::{render_blocks, render_svg, trend_color},
    state::Selection,
    types::{Coin, SortKey, SortSpec, TrendingItem},
};
use chrono::{DateTime, Utc};

const TITLE: &str = "Crypto Market Dashboard";

/// Sortable columns, in display order, with their widths
const COLUMNS: [(SortKey, usize); 6] = [
    (SortKey::Rank, 5),
    (SortKey::Name, 26),
    (SortKey::Price, 16),
    (SortKey::Change24h, 10),
    (SortKey::Volume, 22),
    (SortKey::MarketCap, 24),
];

/// Title and aggregate market cap
pub fn render_header(total_market_cap: f64, last_updated: Option<DateTime<Utc>>) -> String {
    let mut header = format!(
        "{}\nMarket cap: {}",
        TITLE,
        format_compact_currency(Some(total_market_cap))
    );
    if let Some(at) = last_updated {
        header.push_str(&format!("  (updated {})", at.format("%H:%M:%S UTC")));
    }
    header
}

/// Trending, top gainers and top losers panels
pub fn render_highlights(
    show: bool,
    trending: &[TrendingItem],
    gainers: &[Coin],
    losers: &[Coin],
) -> String {
    if !show {
        return "[+] Highlights".to_string();
    }

    let mut lines = vec!["[-] Highlights".to_string(), "  Trending".to_string()];
    if trending.is_empty() {
        lines.push("    -".to_string());
    }
    lines.extend(trending.iter().enumerate().map(|(i, item)| {
        format!("    {}. {} ({})", i + 1, item.name, item.symbol.to_uppercase())
    }));

    for (title, coins) in [("Top Gainers", gainers), ("Top Losers", losers)] {
        lines.push(format!("  {}", title));
        if coins.is_empty() {
            lines.push("    -".to_string());
        }
        lines.extend(coins.iter().map(|coin| {
            format!(
                "    {} ({}) {}",
                coin.name,
                coin.symbol.to_uppercase(),
                format_percent(coin.price_change_percentage_24h)
            )
        }));
    }

    lines.join("\n")
}

/// Dismissible error banner with the manual reload action
pub fn render_error_banner(error: &FetchError) -> String {
    format!("! {}  [Retry] [Dismiss]", error)
}

/// Column headers, with an arrow on the active sort column
pub fn render_table_header(sort: SortSpec) -> String {
    let mut header = String::new();
    for (key, width) in COLUMNS {
        let label = if key == sort.key {
            format!("{} {}", key.label(), sort.direction.arrow())
        } else {
            key.label().to_string()
        };
        header.push_str(&pad(&label, width));
    }
    header.push_str("7d");
    header
}

/// One table row
pub fn render_row(coin: &Coin) -> String {
    let rank = coin
        .market_cap_rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    let name = format!("{} ({})", coin.name, coin.symbol.to_uppercase());
    let cells = [
        rank,
        name,
        format_currency(coin.current_price),
        format_percent(coin.price_change_percentage_24h),
        format_currency(Some(coin.total_volume)),
        format_currency(Some(coin.market_cap)),
    ];

    let mut row = String::new();
    for (cell, (_, width)) in cells.iter().zip(COLUMNS) {
        row.push_str(&pad(cell, width));
    }
    row.push_str(&render_blocks(&coin.sparkline, SPARKLINE_COLUMNS));
    row.trim_end().to_string()
}

/// The 7d trend cell as SVG, colored by direction
pub fn render_trend_svg(coin: &Coin) -> String {
    render_svg(
        &coin.sparkline,
        SPARKLINE_WIDTH,
        SPARKLINE_HEIGHT,
        trend_color(&coin.sparkline),
    )
}

/// Header plus one line per coin
pub fn render_table(coins: &[Coin], sort: SortSpec) -> String {
    let mut lines = vec![render_table_header(sort)];
    if coins.is_empty() {
        lines.push("No coins match your search.".to_string());
    }
    lines.extend(coins.iter().map(render_row));
    lines.join("\n")
}

/// The detail view for the selected coin
pub fn render_detail(selection: &Selection) -> String {
    let Some(detail) = &selection.detail else {
        return format!("[{}] Loading...", selection.coin_id);
    };

    let mut lines = vec![
        format!("[{} ({})]", detail.name, detail.symbol.to_uppercase()),
        format!("  Price:      {}", format_currency(detail.current_price_usd)),
        format!("  Market cap: {}", format_currency(detail.market_cap_usd)),
        format!("  24h change: {}", format_percent(detail.price_change_percentage_24h)),
    ];
    if let Some(homepage) = detail.homepage() {
        lines.push(format!("  Homepage:   {}", homepage));
    }
    lines.join("\n")
}

/// The whole page
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut sections = vec![
        render_header(view.total_market_cap, view.last_updated),
        render_highlights(
            view.show_highlights,
            &view.trending,
            &view.top_gainers,
            &view.top_losers,
        ),
    ];

    if let Some(error) = &view.error {
        sections.push(render_error_banner(error));
    }

    sections.push(format!("Search: {}", view.search));

    if view.loading {
        sections.push("Loading market data...".to_string());
    } else if view.error.is_none() || !view.coins.is_empty() {
        sections.push(render_table(&view.coins, view.sort));
        sections.push(if view.loading_more {
            "Loading more...".to_string()
        } else {
            "[Load more]".to_string()
        });
    }

    if let Some(selection) = &view.selection {
        sections.push(render_detail(selection));
    }

    sections.join("\n\n")
}

/// Left-aligns `text` in `width` columns, truncating with an ellipsis
fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count < width {
        format!("{:<width$}", text, width = width)
    } else {
        let truncated: String = text.chars().take(width.saturating_sub(2)).collect();
        format!("{}… ", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoinDetail, SortDirection};

    fn bitcoin() -> Coin {
        Coin {
            current_price: Some(67_000.0),
            price_change_percentage_24h: Some(-1.5),
            market_cap: 1.3e12,
            total_volume: 2.5e10,
            market_cap_rank: Some(1),
            sparkline: vec![1.0, 2.0, 3.0],
            ..Coin::new("bitcoin", "Bitcoin", "btc")
        }
    }

    fn view() -> DashboardView {
        DashboardView {
            loading: false,
            loading_more: false,
            error: None,
            search: String::new(),
            sort: SortSpec::default(),
            coins: vec![bitcoin()],
            total_market_cap: 1.3e12,
            last_updated: None,
            show_highlights: true,
            trending: Vec::new(),
            top_gainers: Vec::new(),
            top_losers: vec![bitcoin()],
            selection: None,
        }
    }

    #[test]
    fn test_render_row() {
        let row = render_row(&bitcoin());
        assert!(row.starts_with("1    Bitcoin (BTC)"));
        assert!(row.contains("$67,000.00"));
        assert!(row.contains("-1.50%"));
        assert!(row.contains("$1,300,000,000,000.00"));
        assert!(row.ends_with("▁▅█"));
    }

    #[test]
    fn test_row_with_missing_values() {
        let row = render_row(&Coin::new("x", "Unlisted", "unl"));
        assert!(row.starts_with("-    Unlisted (UNL)"));
        assert!(!row.contains("NaN"));
    }

    #[test]
    fn test_trend_svg_uses_direction_color() {
        let svg = render_trend_svg(&bitcoin());
        assert!(svg.contains(crate::constants::TREND_UP_COLOR));
        assert!(svg.contains("<polyline"));

        let flat = render_trend_svg(&Coin::new("x", "X", "x"));
        assert!(!flat.contains("<polyline"));
    }

    #[test]
    fn test_table_header_marks_sort_column() {
        let header = render_table_header(SortSpec::new(SortKey::Price, SortDirection::Descending));
        assert!(header.contains("Price ▼"));
        assert!(header.starts_with("#    Coin"));
        assert!(header.ends_with("7d"));
    }

    #[test]
    fn test_loading_suppresses_table() {
        let mut view = view();
        view.loading = true;
        let page = render_dashboard(&view);
        assert!(page.contains("Loading market data..."));
        assert!(!page.contains("Bitcoin (BTC)  "));
        assert!(!page.contains("[Load more]"));
    }

    #[test]
    fn test_failed_load_shows_banner_without_rows() {
        let mut view = view();
        view.coins.clear();
        view.error = Some(FetchError::NetworkError("connection refused".into()));
        let page = render_dashboard(&view);
        assert!(page.contains("! Network error: connection refused  [Retry] [Dismiss]"));
        assert!(!page.contains("#    Coin"));
    }

    #[test]
    fn test_highlights_panels() {
        let trending = vec![TrendingItem {
            id: "pepe".into(),
            name: "Pepe".into(),
            symbol: "pepe".into(),
            thumb: String::new(),
            market_cap_rank: Some(40),
        }];
        let panel = render_highlights(true, &trending, &[], &[bitcoin()]);
        assert!(panel.contains("1. Pepe (PEPE)"));
        assert!(panel.contains("Bitcoin (BTC) -1.50%"));
        assert!(!panel.contains('$'));
        assert_eq!(render_highlights(false, &trending, &[], &[]), "[+] Highlights");
    }

    #[test]
    fn test_render_detail() {
        let mut selection = Selection {
            coin_id: "bitcoin".into(),
            request: 1,
            detail: None,
        };
        assert_eq!(render_detail(&selection), "[bitcoin] Loading...");

        selection.detail = Some(CoinDetail {
            id: "bitcoin".into(),
            name: "Bitcoin".into(),
            symbol: "btc".into(),
            image: String::new(),
            current_price_usd: Some(67_000.0),
            market_cap_usd: None,
            price_change_percentage_24h: Some(2.0),
            links: vec!["https://bitcoin.org".into()],
        });
        let detail = render_detail(&selection);
        assert!(detail.starts_with("[Bitcoin (BTC)]"));
        assert!(detail.contains("Market cap: -"));
        assert!(detail.contains("Homepage:   https://bitcoin.org"));
    }

    #[test]
    fn test_header_shows_compact_market_cap() {
        assert_eq!(
            render_header(1.3e12, None),
            "Crypto Market Dashboard\nMarket cap: $1.30T"
        );
    }

    #[test]
    fn test_pad_truncates_long_names() {
        assert_eq!(pad("abc", 5), "abc  ");
        assert_eq!(pad("abcdefgh", 5), "abc… ");
    }
}
