use coin_dashboard::render::render_dashboard;
use coin_dashboard::{Dashboard, DashboardConfig, SortKey};
use std::time::Duration;
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut dashboard = Dashboard::with_coingecko(DashboardConfig::default())?;

    // 1. Initial load
    dashboard.mount();
    while dashboard.state().loading {
        dashboard.process_next().await;
    }
    // Give trending a moment to land
    let _ = timeout(Duration::from_secs(2), dashboard.process_next()).await;
    println!("{}\n", render_dashboard(&dashboard.view()));

    if dashboard.state().error.is_some() {
        return Ok(());
    }

    // 2. Next page, sorted by 24h change
    if dashboard.load_more() {
        while dashboard.state().loading_more {
            dashboard.process_next().await;
        }
    }
    dashboard.toggle_sort(SortKey::Change24h);
    dashboard.toggle_sort(SortKey::Change24h);

    // 3. Search, then open the first match
    dashboard.set_search("bit");
    while dashboard.state().debounced_search != dashboard.state().search {
        dashboard.process_next().await;
    }
    let first = dashboard.visible_coins().first().map(|coin| coin.id.clone());
    if let Some(id) = first {
        dashboard.select_coin(id);
        let _ = timeout(Duration::from_secs(10), dashboard.process_next()).await;
    }

    println!("{}", render_dashboard(&dashboard.view()));
    Ok(())
}
