//! glance - demo driver: load one configured panel and print it

use std::sync::Arc;

use glance::config;
use glance::providers::GraphSource;
use glance::render::render_panel;
use glance::Panel;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // The host normally supplies an authenticated client. Without a token
    // the panel is not ready and there is nothing to show.
    let Ok(token) = std::env::var("GRAPH_TOKEN") else {
        eprintln!("GRAPH_TOKEN is not set; provide a Graph bearer token to load a panel");
        return;
    };

    let settings = config::load_or_default();
    tracing::info!(kind = ?settings.kind, "starting glance panel");

    let source = Arc::new(GraphSource::new(token));
    let mut panel = Panel::new(settings, source);
    panel.refresh().await;

    for line in render_panel(panel.state(), panel.settings(), chrono::Utc::now()) {
        println!("{line}");
    }
}
