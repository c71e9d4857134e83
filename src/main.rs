use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use news_fanout::cache::CacheGate;
use news_fanout::config::Config;
use news_fanout::fetcher::Fetcher;
use news_fanout::routes::{self, AppState};
use news_fanout::upstream::HttpUpstream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "news_fanout=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("FEEDS_CONFIG").unwrap_or_else(|_| "feeds.toml".to_string());
    let config = Config::load(&config_path)?;
    info!(
        "Loaded {} feeds from {} (cache ttl {}m)",
        config.feeds.len(),
        config_path,
        config.cache_ttl_minutes
    );

    let upstream = Arc::new(HttpUpstream::new()?);
    let fetcher = Fetcher::with_icon_policy(upstream, config.icon_policy());
    let cache = Arc::new(CacheGate::new(fetcher, config.ttl()));

    let state = Arc::new(AppState {
        cache,
        sources: config.source_urls(),
    });

    let app = routes::build_router(state, &config.allowed_origin, &config.static_dir)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Server listening on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
