use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use hn_best_stories::api::{self, AppState};
use hn_best_stories::config::Settings;
use hn_best_stories::shutdown::ShutdownSignal;
use hn_best_stories::{logging, CancelToken, HackerNewsClient, HackerNewsService, ItemCache, ItemFetcher};

#[actix_web::main]
async fn main() -> Result<()> {
    logging::init();

    let settings = Settings::from_env().context("Failed to load settings")?;

    let client = HackerNewsClient::new(&settings.base_url, settings.request_timeout)?;
    let cache = Arc::new(ItemCache::new(settings.story_cache_ttl));
    let cache_ttl = cache.ttl();
    let fetcher = ItemFetcher::new(Arc::new(client), cache);

    let mut service = HackerNewsService::new(fetcher).with_policy(settings.partial_failure);
    if let Some(permits) = settings.max_concurrency {
        service = service.with_max_concurrency(permits);
    }

    info!(
        base_url = %settings.base_url,
        cache_ttl_secs = cache_ttl.as_secs(),
        max_concurrency = ?settings.max_concurrency,
        partial_failure = ?service.policy(),
        "Starting up"
    );

    // Installed before serving so an early SIGTERM is not lost
    let mut signal = ShutdownSignal::install().context("Failed to install signal handlers")?;

    let shutdown = CancelToken::new();
    let state = web::Data::new(AppState {
        service,
        shutdown: shutdown.clone(),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind(&settings.bind_addr)
    .with_context(|| format!("Failed to bind {}", settings.bind_addr))?
    .disable_signals()
    .run();

    info!(addr = %settings.bind_addr, "Listening");

    let handle = server.handle();
    tokio::spawn(async move {
        signal.recv().await;
        info!("Shutting down");
        // Requests still waiting on the remote fail fast instead of holding shutdown
        shutdown.cancel();
        handle.stop(true).await;
    });

    server.await.context("HTTP server failed")?;
    Ok(())
}
