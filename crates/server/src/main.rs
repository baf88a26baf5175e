//! bizsync-mcp server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use bizsync_core::{AppConfig, LocalStore, SyncEngine};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod source;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(db_path = %config.db_path.display(), remote = %config.remote_url, "Starting bizsync-mcp server on stdio transport");

    let store = LocalStore::open(&config.db_path).await?;
    let engine = SyncEngine::new(store, source::build(&config)).with_version_refresh(config.refresh_version_on_event);

    let painted = engine.load_cached().await;
    tracing::info!(
        businesses = painted.businesses.len(),
        categories = painted.categories.len(),
        "local cache loaded"
    );

    let startup_sync = engine.spawn_smart_sync();
    let feed = engine.subscribe(config.feed_buffer);
    let handler = handler::BizsyncServer::new(engine, feed.sender.clone());
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    startup_sync.abort();
    feed.subscription.unsubscribe();
    let applied = feed.task.await?;
    tracing::info!(applied, "change feed closed");

    Ok(())
}
