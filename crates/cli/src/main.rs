//! photofeed entry point.
//!
//! Logging goes to stderr so stdout only carries command output.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use photofeed_core::{AppConfig, CacheDb, LocalImageCache, MemoryStore};
use tracing_subscriber::EnvFilter;

mod browse;
mod cli;

use browse::BrowseOptions;
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Command::Browse { pages, slots, thumb_size, ephemeral } => {
            let options = BrowseOptions { pages, slots, thumb_size };
            if ephemeral {
                tracing::info!("using in-memory image cache");
                browse::run(&config, Arc::new(LocalImageCache::new(MemoryStore::new())), &options).await?;
            } else {
                let db = open_cache(&config).await?;
                browse::run(&config, Arc::new(LocalImageCache::new(db)), &options).await?;
            }
        }
        Command::Invalidate => {
            let cache = LocalImageCache::new(open_cache(&config).await?);
            let deleted = cache.invalidate().await?;
            println!("removed {deleted} expired images");
        }
    }

    Ok(())
}

async fn open_cache(config: &AppConfig) -> Result<CacheDb> {
    tracing::info!(path = %config.db_path.display(), "opening image cache");
    CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open cache at {}", config.db_path.display()))
}
