pub mod download;
pub mod favicon;
pub mod resolve;
pub mod shell;

use crate::config::Config;
use crate::favicon::{FaviconCache, HttpIconSource, IconSource};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Build the favicon cache described by the config on the current runtime
pub fn create_favicon_cache(config: &Config) -> Result<FaviconCache> {
    let source = HttpIconSource::new(config.favicon.timeout())
        .context("Failed to create favicon HTTP client")?;
    Ok(favicon_cache_with(Arc::new(source), config))
}

pub fn favicon_cache_with(source: Arc<dyn IconSource>, config: &Config) -> FaviconCache {
    FaviconCache::with_settings(
        source,
        Handle::current(),
        config.favicon.cache_capacity,
        config.favicon.workers,
        config.favicon.icon_size,
    )
}
