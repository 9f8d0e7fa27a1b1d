use crate::config::Config;
use crate::favicon::{decode_icon, site_root, HttpIconSource, IconSource};
use crate::location;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

/// Fetch and decode the favicon for a location, optionally saving it as PNG
pub async fn run(config: &Config, location: &str, output: Option<PathBuf>) -> Result<()> {
    let url = location::resolve_str(location);
    let root = site_root(&url).ok_or_else(|| anyhow!("No site root in '{}'", url))?;
    let icon_url = format!("{}/favicon.ico", root);

    let source = HttpIconSource::new(config.favicon.timeout())
        .context("Failed to create favicon HTTP client")?;
    let bytes = source
        .fetch(&icon_url)
        .await
        .with_context(|| format!("Failed to fetch {}", icon_url))?;
    let icon = decode_icon(&bytes, config.favicon.icon_size)
        .with_context(|| format!("Failed to decode {}", icon_url))?;

    println!("{}: {}x{} icon ({} bytes fetched)", icon_url, icon.width, icon.height, bytes.len());

    if let Some(path) = output {
        icon.save_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
