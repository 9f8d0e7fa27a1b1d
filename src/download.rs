//! Saving locations the engine cannot display to disk.

use std::path::Path;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("unable to save file: {0}")]
    Io(#[from] std::io::Error),
}

/// Stream `location` into a file at `path`, returning the bytes written
pub async fn save(client: &reqwest::Client, location: &str, path: &Path) -> Result<u64, DownloadError> {
    let mut response = client.get(location).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status(status.as_u16()));
    }

    let mut file = File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    info!("Saved {} ({} bytes) to {}", location, written, path.display());
    Ok(written)
}
