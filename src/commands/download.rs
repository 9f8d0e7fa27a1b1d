use crate::download;
use crate::location;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Name used when the location has no file name of its own
const FALLBACK_FILE_NAME: &str = "download";

pub fn default_output(url: &str) -> PathBuf {
    PathBuf::from(location::file_name(url).unwrap_or(FALLBACK_FILE_NAME))
}

pub async fn run(location: &str, output: Option<PathBuf>) -> Result<()> {
    let url = location::resolve_str(location);
    let path = output.unwrap_or_else(|| default_output(&url));

    let client = reqwest::Client::new();
    let written = download::save(&client, &url, &path)
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    println!("Saved {} bytes to {}", written, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        assert_eq!(default_output("http://a.com/files/report.doc"), PathBuf::from("report.doc"));
        assert_eq!(default_output("http://a.com/"), PathBuf::from("download"));
    }
}
