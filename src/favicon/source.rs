//! Where favicon bytes come from, abstracting over the network and test doubles
use super::FaviconError;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait IconSource: Send + Sync {
    /// Fetch the raw bytes stored at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FaviconError>;
}

/// Fetches icons over HTTP(S) with reqwest
pub struct HttpIconSource {
    client: reqwest::Client,
}

impl HttpIconSource {
    /// Build a client; without a timeout the reqwest default applies
    pub fn new(timeout: Option<Duration>) -> Result<Self, FaviconError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl IconSource for HttpIconSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FaviconError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FaviconError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(FaviconError::Empty);
        }
        Ok(bytes.to_vec())
    }
}
