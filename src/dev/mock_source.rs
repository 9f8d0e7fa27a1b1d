/// Mock favicon source for development and testing
use crate::favicon::{FaviconError, IconSource};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// What every request to a [`MockIconSource`] answers with
#[derive(Debug, Clone)]
pub enum MockResponse {
    Bytes(Vec<u8>),
    Status(u16),
    Fail,
}

/// Icon source that serves a fixed response and records requested URLs
pub struct MockIconSource {
    response: MockResponse,
    requested: Mutex<Vec<String>>,
}

impl MockIconSource {
    pub fn new(response: MockResponse) -> Self {
        info!("Creating MockIconSource for development mode");
        Self {
            response,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Number of fetches issued so far
    pub fn calls(&self) -> usize {
        self.requested().len()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl IconSource for MockIconSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FaviconError> {
        info!("MockIconSource: fetch {}", url);
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        match &self.response {
            MockResponse::Bytes(bytes) if bytes.is_empty() => Err(FaviconError::Empty),
            MockResponse::Bytes(bytes) => Ok(bytes.clone()),
            MockResponse::Status(status) => Err(FaviconError::Status(*status)),
            MockResponse::Fail => Err(FaviconError::Status(503)),
        }
    }
}
