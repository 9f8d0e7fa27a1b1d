use super::handle::{decode_icon, Icon, IconHandle, DEFAULT_ICON_SIZE};
use super::{FaviconError, IconSource};
use cached::{Cached, SizedCache};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Site roots remembered before the least recently used one is dropped
pub const DEFAULT_CACHE_CAPACITY: usize = 200;

/// Favicon downloads allowed to run at the same time
pub const DEFAULT_FETCH_WORKERS: usize = 4;

const SCHEME_SEPARATOR: &str = "://";

/// Scheme, host and port of a location, e.g.
/// `http://www.yahoo.com/games` => `http://www.yahoo.com`.
///
/// Returns `None` when the location has no scheme separator.
pub fn site_root(location: &str) -> Option<&str> {
    let sep = location.find(SCHEME_SEPARATOR).filter(|&sep| sep > 0)?;
    let host_start = sep + SCHEME_SEPARATOR.len();
    match location[host_start..].find('/') {
        Some(path) => Some(&location[..host_start + path]),
        None => Some(location),
    }
}

/// LRU cache of favicons keyed by site root.
///
/// A placeholder handle is stored as soon as a root is first seen, so each
/// root is fetched at most once while it stays cached. Fetches run on the
/// given runtime, at most `workers` at a time, and are never cancelled.
pub struct FaviconCache {
    entries: Mutex<SizedCache<String, IconHandle>>,
    source: Arc<dyn IconSource>,
    workers: Arc<Semaphore>,
    runtime: Handle,
    capacity: usize,
    icon_size: u32,
}

impl FaviconCache {
    pub fn new(source: Arc<dyn IconSource>, runtime: Handle) -> Self {
        Self::with_settings(
            source,
            runtime,
            DEFAULT_CACHE_CAPACITY,
            DEFAULT_FETCH_WORKERS,
            DEFAULT_ICON_SIZE,
        )
    }

    /// Capacity and workers are clamped to at least one
    pub fn with_settings(
        source: Arc<dyn IconSource>,
        runtime: Handle,
        capacity: usize,
        workers: usize,
        icon_size: u32,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(SizedCache::with_size(capacity)),
            source,
            workers: Arc::new(Semaphore::new(workers.max(1))),
            runtime,
            capacity,
            icon_size: icon_size.max(1),
        }
    }

    /// Icon handle for the site serving `location`.
    ///
    /// Returns immediately; a fetch is started in the background the first
    /// time a site root is seen.
    pub fn fetch(&self, location: &str) -> IconHandle {
        self.lookup_or_spawn(location).0
    }

    pub(crate) fn lookup_or_spawn(&self, location: &str) -> (IconHandle, Option<JoinHandle<()>>) {
        let Some(root) = site_root(location) else {
            debug!("No site root for {:?}, using an uncached placeholder", location);
            return (IconHandle::placeholder(), None);
        };
        let key = root.to_string();

        let handle = {
            let mut entries = self.lock_entries();
            if let Some(handle) = entries.cache_get(&key) {
                debug!("Favicon cache hit for {}", key);
                return (handle.clone(), None);
            }
            let handle = IconHandle::placeholder();
            entries.cache_set(key.clone(), handle.clone());
            handle
        };

        debug!("Favicon cache miss for {}, fetching", key);
        let task = self.runtime.spawn(fetch_into(
            Arc::clone(&self.source),
            Arc::clone(&self.workers),
            key,
            handle.clone(),
            self.icon_size,
        ));
        (handle, Some(task))
    }

    /// Whether `root` currently has a slot, without touching its recency
    pub fn contains(&self, root: &str) -> bool {
        self.lock_entries().key_order().any(|key| key == root)
    }

    pub fn len(&self) -> usize {
        self.lock_entries().cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.lock_entries().cache_clear();
    }

    fn lock_entries(&self) -> MutexGuard<'_, SizedCache<String, IconHandle>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Background half of a cache miss. Failures leave the placeholder empty.
async fn fetch_into(
    source: Arc<dyn IconSource>,
    workers: Arc<Semaphore>,
    root: String,
    handle: IconHandle,
    icon_size: u32,
) {
    let Ok(_permit) = workers.acquire_owned().await else {
        return;
    };

    let url = format!("{}/favicon.ico", root);
    match load_icon(source.as_ref(), &url, icon_size).await {
        Ok(icon) => {
            debug!("Fetched favicon {} ({}x{})", url, icon.width, icon.height);
            handle.fill(icon);
        }
        Err(e) => warn!("No favicon from {}: {}", url, e),
    }
}

async fn load_icon(source: &dyn IconSource, url: &str, icon_size: u32) -> Result<Icon, FaviconError> {
    let bytes = source.fetch(url).await?;
    decode_icon(&bytes, icon_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::mock_source::{MockIconSource, MockResponse};
    use crate::fixtures::sample_ico;

    fn cache_with(source: &Arc<MockIconSource>, capacity: usize) -> FaviconCache {
        FaviconCache::with_settings(
            Arc::clone(source) as Arc<dyn IconSource>,
            Handle::current(),
            capacity,
            DEFAULT_FETCH_WORKERS,
            DEFAULT_ICON_SIZE,
        )
    }

    #[test]
    fn test_site_root() {
        assert_eq!(site_root("http://www.yahoo.com/games"), Some("http://www.yahoo.com"));
        assert_eq!(site_root("https://a.com:8443/x/y?z"), Some("https://a.com:8443"));
        assert_eq!(site_root("http://a.com"), Some("http://a.com"));
        assert_eq!(site_root("example.com/page"), None);
        assert_eq!(site_root("://nothing"), None);
        assert_eq!(site_root(""), None);
    }

    #[tokio::test]
    async fn test_same_root_shares_handle_and_fetches_once() {
        let source = Arc::new(MockIconSource::new(MockResponse::Bytes(sample_ico(32))));
        let cache = cache_with(&source, DEFAULT_CACHE_CAPACITY);

        let (first, task) = cache.lookup_or_spawn("http://a.com/x");
        let (second, none) = cache.lookup_or_spawn("http://a.com/y");
        assert!(first.same_handle(&second));
        assert!(none.is_none());
        assert!(first.is_placeholder());

        let mut rx = second.subscribe();
        task.unwrap().await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(source.requested(), vec!["http://a.com/favicon.ico".to_string()]);
        assert!(rx.has_changed().unwrap());
        let icon = second.get().unwrap();
        assert_eq!((icon.width, icon.height), (16, 16));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_callers_share_one_fetch() {
        let source = Arc::new(MockIconSource::new(MockResponse::Bytes(sample_ico(32))));
        let cache = cache_with(&source, DEFAULT_CACHE_CAPACITY);

        let handles: Vec<IconHandle> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|i| {
                    let cache = &cache;
                    scope.spawn(move || cache.fetch(&format!("http://a.com/page{}", i)))
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert!(handles.iter().all(|h| h.same_handle(&handles[0])));

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while handles[0].is_placeholder() {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(cache.len(), 1);
        assert!(handles.iter().all(|h| h.get().is_some()));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_placeholder_cached() {
        let source = Arc::new(MockIconSource::new(MockResponse::Fail));
        let cache = cache_with(&source, DEFAULT_CACHE_CAPACITY);

        let (handle, task) = cache.lookup_or_spawn("http://down.example/index.html");
        task.unwrap().await.unwrap();

        assert!(handle.is_placeholder());
        assert!(cache.contains("http://down.example"));

        let (again, task) = cache.lookup_or_spawn("http://down.example/other");
        assert!(task.is_none());
        assert!(again.same_handle(&handle));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_icon_keeps_placeholder() {
        let source = Arc::new(MockIconSource::new(MockResponse::Bytes(b"not an icon".to_vec())));
        let cache = cache_with(&source, DEFAULT_CACHE_CAPACITY);

        let (handle, task) = cache.lookup_or_spawn("http://a.com");
        task.unwrap().await.unwrap();
        assert!(handle.is_placeholder());
    }

    #[tokio::test]
    async fn test_location_without_scheme_is_not_cached() {
        let source = Arc::new(MockIconSource::new(MockResponse::Fail));
        let cache = cache_with(&source, DEFAULT_CACHE_CAPACITY);

        let (first, task) = cache.lookup_or_spawn("about:blank");
        assert!(task.is_none());
        assert!(first.is_placeholder());
        assert!(cache.is_empty());

        let second = cache.fetch("about:blank");
        assert!(!first.same_handle(&second));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_evicts_least_recently_used() {
        let source = Arc::new(MockIconSource::new(MockResponse::Fail));
        let cache = cache_with(&source, 2);

        cache.fetch("http://a.com/");
        cache.fetch("http://b.com/");
        // Touch a so b becomes the oldest
        cache.fetch("http://a.com/again");
        cache.fetch("http://c.com/");

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("http://a.com"));
        assert!(!cache.contains("http://b.com"));
        assert!(cache.contains("http://c.com"));
    }

    #[tokio::test]
    async fn test_evicted_fetch_still_fills_its_handle() {
        let source = Arc::new(MockIconSource::new(MockResponse::Bytes(sample_ico(16))));
        let cache = cache_with(&source, 1);

        let (evicted, task) = cache.lookup_or_spawn("http://a.com/");
        cache.fetch("http://b.com/");
        assert!(!cache.contains("http://a.com"));

        task.unwrap().await.unwrap();
        assert!(!evicted.is_placeholder());
        assert!(!cache.contains("http://a.com"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_allows_refetch() {
        let source = Arc::new(MockIconSource::new(MockResponse::Fail));
        let cache = cache_with(&source, DEFAULT_CACHE_CAPACITY);

        let (_, task) = cache.lookup_or_spawn("http://a.com/");
        task.unwrap().await.unwrap();
        cache.clear();
        let (_, task) = cache.lookup_or_spawn("http://a.com/");
        task.unwrap().await.unwrap();
        assert_eq!(source.calls(), 2);
    }
}
