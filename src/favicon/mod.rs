//! Site favicons, fetched lazily in the background and cached per site root.

mod cache;
mod handle;
mod source;

pub use cache::{site_root, FaviconCache, DEFAULT_CACHE_CAPACITY, DEFAULT_FETCH_WORKERS};
pub use handle::{decode_icon, Icon, IconHandle, DEFAULT_ICON_SIZE};
pub use source::{HttpIconSource, IconSource};

use thiserror::Error;

/// Why a favicon could not be produced. These never reach the user; the
/// placeholder simply stays empty.
#[derive(Error, Debug)]
pub enum FaviconError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("empty response")]
    Empty,

    #[error("could not decode icon: {0}")]
    Decode(#[from] image::ImageError),
}
