pub mod bookmarks;
pub mod browser;
pub mod commands;
pub mod config;
pub mod download;
pub mod engine;
pub mod favicon;
pub mod history;
pub mod location;

#[cfg(any(test, feature = "development"))]
pub mod dev;
#[cfg(any(test, feature = "development"))]
pub mod fixtures;
