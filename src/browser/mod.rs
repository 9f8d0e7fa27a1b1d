mod tabs;
mod window;

pub use tabs::{truncate_label, BrowserTab, TabManager, NEW_TAB_TITLE};
pub use window::{BrowserWindow, WindowNotice};
