use super::window::{BrowserWindow, WindowNotice};
use crate::engine::WebEngine;
use crate::favicon::FaviconCache;
use tracing::{debug, info};
use unicode_width::UnicodeWidthChar;

/// Label shown for tabs whose page has not reported a title
pub const NEW_TAB_TITLE: &str = "New Tab";

pub struct BrowserTab<E> {
    window: BrowserWindow<E>,
}

impl<E: WebEngine> BrowserTab<E> {
    pub fn title(&self) -> &str {
        self.window.title().unwrap_or(NEW_TAB_TITLE)
    }

    pub fn window(&self) -> &BrowserWindow<E> {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut BrowserWindow<E> {
        &mut self.window
    }
}

/// The set of open tabs. There is always at least one, and the last one
/// cannot be closed.
pub struct TabManager<E> {
    tabs: Vec<BrowserTab<E>>,
    selected: usize,
    history_limit: usize,
    new_engine: Box<dyn FnMut() -> E>,
}

impl<E: WebEngine> TabManager<E> {
    /// Create a manager with one blank tab; `new_engine` builds the engine
    /// for every tab opened later
    pub fn new(mut new_engine: impl FnMut() -> E + 'static, history_limit: usize) -> Self {
        let first = BrowserTab {
            window: BrowserWindow::new(new_engine(), history_limit),
        };
        Self {
            tabs: vec![first],
            selected: 0,
            history_limit,
            new_engine: Box::new(new_engine),
        }
    }

    /// Open a blank tab and select it
    pub fn new_tab(&mut self) -> usize {
        let window = BrowserWindow::new((self.new_engine)(), self.history_limit);
        self.add_tab(window)
    }

    /// Add an existing window as a tab and select it
    pub fn add_tab(&mut self, window: BrowserWindow<E>) -> usize {
        self.tabs.push(BrowserTab { window });
        self.selected = self.tabs.len() - 1;
        debug!("Opened tab {}", self.selected);
        self.selected
    }

    /// Pages asking for a new window get a new selected tab instead
    pub fn open_popup(&mut self, location: &str) -> usize {
        let index = self.new_tab();
        self.tabs[index].window.nav_to(location);
        index
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn is_closable(&self, index: usize) -> bool {
        index < self.tabs.len() && self.tabs.len() > 1
    }

    pub fn close_tab(&mut self, index: usize) -> bool {
        if !self.is_closable(index) {
            return false;
        }
        self.tabs.remove(index);
        if self.selected > index || self.selected >= self.tabs.len() {
            self.selected -= 1;
        }
        info!("Closed tab {}, {} remaining", index, self.tabs.len());
        true
    }

    pub fn selected(&self) -> &BrowserTab<E> {
        &self.tabs[self.selected]
    }

    pub fn selected_mut(&mut self) -> &mut BrowserTab<E> {
        &mut self.tabs[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn tabs(&self) -> &[BrowserTab<E>] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab_title(&self, index: usize) -> Option<&str> {
        self.tabs.get(index).map(BrowserTab::title)
    }

    /// Process pending engine events for every tab
    pub fn process_events(&mut self, favicons: &FaviconCache) -> Vec<(usize, WindowNotice)> {
        self.tabs
            .iter_mut()
            .enumerate()
            .flat_map(|(index, tab)| {
                tab.window
                    .process_events(favicons)
                    .into_iter()
                    .map(move |notice| (index, notice))
            })
            .collect()
    }
}

/// Cut a label to at most `max_width` terminal columns, marking the cut with
/// an ellipsis
pub fn truncate_label(label: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            // Make room for the ellipsis
            while width + 1 > max_width {
                match out.pop() {
                    Some(last) => width -= last.width().unwrap_or(0),
                    None => return out,
                }
            }
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}
