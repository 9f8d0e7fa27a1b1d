//! Back/forward navigation list for a single browser view.
//!
//! Navigation is two-phase: a back, forward or jump request only stages a
//! pointer and hands back the location to load. The engine later reports the
//! location change, and [`HistoryList::record_navigation`] either consumes the
//! staged pointer (history replay) or appends a fresh entry.

use tracing::debug;

/// Default number of locations kept per browser view
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Entries shown before the current location in the history menu
const MENU_ENTRIES_BEHIND: usize = 8;

/// Entries shown from the current location onwards in the history menu
const MENU_ENTRIES_AHEAD: usize = 6;

/// A single row of the history menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMenuEntry {
    pub index: usize,
    pub location: String,
    pub current: bool,
}

#[derive(Debug, Clone)]
pub struct HistoryList {
    items: Vec<String>,
    pointer: usize,
    pending: Option<usize>,
    limit: usize,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a history list bounded at `limit`; the oldest entry is dropped
    /// as soon as the list reaches it, so at most `limit - 1` entries are kept.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            pointer: 0,
            pending: None,
            limit: limit.max(2),
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.pointer + 1 < self.items.len()
    }

    /// Stage a move one entry back and return the location to load.
    ///
    /// Returns the current location when there is nothing to go back to.
    pub fn request_back(&mut self) -> Option<&str> {
        if self.can_go_back() {
            self.pending = Some(self.pointer - 1);
        }
        self.requested()
    }

    /// Stage a move one entry forward and return the location to load.
    ///
    /// Returns the current location when there is nothing to go forward to.
    pub fn request_forward(&mut self) -> Option<&str> {
        if self.can_go_forward() {
            self.pending = Some(self.pointer + 1);
        }
        self.requested()
    }

    /// Stage a jump to `index`; out of range indices are ignored.
    pub fn request_jump(&mut self, index: usize) -> Option<&str> {
        if index < self.items.len() {
            self.pending = Some(index);
        } else {
            debug!("Ignoring history jump to {} ({} entries)", index, self.items.len());
        }
        self.requested()
    }

    /// Update the list after the engine reported a completed navigation.
    pub fn record_navigation(&mut self, location: impl Into<String>) {
        match self.pending.take() {
            Some(index) => {
                debug!("History replay to entry {}", index);
                self.pointer = index;
            }
            None => {
                if !self.items.is_empty() {
                    self.items.truncate(self.pointer + 1);
                }
                self.items.push(location.into());
                if self.items.len() >= self.limit {
                    self.items.remove(0);
                }
                self.pointer = self.items.len() - 1;
            }
        }
    }

    /// Drop a staged request whose navigation will never be reported
    pub fn cancel_pending(&mut self) {
        if let Some(index) = self.pending.take() {
            debug!("Dropping staged history entry {}", index);
        }
    }

    /// Entries around the current location, most recent first
    pub fn menu_window(&self) -> Vec<HistoryMenuEntry> {
        let start = self.pointer.saturating_sub(MENU_ENTRIES_BEHIND);
        let end = self.items.len().min(self.pointer + MENU_ENTRIES_AHEAD);

        (start..end)
            .rev()
            .map(|index| HistoryMenuEntry {
                index,
                location: self.items[index].clone(),
                current: index == self.pointer,
            })
            .collect()
    }

    pub fn current(&self) -> Option<&str> {
        self.items.get(self.pointer).map(String::as_str)
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    // The staged location if a request is pending, else the current one.
    fn requested(&self) -> Option<&str> {
        let index = self.pending.unwrap_or(self.pointer);
        self.items.get(index).map(String::as_str)
    }
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new()
    }
}
