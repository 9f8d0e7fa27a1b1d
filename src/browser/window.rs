use crate::engine::{navigate, EngineEvent, NavigationOutcome, WebEngine};
use crate::favicon::{FaviconCache, IconHandle};
use crate::history::HistoryList;
use crate::location::{self, LocationKind};
use tracing::{debug, info, warn};

/// Something the owner of a window may want to react to after events were
/// processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowNotice {
    Navigated(String),
    TitleChanged(String),
    Pdf(String),
    Downloadable { location: String, extension: &'static str },
    LoadFailed { location: String, reason: String },
}

/// One browser view: an engine plus the state the chrome keeps around it
pub struct BrowserWindow<E> {
    engine: E,
    history: HistoryList,
    favicon: IconHandle,
    title: Option<String>,
    status: String,
    location_field: String,
}

impl<E: WebEngine> BrowserWindow<E> {
    pub fn new(engine: E, history_limit: usize) -> Self {
        Self {
            engine,
            history: HistoryList::with_limit(history_limit),
            favicon: IconHandle::placeholder(),
            title: None,
            status: String::new(),
            location_field: String::new(),
        }
    }

    /// Navigate to typed input (search keywords, bare hosts, full URLs)
    pub fn nav_to(&mut self, raw: &str) -> NavigationOutcome {
        navigate(&mut self.engine, raw)
    }

    /// Navigate to whatever is in the location field
    pub fn submit_location(&mut self) -> NavigationOutcome {
        let raw = self.location_field.clone();
        self.nav_to(&raw)
    }

    pub fn go_back(&mut self) -> Option<NavigationOutcome> {
        if !self.history.can_go_back() {
            return None;
        }
        let target = self.history.request_back()?.to_string();
        Some(self.replay(&target))
    }

    pub fn go_forward(&mut self) -> Option<NavigationOutcome> {
        if !self.history.can_go_forward() {
            return None;
        }
        let target = self.history.request_forward()?.to_string();
        Some(self.replay(&target))
    }

    /// Jump to a history menu entry; unknown indices do nothing
    pub fn go_to_history(&mut self, index: usize) -> Option<NavigationOutcome> {
        if index >= self.history.len() {
            debug!("History entry {} does not exist", index);
            return None;
        }
        let target = self.history.request_jump(index)?.to_string();
        Some(self.replay(&target))
    }

    // A reload reports no location change, so the staged entry would
    // otherwise swallow the next fresh navigation.
    fn replay(&mut self, target: &str) -> NavigationOutcome {
        let outcome = self.nav_to(target);
        if let NavigationOutcome::Reload(_) = outcome {
            self.history.cancel_pending();
        }
        outcome
    }

    /// Drain engine notifications and bring history, location field, favicon,
    /// title and status up to date.
    pub fn process_events(&mut self, favicons: &FaviconCache) -> Vec<WindowNotice> {
        let mut notices = Vec::new();

        while let Some(event) = self.engine.poll_event() {
            match event {
                EngineEvent::LocationChanged(location) => {
                    self.history.record_navigation(location.clone());
                    self.location_field = location.clone();
                    self.favicon = favicons.fetch(&location);

                    match location::classify(&location) {
                        LocationKind::Page => {}
                        LocationKind::Pdf => notices.push(WindowNotice::Pdf(location.clone())),
                        LocationKind::Downloadable(extension) => {
                            notices.push(WindowNotice::Downloadable {
                                location: location.clone(),
                                extension,
                            })
                        }
                    }
                    notices.push(WindowNotice::Navigated(location));
                }
                EngineEvent::TitleChanged(title) => {
                    // Pages without a title keep the previous one
                    if !title.is_empty() {
                        self.title = Some(title.clone());
                        notices.push(WindowNotice::TitleChanged(title));
                    }
                }
                EngineEvent::StatusChanged(status) => {
                    self.status = status;
                }
                EngineEvent::LoadFailed { location, reason } => {
                    warn!("Browser encountered a load exception for {}: {}", location, reason);
                    notices.push(WindowNotice::LoadFailed { location, reason });
                }
            }
        }

        if !notices.is_empty() {
            info!("Processed {} window notices", notices.len());
        }
        notices
    }

    pub fn history(&self) -> &HistoryList {
        &self.history
    }

    pub fn favicon(&self) -> &IconHandle {
        &self.favicon
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Status text; empty means the status display is hidden
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn location_field(&self) -> &str {
        &self.location_field
    }

    pub fn set_location_field(&mut self, text: impl Into<String>) {
        self.location_field = text.into();
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
