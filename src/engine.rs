//! The web engine a browser window drives, and the navigation trigger.
//!
//! Engines report what happened asynchronously through [`EngineEvent`]s; a
//! location change does not say whether it came from a fresh load or from a
//! history replay.

use crate::location;
use std::collections::VecDeque;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    LocationChanged(String),
    TitleChanged(String),
    StatusChanged(String),
    LoadFailed { location: String, reason: String },
}

pub trait WebEngine {
    /// Location currently displayed, empty when nothing is loaded
    fn location(&self) -> &str;

    fn load(&mut self, url: &str);

    fn reload(&mut self);

    /// Clear the view
    fn load_empty(&mut self);

    /// Next pending notification, if any
    fn poll_event(&mut self) -> Option<EngineEvent>;
}

/// What [`navigate`] asked the engine to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Load(String),
    Reload(String),
    Cleared,
}

/// Resolve typed input and point the engine at it. The current location is
/// reloaded rather than loaded again.
pub fn navigate<E: WebEngine + ?Sized>(engine: &mut E, raw: &str) -> NavigationOutcome {
    let url = location::resolve_str(raw);

    if url == engine.location() {
        info!("Reloading {}", url);
        engine.reload();
        NavigationOutcome::Reload(url)
    } else if url.is_empty() {
        info!("Clearing view");
        engine.load_empty();
        NavigationOutcome::Cleared
    } else {
        info!("Loading {}", url);
        engine.load(&url);
        NavigationOutcome::Load(url)
    }
}

/// Engine without rendering: loads succeed instantly and are reported as
/// location changes on the next poll.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    location: String,
    events: VecDeque<EngineEvent>,
    reloads: usize,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification as if the page produced it
    pub fn push_event(&mut self, event: EngineEvent) {
        self.events.push_back(event);
    }

    pub fn reloads(&self) -> usize {
        self.reloads
    }
}

impl WebEngine for HeadlessEngine {
    fn location(&self) -> &str {
        &self.location
    }

    fn load(&mut self, url: &str) {
        self.location = url.to_string();
        self.events.push_back(EngineEvent::LocationChanged(url.to_string()));
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }

    fn load_empty(&mut self) {
        self.location.clear();
        self.events.push_back(EngineEvent::LocationChanged(String::new()));
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_loads_resolved_url() {
        let mut engine = HeadlessEngine::new();
        let outcome = navigate(&mut engine, "example.com");

        assert_eq!(outcome, NavigationOutcome::Load("http://example.com".to_string()));
        assert_eq!(engine.location(), "http://example.com");
        assert_eq!(
            engine.poll_event(),
            Some(EngineEvent::LocationChanged("http://example.com".to_string()))
        );
        assert_eq!(engine.poll_event(), None);
    }

    #[test]
    fn test_navigate_same_location_reloads() {
        let mut engine = HeadlessEngine::new();
        navigate(&mut engine, "http://example.com");
        engine.poll_event();

        let outcome = navigate(&mut engine, "example.com");
        assert_eq!(outcome, NavigationOutcome::Reload("http://example.com".to_string()));
        assert_eq!(engine.reloads(), 1);
        assert_eq!(engine.poll_event(), None);
    }

    #[test]
    fn test_navigate_empty_clears_view() {
        let mut engine = HeadlessEngine::new();
        navigate(&mut engine, "http://example.com");
        engine.poll_event();

        assert_eq!(navigate(&mut engine, "  "), NavigationOutcome::Cleared);
        assert_eq!(engine.location(), "");
        assert_eq!(engine.poll_event(), Some(EngineEvent::LocationChanged(String::new())));
    }

    #[test]
    fn test_empty_input_on_blank_engine_reloads() {
        // Nothing loaded yet, so "" equals the current location
        let mut engine = HeadlessEngine::new();
        assert_eq!(navigate(&mut engine, ""), NavigationOutcome::Reload(String::new()));
    }
}
