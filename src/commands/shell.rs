//! Line driven browser session over a headless engine.
//!
//! Anything typed goes through the location bar rules; lines starting with
//! `:` are chrome commands (back, forward, tabs, bookmarks and so on).

use crate::bookmarks::Bookmarks;
use crate::browser::{truncate_label, TabManager, WindowNotice};
use crate::config::Config;
use crate::engine::{HeadlessEngine, NavigationOutcome};
use crate::favicon::FaviconCache;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const PROMPT: &str = "willow> ";

/// Columns given to a tab title in the tab list
const TAB_LABEL_WIDTH: usize = 30;

const HELP: &str = "\
<text>          go to a location, search keyword or search terms
:back :forward  move through history
:history        show history around the current page
:go N           jump to history entry N
:reload         reload the current page
:home           go to the home location
:tab [text]     open a new tab, optionally navigating it
:tabs           list tabs
:select N       switch to tab N
:close [N]      close tab N (default: current)
:bookmark [loc] bookmark a location (default: current)
:bookmarks      list bookmarks
:open N         go to bookmark N
:status         show title, status and favicon of the current tab
:quit           leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Navigate(String),
    Back,
    Forward,
    History,
    Go(usize),
    Reload,
    Home,
    NewTab(Option<String>),
    Tabs,
    Select(usize),
    Close(Option<usize>),
    Bookmark(Option<String>),
    Bookmarks,
    Open(usize),
    Status,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return ShellCommand::Navigate(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    let index = || arg.and_then(|a| a.parse::<usize>().ok());
    let invalid = || ShellCommand::Invalid(line.to_string());

    match name {
        "back" | "b" => ShellCommand::Back,
        "forward" | "f" => ShellCommand::Forward,
        "history" | "h" => ShellCommand::History,
        "go" => index().map(ShellCommand::Go).unwrap_or_else(invalid),
        "reload" | "r" => ShellCommand::Reload,
        "home" => ShellCommand::Home,
        "tab" => ShellCommand::NewTab(arg.map(str::to_string)),
        "tabs" => ShellCommand::Tabs,
        "select" => index().map(ShellCommand::Select).unwrap_or_else(invalid),
        "close" => match arg {
            None => ShellCommand::Close(None),
            Some(_) => index().map(|i| ShellCommand::Close(Some(i))).unwrap_or_else(invalid),
        },
        "bookmark" => ShellCommand::Bookmark(arg.map(str::to_string)),
        "bookmarks" => ShellCommand::Bookmarks,
        "open" => index().map(ShellCommand::Open).unwrap_or_else(invalid),
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "q" | "exit" => ShellCommand::Quit,
        _ => invalid(),
    }
}

/// Output of one command
#[derive(Debug, Default)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

pub struct Session {
    tabs: TabManager<HeadlessEngine>,
    bookmarks: Bookmarks,
    favicons: FaviconCache,
    home: String,
}

impl Session {
    pub fn new(config: &Config, favicons: FaviconCache) -> Self {
        Self {
            tabs: TabManager::new(HeadlessEngine::new, config.history_limit),
            bookmarks: Bookmarks::from_locations(config.bookmarks.iter().cloned()),
            favicons,
            home: config.home_location.clone(),
        }
    }

    pub fn tabs(&self) -> &TabManager<HeadlessEngine> {
        &self.tabs
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.bookmarks
    }

    pub fn execute(&mut self, command: ShellCommand) -> Reply {
        debug!("Shell command {:?}", command);
        let mut reply = Reply::default();

        match command {
            ShellCommand::Empty => {}
            ShellCommand::Navigate(text) => {
                let outcome = self.window().nav_to(&text);
                describe_outcome(&mut reply, outcome);
            }
            ShellCommand::Back => match self.window().go_back() {
                Some(outcome) => describe_outcome(&mut reply, outcome),
                None => reply.line("Nothing to go back to"),
            },
            ShellCommand::Forward => match self.window().go_forward() {
                Some(outcome) => describe_outcome(&mut reply, outcome),
                None => reply.line("Nothing to go forward to"),
            },
            ShellCommand::History => {
                let menu = self.tabs.selected().window().history().menu_window();
                if menu.is_empty() {
                    reply.line("No history");
                }
                for entry in menu {
                    let marker = if entry.current { '*' } else { ' ' };
                    reply.line(format!("{} {:>3} {}", marker, entry.index, entry.location));
                }
            }
            ShellCommand::Go(index) => match self.window().go_to_history(index) {
                Some(outcome) => describe_outcome(&mut reply, outcome),
                None => reply.line(format!("No history entry {}", index)),
            },
            ShellCommand::Reload => {
                let current = self.tabs.selected().window().history().current().map(str::to_string);
                match current {
                    Some(location) => {
                        let outcome = self.window().nav_to(&location);
                        describe_outcome(&mut reply, outcome);
                    }
                    None => reply.line("Nothing to reload"),
                }
            }
            ShellCommand::Home => {
                let home = self.home.clone();
                let outcome = self.window().nav_to(&home);
                describe_outcome(&mut reply, outcome);
            }
            ShellCommand::NewTab(location) => {
                let index = match location {
                    Some(location) => self.tabs.open_popup(&location),
                    None => self.tabs.new_tab(),
                };
                reply.line(format!("Opened tab {}", index));
            }
            ShellCommand::Tabs => {
                for (index, tab) in self.tabs.tabs().iter().enumerate() {
                    let marker = if index == self.tabs.selected_index() { '*' } else { ' ' };
                    let icon = if tab.window().favicon().is_placeholder() { ' ' } else { '@' };
                    reply.line(format!(
                        "{} {:>2} {}{:<width$} {}",
                        marker,
                        index,
                        icon,
                        truncate_label(tab.title(), TAB_LABEL_WIDTH),
                        tab.window().location_field(),
                        width = TAB_LABEL_WIDTH,
                    ));
                }
            }
            ShellCommand::Select(index) => {
                if self.tabs.select(index) {
                    reply.line(format!("Switched to tab {}", index));
                } else {
                    reply.line(format!("No tab {}", index));
                }
            }
            ShellCommand::Close(index) => {
                let index = index.unwrap_or(self.tabs.selected_index());
                if self.tabs.close_tab(index) {
                    reply.line(format!("Closed tab {}", index));
                } else {
                    reply.line(format!("Tab {} cannot be closed", index));
                }
            }
            ShellCommand::Bookmark(location) => {
                let location = location.or_else(|| {
                    self.tabs.selected().window().history().current().map(str::to_string)
                });
                match location {
                    Some(location) if self.bookmarks.add(location.clone()) => {
                        reply.line(format!("Bookmarked {}", location));
                    }
                    Some(location) => reply.line(format!("{} is already bookmarked", location)),
                    None => reply.line("Nothing to bookmark"),
                }
            }
            ShellCommand::Bookmarks => {
                for (index, location) in self.bookmarks.iter().enumerate() {
                    reply.line(format!("{:>3} {}", index, location));
                }
            }
            ShellCommand::Open(index) => match self.bookmarks.get(index).map(str::to_string) {
                Some(location) => {
                    let outcome = self.window().nav_to(&location);
                    describe_outcome(&mut reply, outcome);
                }
                None => reply.line(format!("No bookmark {}", index)),
            },
            ShellCommand::Status => {
                let tab = self.tabs.selected();
                let window = tab.window();
                reply.line(format!("Title:    {}", tab.title()));
                reply.line(format!("Location: {}", window.location_field()));
                if !window.status().is_empty() {
                    reply.line(format!("Status:   {}", window.status()));
                }
                let favicon = match window.favicon().get() {
                    Some(icon) => format!("{}x{}", icon.width, icon.height),
                    None => "none".to_string(),
                };
                reply.line(format!("Favicon:  {}", favicon));
            }
            ShellCommand::Help => {
                for line in HELP.lines() {
                    reply.line(line);
                }
            }
            ShellCommand::Quit => reply.quit = true,
            ShellCommand::Invalid(line) => reply.line(format!("Unknown command '{}', try :help", line)),
        }

        self.pump(&mut reply);
        reply
    }

    fn window(&mut self) -> &mut crate::browser::BrowserWindow<HeadlessEngine> {
        self.tabs.selected_mut().window_mut()
    }

    // Feed engine notifications back into the tabs.
    fn pump(&mut self, reply: &mut Reply) {
        for (index, notice) in self.tabs.process_events(&self.favicons) {
            match notice {
                WindowNotice::Navigated(location) if location.is_empty() => {
                    reply.line(format!("[{}] (blank)", index));
                }
                WindowNotice::Navigated(location) => reply.line(format!("[{}] {}", index, location)),
                WindowNotice::TitleChanged(_) => {}
                WindowNotice::Pdf(location) => {
                    reply.line(format!("[{}] {} is a PDF document", index, location));
                }
                WindowNotice::Downloadable { location, extension } => reply.line(format!(
                    "[{}] {} is a downloadable {} file, save it with `willow download {}`",
                    index, location, extension, location
                )),
                WindowNotice::LoadFailed { location, reason } => {
                    reply.line(format!("[{}] failed to load {}: {}", index, location, reason));
                }
            }
        }
    }
}

fn describe_outcome(reply: &mut Reply, outcome: NavigationOutcome) {
    match outcome {
        NavigationOutcome::Load(_) => {}
        NavigationOutcome::Reload(url) => reply.line(format!("Reloaded {}", url)),
        NavigationOutcome::Cleared => reply.line("Cleared view"),
    }
}

/// Run the interactive shell until `:quit` or end of input
pub async fn run(config: &Config) -> Result<()> {
    let favicons = super::create_favicon_cache(config)?;
    let mut session = Session::new(config, favicons);
    let mut stdout = std::io::stdout();

    for line in session.execute(ShellCommand::Home).lines {
        println!("{}", line);
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", PROMPT);
        stdout.flush()?;

        let Some(line) = input.next_line().await? else {
            println!();
            break;
        };
        let reply = session.execute(parse_command(&line));
        for line in &reply.lines {
            println!("{}", line);
        }
        if reply.quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::mock_source::{MockIconSource, MockResponse};
    use std::sync::Arc;

    fn session() -> Session {
        let config = Config {
            home_location: "http://home.example/".to_string(),
            bookmarks: vec!["http://a.com/".to_string()],
            ..Config::default()
        };
        let source = Arc::new(MockIconSource::new(MockResponse::Fail));
        Session::new(&config, super::super::favicon_cache_with(source, &config))
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  "), ShellCommand::Empty);
        assert_eq!(parse_command("google cats"), ShellCommand::Navigate("google cats".to_string()));
        assert_eq!(parse_command(":back"), ShellCommand::Back);
        assert_eq!(parse_command(":go 3"), ShellCommand::Go(3));
        assert_eq!(parse_command(":go x"), ShellCommand::Invalid(":go x".to_string()));
        assert_eq!(parse_command(":tab"), ShellCommand::NewTab(None));
        assert_eq!(parse_command(":tab  bing rust "), ShellCommand::NewTab(Some("bing rust".to_string())));
        assert_eq!(parse_command(":close"), ShellCommand::Close(None));
        assert_eq!(parse_command(":close 1"), ShellCommand::Close(Some(1)));
        assert_eq!(parse_command(":q"), ShellCommand::Quit);
        assert_eq!(parse_command(":dance"), ShellCommand::Invalid(":dance".to_string()));
    }

    #[tokio::test]
    async fn test_navigate_and_go_back() {
        let mut session = session();
        assert_eq!(session.execute(ShellCommand::Home).lines, vec!["[0] http://home.example/"]);
        session.execute(parse_command("b.com"));

        let reply = session.execute(ShellCommand::Back);
        assert_eq!(reply.lines, vec!["[0] http://home.example/"]);
        let history = session.tabs().selected().window().history();
        assert_eq!(history.pointer(), 0);
        assert_eq!(history.len(), 2);

        let reply = session.execute(ShellCommand::Back);
        assert_eq!(reply.lines, vec!["Nothing to go back to"]);
    }

    #[tokio::test]
    async fn test_history_listing_marks_current() {
        let mut session = session();
        session.execute(parse_command("a.com"));
        session.execute(parse_command("b.com"));

        let reply = session.execute(ShellCommand::History);
        assert_eq!(reply.lines, vec!["*   1 http://b.com", "    0 http://a.com"]);
    }

    #[tokio::test]
    async fn test_same_location_reloads() {
        let mut session = session();
        session.execute(parse_command("a.com"));
        let reply = session.execute(parse_command("http://a.com"));
        assert_eq!(reply.lines, vec!["Reloaded http://a.com"]);
        assert_eq!(session.tabs().selected().window().history().len(), 1);
    }

    #[tokio::test]
    async fn test_tabs_and_close() {
        let mut session = session();
        let reply = session.execute(parse_command(":tab example.com"));
        assert_eq!(reply.lines, vec!["Opened tab 1", "[1] http://example.com"]);
        assert_eq!(session.execute(ShellCommand::Tabs).lines.len(), 2);

        assert_eq!(session.execute(ShellCommand::Close(None)).lines, vec!["Closed tab 1"]);
        assert_eq!(
            session.execute(ShellCommand::Close(None)).lines,
            vec!["Tab 0 cannot be closed"]
        );
    }

    #[tokio::test]
    async fn test_bookmarks() {
        let mut session = session();
        session.execute(parse_command("b.com"));

        assert_eq!(session.execute(ShellCommand::Bookmark(None)).lines, vec!["Bookmarked http://b.com"]);
        assert_eq!(
            session.execute(ShellCommand::Bookmark(Some("http://a.com/".to_string()))).lines,
            vec!["http://a.com/ is already bookmarked"]
        );
        assert_eq!(session.bookmarks().len(), 2);

        let reply = session.execute(ShellCommand::Open(0));
        assert_eq!(reply.lines, vec!["[0] http://a.com/"]);
        assert_eq!(session.execute(ShellCommand::Open(9)).lines, vec!["No bookmark 9"]);
    }

    #[tokio::test]
    async fn test_downloadable_location_is_announced() {
        let mut session = session();
        let reply = session.execute(parse_command("a.com/pkg.zip"));
        assert_eq!(reply.lines.len(), 2);
        assert!(reply.lines[0].contains("downloadable .zip file"));
    }

    #[tokio::test]
    async fn test_quit() {
        let mut session = session();
        assert!(session.execute(ShellCommand::Quit).quit);
    }
}
