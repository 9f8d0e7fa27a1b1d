//! Turns whatever the user typed into the location bar into a URL the engine
//! can load, and classifies locations the engine cannot display itself.

use phf::phf_set;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Extensions offered for saving rather than displaying
static DOWNLOADABLE_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    ".doc",
    ".xls",
    ".zip",
    ".tgz",
    ".jar",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProvider {
    Google,
    Bing,
    Yahoo,
    Wikipedia,
}

impl SearchProvider {
    /// Base URL the encoded query terms are appended to
    pub fn query_prefix(&self) -> &'static str {
        match self {
            SearchProvider::Google => "http://www.google.com/search?q=",
            SearchProvider::Bing => "http://www.bing.com/search?q=",
            SearchProvider::Yahoo => "http://search.yahoo.com/search?p=",
            SearchProvider::Wikipedia => "http://en.wikipedia.org/w/index.php?search=",
        }
    }

    /// Build a query URL: terms are trimmed and spaces become `+`
    pub fn query_url(&self, terms: &str) -> String {
        format!("{}{}", self.query_prefix(), terms.trim().replace(' ', "+"))
    }
}

/// Location bar keywords, matched as case-sensitive prefixes in this order
const KEYWORDS: [(&str, SearchProvider); 6] = [
    ("google", SearchProvider::Google),
    ("bing", SearchProvider::Bing),
    ("yahoo", SearchProvider::Yahoo),
    ("wiki", SearchProvider::Wikipedia),
    ("find", SearchProvider::Google),
    ("search", SearchProvider::Google),
];

/// Resolve raw location bar input to a navigable URL. Never fails.
pub fn resolve(raw: Option<&str>) -> String {
    resolve_str(raw.unwrap_or(""))
}

pub fn resolve_str(raw: &str) -> String {
    for (keyword, provider) in KEYWORDS {
        if let Some(terms) = raw.strip_prefix(keyword) {
            return provider.query_url(terms);
        }
    }

    let trimmed = raw.trim();
    if trimmed.contains(' ') {
        return SearchProvider::Google.query_url(trimmed);
    }

    if !trimmed.is_empty() && !has_http_scheme(trimmed) {
        return format!("{}{}", HTTP_PREFIX, trimmed);
    }

    trimmed.to_string()
}

fn has_http_scheme(location: &str) -> bool {
    location.starts_with(HTTP_PREFIX) || location.starts_with(HTTPS_PREFIX)
}

/// How a location should be handled once the engine reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationKind {
    Page,
    Pdf,
    Downloadable(&'static str),
}

pub fn classify(location: &str) -> LocationKind {
    if location.ends_with(".pdf") {
        return LocationKind::Pdf;
    }
    match location.rfind('.').map(|dot| &location[dot..]) {
        Some(ext) => match DOWNLOADABLE_EXTENSIONS.get_key(ext) {
            Some(ext) => LocationKind::Downloadable(*ext),
            None => LocationKind::Page,
        },
        None => LocationKind::Page,
    }
}

/// Last path segment of a location, used as the default save name
pub fn file_name(location: &str) -> Option<&str> {
    let path = match location.find("://") {
        Some(sep) => &location[sep + 3..],
        None => location,
    };
    let (_, path) = path.split_once('/')?;
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.rsplit('/').next().filter(|name| !name.is_empty())
}
