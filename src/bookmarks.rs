/// Remembered locations, in the order they were added
#[derive(Debug, Clone, Default)]
pub struct Bookmarks {
    locations: Vec<String>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a list, dropping duplicates
    pub fn from_locations<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut bookmarks = Self::new();
        for location in locations {
            bookmarks.add(location);
        }
        bookmarks
    }

    /// Returns false if the location was already bookmarked
    pub fn add(&mut self, location: impl Into<String>) -> bool {
        let location = location.into();
        if self.contains(&location) {
            return false;
        }
        self.locations.push(location);
        true
    }

    pub fn remove(&mut self, location: &str) -> bool {
        let before = self.locations.len();
        self.locations.retain(|l| l != location);
        self.locations.len() != before
    }

    pub fn contains(&self, location: &str) -> bool {
        self.locations.iter().any(|l| l == location)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.locations.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SAMPLE_LOCATIONS;

    #[test]
    fn test_add_deduplicates() {
        let mut bookmarks = Bookmarks::new();
        assert!(bookmarks.add("http://a.com"));
        assert!(!bookmarks.add("http://a.com"));
        assert!(bookmarks.add("http://b.com"));
        assert_eq!(bookmarks.iter().collect::<Vec<_>>(), vec!["http://a.com", "http://b.com"]);
    }

    #[test]
    fn test_seeded_keeps_order() {
        let mut seed = SAMPLE_LOCATIONS.to_vec();
        seed.push(SAMPLE_LOCATIONS[0]);
        let bookmarks = Bookmarks::from_locations(seed);
        assert_eq!(bookmarks.len(), SAMPLE_LOCATIONS.len());
        assert_eq!(bookmarks.get(0), Some(SAMPLE_LOCATIONS[0]));
    }

    #[test]
    fn test_remove() {
        let mut bookmarks = Bookmarks::from_locations(["http://a.com", "http://b.com"]);
        assert!(bookmarks.remove("http://a.com"));
        assert!(!bookmarks.remove("http://a.com"));
        assert!(!bookmarks.contains("http://a.com"));
        assert_eq!(bookmarks.len(), 1);
    }
}
