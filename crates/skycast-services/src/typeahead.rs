//! Location typeahead.
//!
//! Each input change is issued a [`SearchTicket`] carrying a sequence number.
//! Only a response whose ticket is still the latest may replace the
//! candidate list, so a slow response for an older prefix can never
//! overwrite the suggestions for what the user has typed since.

use skycast_core::SearchConfig;
use skycast_weather::LocationCandidate;

use crate::backend::LocationSearch;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug, Clone)]
pub struct TypeaheadResolver {
    min_chars: usize,
    max_candidates: usize,
    latest: u64,
    candidates: Vec<LocationCandidate>,
}

impl Default for TypeaheadResolver {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl TypeaheadResolver {
    pub fn new(min_chars: usize, max_candidates: usize) -> Self {
        Self {
            min_chars,
            max_candidates,
            latest: 0,
            candidates: Vec::new(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.min_query_chars, config.max_candidates)
    }

    /// Register an input change.
    ///
    /// Always invalidates outstanding tickets. Returns `None`, and clears the
    /// candidates, when the input is too short to search for.
    pub fn begin(&mut self, text: &str) -> Option<SearchTicket> {
        self.latest += 1;

        let query = text.trim();
        if query.chars().count() < self.min_chars {
            self.candidates.clear();
            return None;
        }

        Some(SearchTicket {
            seq: self.latest,
            query: query.to_string(),
        })
    }

    /// Apply a search outcome. Returns false if the ticket is stale and the
    /// outcome was discarded.
    pub fn accept(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<LocationCandidate>, ApiError>,
    ) -> bool {
        if ticket.seq != self.latest {
            tracing::debug!(
                "Discarding stale search response for {:?} (seq {} < {})",
                ticket.query,
                ticket.seq,
                self.latest
            );
            return false;
        }

        match result {
            Ok(mut found) => {
                found.truncate(self.max_candidates);
                self.candidates = found;
            }
            Err(e) => {
                tracing::debug!("Location search for {:?} failed: {}", ticket.query, e);
                self.candidates.clear();
            }
        }
        true
    }

    /// `begin`, search, then `accept`, returning the resulting candidates.
    pub async fn resolve<S: LocationSearch>(&mut self, search: &S, text: &str) -> Vec<LocationCandidate> {
        if let Some(ticket) = self.begin(text) {
            let result = search.search(ticket.query()).await;
            self.accept(&ticket, result);
        }
        self.candidates.clone()
    }

    pub fn candidates(&self) -> &[LocationCandidate] {
        &self.candidates
    }

    /// Pick a candidate. Clears the list and returns the location string to
    /// query with.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let location = self.candidates.get(index)?.location.clone();
        self.clear();
        Some(location)
    }

    /// Drop the candidates and invalidate outstanding tickets.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.candidates.clear();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn candidate(label: &str, location: &str) -> LocationCandidate {
        LocationCandidate {
            label: label.to_string(),
            location: location.to_string(),
        }
    }

    /// Returns `count` candidates named after the query, counting calls.
    struct FakeSearch {
        calls: AtomicUsize,
        count: usize,
        fail: bool,
    }

    impl FakeSearch {
        fn new(count: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                count,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(0)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LocationSearch for FakeSearch {
        async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Remote {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok((0..self.count)
                .map(|i| candidate(&format!("{} {}", query, i), &format!("{}-{}", query, i)))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_short_input_does_not_search() {
        let search = FakeSearch::new(3);
        let mut resolver = TypeaheadResolver::default();

        assert!(resolver.resolve(&search, "").await.is_empty());
        assert!(resolver.resolve(&search, "A").await.is_empty());
        assert!(resolver.resolve(&search, " B ").await.is_empty());
        assert_eq!(search.calls(), 0);

        let found = resolver.resolve(&search, "Au").await;
        assert_eq!(found.len(), 3);
        assert_eq!(search.calls(), 1);
    }

    #[tokio::test]
    async fn test_length_counts_characters_not_bytes() {
        let search = FakeSearch::new(1);
        let mut resolver = TypeaheadResolver::new(3, 5);

        // Two characters, four bytes
        assert!(resolver.resolve(&search, "Zü").await.is_empty());
        assert_eq!(search.calls(), 0);
    }

    #[tokio::test]
    async fn test_results_truncated_to_max() {
        let search = FakeSearch::new(12);
        let mut resolver = TypeaheadResolver::default();

        let found = resolver.resolve(&search, "Spring").await;
        assert_eq!(found.len(), 5);
        assert_eq!(found[0].location, "Spring-0");
    }

    #[tokio::test]
    async fn test_failure_yields_empty_list() {
        let search = FakeSearch::failing();
        let mut resolver = TypeaheadResolver::default();

        assert!(resolver.resolve(&search, "Paris").await.is_empty());
        assert_eq!(search.calls(), 1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut resolver = TypeaheadResolver::default();

        let older = resolver.begin("Aus").unwrap();
        let newer = resolver.begin("Austin").unwrap();
        assert!(newer.seq() > older.seq());

        assert!(resolver.accept(&newer, Ok(vec![candidate("Austin, TX", "Austin,US")])));
        assert!(!resolver.accept(&older, Ok(vec![candidate("Australia", "AU")])));

        assert_eq!(resolver.candidates().len(), 1);
        assert_eq!(resolver.candidates()[0].label, "Austin, TX");
    }

    #[test]
    fn test_short_input_invalidates_pending_search() {
        let mut resolver = TypeaheadResolver::default();

        let pending = resolver.begin("Lo").unwrap();
        assert!(resolver.begin("L").is_none());

        assert!(!resolver.accept(&pending, Ok(vec![candidate("London", "London,GB")])));
        assert!(resolver.candidates().is_empty());
    }

    #[test]
    fn test_select_clears_and_returns_location() {
        let mut resolver = TypeaheadResolver::default();
        let ticket = resolver.begin("Port").unwrap();
        resolver.accept(
            &ticket,
            Ok(vec![
                candidate("Portland, OR", "45.52,-122.68"),
                candidate("Portland, ME", "43.66,-70.26"),
            ]),
        );

        assert_eq!(resolver.select(1).as_deref(), Some("43.66,-70.26"));
        assert!(resolver.candidates().is_empty());
        assert!(resolver.select(0).is_none());

        // A response for the pre-selection input arrives late
        assert!(!resolver.accept(&ticket, Ok(vec![candidate("Portugal", "PT")])));
        assert!(resolver.candidates().is_empty());
    }
}
