//! Search box that keeps the location's query parameters in step with typing
//!
//! The displayed text is seeded once from the location when the box is
//! mounted and is never overwritten by the location afterwards. Changes are
//! held back until the input has been quiet for the debounce window, then a
//! single replace of the current address is requested.

use crate::debouncer::Debouncer;
use crate::location::Location;
use crate::query_state::QueryState;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default quiescence window before a commit fires
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBoxConfig {
    /// Text shown while the box is empty
    pub placeholder: String,
    pub debounce: Duration,
    /// Parameter holding the search term
    pub query_param: String,
    /// Parameter reset to "1" on every commit
    pub page_param: String,
}

impl Default for SearchBoxConfig {
    fn default() -> Self {
        Self {
            placeholder: "Search...".to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            query_param: "query".to_string(),
            page_param: "page".to_string(),
        }
    }
}

impl SearchBoxConfig {
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Compute the query state a commit of `term` produces from `current`.
///
/// The page parameter always goes back to "1"; an empty term removes the
/// query parameter entirely.
pub fn next_query_state(current: &QueryState, term: &str, config: &SearchBoxConfig) -> QueryState {
    let mut next = current.clone();
    next.set(&config.page_param, "1");
    if term.is_empty() {
        next.remove(&config.query_param);
    } else {
        next.set(&config.query_param, term);
    }
    next
}

#[derive(Debug, Clone)]
pub struct SearchBox {
    config: SearchBoxConfig,
    value: String,
    debouncer: Debouncer,
}

impl SearchBox {
    /// An empty, unmounted box
    pub fn new(config: SearchBoxConfig) -> Self {
        Self {
            debouncer: Debouncer::new(config.debounce),
            value: String::new(),
            config,
        }
    }

    /// Create the box with its text seeded from the location's query parameter
    pub fn mount<L: Location + ?Sized>(location: &L, config: SearchBoxConfig) -> Self {
        let mut search_box = Self::new(config);
        if let Some(term) = location.query_state().get(&search_box.config.query_param) {
            search_box.value = term.to_string();
        }
        debug!(target: "search_box", "mounted at {} with '{}'", location.pathname(), search_box.value);
        search_box
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    pub fn config(&self) -> &SearchBoxConfig {
        &self.config
    }

    /// Record new input text and restart the quiescence window
    pub fn on_input_change(&mut self, raw_text: &str) {
        self.on_input_change_at(raw_text, Instant::now());
    }

    pub fn on_input_change_at(&mut self, raw_text: &str, now: Instant) {
        self.value = raw_text.to_string();
        self.debouncer.trigger_at(now);
        debug!(target: "debounce", "input '{}' scheduled in {:?}", self.value, self.config.debounce);
    }

    /// Commit the latest text if the input has gone quiet
    pub fn poll<L: Location + ?Sized>(&mut self, location: &mut L) -> Option<QueryState> {
        self.poll_at(location, Instant::now())
    }

    pub fn poll_at<L: Location + ?Sized>(
        &mut self,
        location: &mut L,
        now: Instant,
    ) -> Option<QueryState> {
        if self.debouncer.should_execute_at(now) {
            Some(self.commit(location, &self.value))
        } else {
            None
        }
    }

    /// Commit the pending text right away, if any
    pub fn flush<L: Location + ?Sized>(&mut self, location: &mut L) -> Option<QueryState> {
        if !self.debouncer.is_pending() {
            return None;
        }
        self.debouncer.reset();
        Some(self.commit(location, &self.value))
    }

    /// Drop a pending commit without touching the location
    pub fn cancel(&mut self) {
        if self.debouncer.is_pending() {
            debug!(target: "debounce", "pending commit of '{}' cancelled", self.value);
        }
        self.debouncer.reset();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn time_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_remaining_at(now)
    }

    /// Replace the location's address with `term` applied to its query state
    pub fn commit<L: Location + ?Sized>(&self, location: &mut L, term: &str) -> QueryState {
        let next = next_query_state(&location.query_state(), term, &self.config);
        let address = format!("{}?{}", location.pathname(), next);
        info!(target: "search_box", "commit '{}' -> {}", term, address);
        location.replace(&address);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::MemoryLocation;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_next_state_sets_query_and_page() {
        let config = SearchBoxConfig::default();
        let next = next_query_state(&QueryState::parse("page=7"), "lee", &config);
        assert_eq!(next.to_query_string(), "page=1&query=lee");
    }

    #[test]
    fn test_next_state_empty_term_removes_query() {
        let config = SearchBoxConfig::default();
        let next = next_query_state(&QueryState::parse("query=lee&page=3"), "", &config);
        assert_eq!(next.to_query_string(), "page=1");
    }

    #[test]
    fn test_next_state_keeps_unrelated_params() {
        let config = SearchBoxConfig::default();
        let next = next_query_state(&QueryState::parse("sort=date&page=2"), "x", &config);
        assert_eq!(next.to_query_string(), "sort=date&page=1&query=x");
    }

    #[test]
    fn test_custom_param_names() {
        let config = SearchBoxConfig {
            query_param: "q".to_string(),
            page_param: "p".to_string(),
            ..SearchBoxConfig::default()
        };
        let next = next_query_state(&QueryState::new(), "lee", &config);
        assert_eq!(next.to_query_string(), "p=1&q=lee");
    }

    #[test]
    fn test_input_change_does_not_touch_location() {
        let start = Instant::now();
        let mut location = MemoryLocation::new("/invoices");
        let mut search_box = SearchBox::mount(&location, SearchBoxConfig::default());

        search_box.on_input_change_at("l", start);
        assert_eq!(search_box.value(), "l");
        assert!(search_box.poll_at(&mut location, start + ms(100)).is_none());
        assert_eq!(location.replace_count(), 0);
    }

    #[test]
    fn test_flush_commits_immediately() {
        let start = Instant::now();
        let mut location = MemoryLocation::new("/invoices");
        let mut search_box = SearchBox::mount(&location, SearchBoxConfig::default());

        assert!(search_box.flush(&mut location).is_none());
        search_box.on_input_change_at("lee", start);
        let state = search_box.flush(&mut location).unwrap();
        assert_eq!(state.get("query"), Some("lee"));
        assert!(!search_box.is_pending());
        assert!(search_box.poll_at(&mut location, start + ms(1000)).is_none());
        assert_eq!(location.replace_count(), 1);
    }

    #[test]
    fn test_cancel_drops_pending_commit() {
        let start = Instant::now();
        let mut location = MemoryLocation::new("/invoices");
        let mut search_box = SearchBox::mount(&location, SearchBoxConfig::default());

        search_box.on_input_change_at("lee", start);
        search_box.cancel();
        assert!(search_box.poll_at(&mut location, start + ms(1000)).is_none());
        assert_eq!(location.href(), "/invoices");
    }
}
