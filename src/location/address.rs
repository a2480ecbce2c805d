use crate::query_state::QueryState;
use std::fmt;

/// Path plus query parameters of an addressable location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub path: String,
    pub query: QueryState,
}

impl Address {
    pub fn new(path: impl Into<String>, query: QueryState) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path },
            query,
        }
    }

    /// Parse `"/path?a=1#frag"`. The fragment is dropped and an empty path
    /// becomes `/`.
    pub fn parse(input: &str) -> Self {
        let without_fragment = input.split('#').next().unwrap_or_default();
        match without_fragment.split_once('?') {
            Some((path, query)) => Self::new(path, QueryState::parse(query)),
            None => Self::new(without_fragment, QueryState::new()),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}
