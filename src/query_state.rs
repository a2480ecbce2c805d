//! Ordered URL query parameters
//!
//! `QueryState` mirrors the semantics of a browser's search params: pairs keep
//! their insertion order, `set` rewrites the first occurrence in place, and the
//! string form uses `application/x-www-form-urlencoded` rules.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Ordered mapping from parameter name to value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pairs: Vec<(String, String)>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    ///
    /// Never fails: segments without `=` get an empty value and malformed
    /// percent escapes are kept as literal text.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let pairs = input
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((name, value)) => (decode_component(name), decode_component(value)),
                None => (decode_component(segment), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// First value stored under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    /// Set `name` to `value`, keeping the position of its first occurrence
    /// and dropping any later duplicates. Appends when `name` is absent.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.pairs.iter().position(|(key, _)| key == name) {
            Some(first) => {
                self.pairs[first].1 = value.to_string();
                let mut index = 0;
                self.pairs.retain(|(key, _)| {
                    let keep = index <= first || key != name;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove every occurrence of `name`
    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(key, _)| key != name);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Form-encoded string without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryState
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

// Serialized as an object so the order of keys survives into JSON output.
// Duplicate names keep their first value, matching `get`.
impl Serialize for QueryState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.pairs.len());
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.pairs {
            if seen.contains(&key.as_str()) {
                continue;
            }
            seen.push(key);
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn encode_component(raw: &str) -> Cow<'_, str> {
    let encoded = urlencoding::encode(raw);
    if encoded.contains("%20") {
        Cow::Owned(encoded.replace("%20", "+"))
    } else {
        encoded
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_prefix() {
        let a = QueryState::parse("?query=lee&page=2");
        let b = QueryState::parse("query=lee&page=2");
        assert_eq!(a, b);
        assert_eq!(a.get("query"), Some("lee"));
        assert_eq!(a.get("page"), Some("2"));
    }

    #[test]
    fn test_parse_edge_segments() {
        let state = QueryState::parse("&&flag&empty=&a=b=c");
        assert_eq!(state.len(), 3);
        assert_eq!(state.get("flag"), Some(""));
        assert_eq!(state.get("empty"), Some(""));
        assert_eq!(state.get("a"), Some("b=c"));
    }

    #[test]
    fn test_parse_decodes_plus_and_percent() {
        let state = QueryState::parse("query=lee+robinson&city=S%C3%A3o%20Paulo");
        assert_eq!(state.get("query"), Some("lee robinson"));
        assert_eq!(state.get("city"), Some("São Paulo"));
    }

    #[test]
    fn test_parse_keeps_malformed_escape() {
        let state = QueryState::parse("query=100%");
        assert_eq!(state.get("query"), Some("100%"));
    }

    #[test]
    fn test_set_replaces_first_and_drops_duplicates() {
        let mut state = QueryState::parse("tag=a&page=4&tag=b");
        state.set("tag", "c");
        assert_eq!(state.to_query_string(), "tag=c&page=4");
    }

    #[test]
    fn test_set_appends_when_missing() {
        let mut state = QueryState::parse("page=4");
        state.set("query", "lee");
        assert_eq!(state.to_query_string(), "page=4&query=lee");
    }

    #[test]
    fn test_remove_all_occurrences() {
        let mut state = QueryState::parse("tag=a&page=1&tag=b");
        state.remove("tag");
        assert_eq!(state.to_query_string(), "page=1");
        state.remove("missing");
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_encoding_reserved_characters() {
        let mut state = QueryState::new();
        state.set("query", "a&b=c d");
        assert_eq!(state.to_query_string(), "query=a%26b%3Dc+d");
        let parsed = QueryState::parse(&state.to_query_string());
        assert_eq!(parsed.get("query"), Some("a&b=c d"));
    }

    #[test]
    fn test_empty_state_renders_empty_string() {
        assert_eq!(QueryState::new().to_query_string(), "");
        assert!(QueryState::parse("?").is_empty());
    }

    #[test]
    fn test_serialize_as_ordered_object() {
        let state: QueryState = [("page", "1"), ("query", "lee")].into_iter().collect();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"page":"1","query":"lee"}"#);
    }
}
