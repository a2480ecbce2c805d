use super::{Address, Location};
use crate::query_state::QueryState;
use std::fmt;
use tracing::debug;

type Listener = Box<dyn FnMut(&Address)>;

/// In-memory location backed by a history list
///
/// `replace` rewrites the current entry, `push` appends a new one. Listeners
/// run after every change of the current entry, which is where dependent data
/// fetching hooks in.
pub struct MemoryLocation {
    entries: Vec<Address>,
    index: usize,
    replace_count: usize,
    listeners: Vec<Listener>,
}

impl MemoryLocation {
    pub fn new(address: &str) -> Self {
        Self {
            entries: vec![Address::parse(address)],
            index: 0,
            replace_count: 0,
            listeners: Vec::new(),
        }
    }

    pub fn current(&self) -> &Address {
        &self.entries[self.index]
    }

    /// Full current address as a string
    pub fn href(&self) -> String {
        self.current().to_string()
    }

    /// Register a callback for every change of the current entry
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Address) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Navigate to `address`, discarding any forward entries
    pub fn push(&mut self, address: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Address::parse(address));
        self.index = self.entries.len() - 1;
        debug!(target: "location", "push {} (history={})", self.href(), self.entries.len());
        self.notify();
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        debug!(target: "location", "back to {}", self.href());
        self.notify();
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        debug!(target: "location", "forward to {}", self.href());
        self.notify();
        true
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    /// Position of the current entry within history
    pub fn history_index(&self) -> usize {
        self.index
    }

    /// Number of `replace` calls served so far
    pub fn replace_count(&self) -> usize {
        self.replace_count
    }

    fn notify(&mut self) {
        let current = self.entries[self.index].clone();
        for listener in self.listeners.iter_mut() {
            listener(&current);
        }
    }
}

impl Location for MemoryLocation {
    fn pathname(&self) -> &str {
        &self.current().path
    }

    fn query_state(&self) -> QueryState {
        self.current().query.clone()
    }

    fn replace(&mut self, address: &str) {
        self.entries[self.index] = Address::parse(address);
        self.replace_count += 1;
        debug!(target: "location", "replace {} (history={})", self.href(), self.entries.len());
        self.notify();
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for MemoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLocation")
            .field("entries", &self.entries)
            .field("index", &self.index)
            .field("replace_count", &self.replace_count)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_replace_keeps_history_length() {
        let mut location = MemoryLocation::new("/invoices");
        location.replace("/invoices?page=1&query=lee");
        assert_eq!(location.history_len(), 1);
        assert_eq!(location.replace_count(), 1);
        assert_eq!(location.href(), "/invoices?page=1&query=lee");
    }

    #[test]
    fn test_push_back_forward() {
        let mut location = MemoryLocation::new("/a");
        location.push("/b?page=2");
        assert_eq!(location.history_len(), 2);
        assert!(location.back());
        assert_eq!(location.pathname(), "/a");
        assert!(!location.back());
        assert!(location.forward());
        assert_eq!(location.query_state().get("page"), Some("2"));
        assert!(!location.forward());
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut location = MemoryLocation::new("/a");
        location.push("/b");
        location.push("/c");
        location.back();
        location.back();
        location.push("/d");
        assert_eq!(location.history_len(), 2);
        assert!(!location.forward());
    }

    #[test]
    fn test_listeners_see_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut location = MemoryLocation::new("/a");
        {
            let seen = seen.clone();
            location.subscribe(move |address| seen.borrow_mut().push(address.to_string()));
        }
        location.replace("/a?query=x");
        location.push("/b");
        location.back();
        assert_eq!(
            *seen.borrow(),
            vec!["/a?query=x".to_string(), "/b".to_string(), "/a?query=x".to_string()]
        );
    }
}
