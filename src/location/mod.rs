//! The addressable location the search box writes into
//!
//! The search box never owns the location. It reads the current path and
//! query parameters and asks for the address to be replaced in place.

pub mod address;
pub mod memory;

pub use address::Address;
pub use memory::MemoryLocation;

use crate::query_state::QueryState;

/// Read/replace access to the current address
pub trait Location {
    /// Current path, without query string
    fn pathname(&self) -> &str;

    /// Snapshot of the current query parameters
    fn query_state(&self) -> QueryState;

    /// Swap the current address for `address` without adding a history entry
    fn replace(&mut self, address: &str);
}
