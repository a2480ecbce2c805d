//! UI widgets for the TUI application

pub mod search_input;

pub use search_input::{SearchInput, SearchInputAction, SearchInputBuilder};
