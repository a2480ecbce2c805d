pub mod app;
pub mod config;
pub mod debouncer;
pub mod location;
pub mod query_state;
pub mod search_box;
pub mod utils;
pub mod widgets;

pub use location::{Address, Location, MemoryLocation};
pub use query_state::QueryState;
pub use search_box::{SearchBox, SearchBoxConfig};
