//! Role-aware search
//!
//! - `aggregator`: merges catalog, children and announcement hits into one list
//! - `history`: bounded recent-search list in the local store
//! - `surface`: debounced open/type/select state machine on top of both

pub mod aggregator;
pub mod history;
pub mod surface;

pub use aggregator::{ResultAction, SearchAggregator, SearchHost, SearchResult};
pub use history::{SearchHistory, DEFAULT_HISTORY_LIMIT};
pub use surface::{SearchSurface, SurfaceSnapshot, SurfaceState, DEFAULT_DEBOUNCE};
