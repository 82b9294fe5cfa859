/// Bounded, linear undo/redo history.
///
/// Provides a `HistoryManager` that records reversible actions, steps
/// backward and forward through them in order, evicts the oldest entries
/// past a fixed capacity, and prunes unreachable redo entries whenever a
/// new action is recorded from the middle of history.
pub mod action;
pub mod config;
pub mod manager;
pub mod snapshot;

pub use action::Action;
pub use config::HistoryConfig;
pub use manager::HistoryManager;
pub use snapshot::{EntryView, HistorySnapshot};
