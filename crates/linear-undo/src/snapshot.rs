/// Read-only diagnostic view of a history.
use serde::Serialize;

/// One recorded entry as seen by a debug view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    /// Sequence number assigned when the entry was recorded.
    pub seq: u64,
    /// The action's type tag.
    pub label: String,
    /// Whether the entry is currently applied (at or before the cursor).
    pub applied: bool,
}

/// Owned copy of a history's state after the most recent operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySnapshot {
    /// Entries oldest first.
    pub entries: Vec<EntryView>,
    /// Index of the most recently applied entry, `None` when fully undone.
    pub cursor: Option<usize>,
    pub capacity: usize,
}

impl HistorySnapshot {
    /// Labels of all entries, oldest first.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Renders the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
