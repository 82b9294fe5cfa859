/// Core undo/redo manager with bounded, linear history.
///
/// Entries are kept oldest first. Everything up to the cursor has been
/// applied; anything after it is a redo branch that survives until the
/// next `record` prunes it.
use std::collections::VecDeque;

use anyhow::{Context, Result};

use crate::action::Action;
use crate::config::HistoryConfig;
use crate::snapshot::{EntryView, HistorySnapshot};

/// A recorded action plus its diagnostic sequence number.
struct Entry<T> {
    seq: u64,
    action: Box<dyn Action<T> + Send>,
}

impl<T> Entry<T> {
    /// Runs the cull hook, keeping only the first failure in `failure`.
    ///
    /// The entry is gone from history either way.
    fn cull(mut self, target: &mut T, failure: &mut Option<anyhow::Error>) {
        if let Err(e) = self.action.cull(target) {
            tracing::warn!("Cull hook failed for entry #{}: {e:#}", self.seq);
            if failure.is_none() {
                *failure = Some(e.context(format!("Failed to cull entry #{}", self.seq)));
            }
        }
    }
}

/// Manages a linear undo/redo history over a target of type `T`.
///
/// The manager owns each action's place in history. It never inspects
/// an action beyond calling its `undo`, `redo`, `cull`, and `label`.
///
/// Actions must be `Send`, so a manager can sit behind one `Mutex`
/// together with its target when another thread needs to drive it.
pub struct HistoryManager<T> {
    /// Recorded entries, ordered by seq ascending (oldest first).
    entries: VecDeque<Entry<T>>,
    /// Number of applied entries. The cursor is `applied - 1`.
    applied: usize,
    /// Maximum number of entries, always at least 1.
    capacity: usize,
    /// Next sequence number to assign.
    next_seq: u64,
}

impl<T> std::fmt::Debug for HistoryManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("len", &self.entries.len())
            .field("cursor", &self.cursor())
            .field("capacity", &self.capacity)
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

impl<T> HistoryManager<T> {
    /// Creates an empty manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid (zero capacity).
    pub fn new(config: HistoryConfig) -> Result<Self> {
        config.validate().context("Failed to create history manager")?;
        Ok(Self {
            entries: VecDeque::new(),
            applied: 0,
            capacity: config.capacity,
            next_seq: 0,
        })
    }

    /// Creates an empty manager holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(HistoryConfig::with_capacity(capacity))
    }

    /// Number of entries in history.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index of the most recently applied entry, or `None` when nothing
    /// is applied.
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// Whether undo would step.
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Whether redo would step.
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Records an already-applied action as the newest entry.
    ///
    /// Culls and drops the redo branch first, in ascending order, then
    /// appends. If history is now over capacity the oldest entry is
    /// culled and dropped. Never calls `undo` or `redo`.
    ///
    /// # Errors
    ///
    /// Returns the first failing `cull` hook. The history is still
    /// updated in full: culled entries are gone and `action` is recorded.
    pub fn record<A>(&mut self, target: &mut T, action: A) -> Result<()>
    where
        A: Action<T> + Send + 'static,
    {
        self.record_boxed(target, Box::new(action))
    }

    /// Same as `record`, for actions that are already boxed.
    ///
    /// # Errors
    ///
    /// See `record`.
    pub fn record_boxed(
        &mut self,
        target: &mut T,
        action: Box<dyn Action<T> + Send>,
    ) -> Result<()> {
        let mut failure = None;
        self.prune(target, &mut failure);

        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::debug!("Recording entry #{seq} ({})", action.label());
        self.entries.push_back(Entry { seq, action });
        self.applied = self.entries.len();

        self.trim(target, &mut failure);
        failure.map_or(Ok(()), Err)
    }

    /// Undoes the entry at the cursor and steps back.
    ///
    /// Returns `Ok(false)` without touching any action when nothing is
    /// applied.
    ///
    /// # Errors
    ///
    /// Propagates the action's failure. The cursor is left unmoved.
    pub fn undo(&mut self, target: &mut T) -> Result<bool> {
        let Some(index) = self.applied.checked_sub(1) else {
            tracing::trace!("Nothing to undo");
            return Ok(false);
        };
        let entry = &mut self.entries[index];
        let seq = entry.seq;
        entry
            .action
            .undo(target)
            .with_context(|| format!("Failed to undo entry #{seq}"))?;
        self.applied = index;
        tracing::trace!("Undid entry #{seq}");
        Ok(true)
    }

    /// Steps forward and redoes the entry now at the cursor.
    ///
    /// Returns `Ok(false)` without touching any action when the cursor
    /// is already at the newest entry.
    ///
    /// # Errors
    ///
    /// Propagates the action's failure. The cursor is left unmoved.
    pub fn redo(&mut self, target: &mut T) -> Result<bool> {
        let index = self.applied;
        let Some(entry) = self.entries.get_mut(index) else {
            tracing::trace!("Nothing to redo");
            return Ok(false);
        };
        let seq = entry.seq;
        entry
            .action
            .redo(target)
            .with_context(|| format!("Failed to redo entry #{seq}"))?;
        self.applied = index + 1;
        tracing::trace!("Redid entry #{seq}");
        Ok(true)
    }

    /// Changes the capacity, evicting oldest entries until history fits.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero capacity (nothing changes), or the
    /// first failing `cull` hook (eviction still completes).
    pub fn set_capacity(&mut self, target: &mut T, capacity: usize) -> Result<()> {
        HistoryConfig::with_capacity(capacity)
            .validate()
            .context("Failed to change history capacity")?;
        tracing::debug!("History capacity {} -> {capacity}", self.capacity);
        self.capacity = capacity;

        let mut failure = None;
        self.trim(target, &mut failure);
        failure.map_or(Ok(()), Err)
    }

    /// Culls and drops every entry, oldest first.
    ///
    /// # Errors
    ///
    /// Returns the first failing `cull` hook. History is empty regardless.
    pub fn clear(&mut self, target: &mut T) -> Result<()> {
        tracing::debug!("Clearing {} history entries", self.entries.len());
        self.applied = 0;
        let mut failure = None;
        while let Some(entry) = self.entries.pop_front() {
            entry.cull(target, &mut failure);
        }
        failure.map_or(Ok(()), Err)
    }

    /// Returns an owned view of the current history for debugging.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            entries: self
                .entries
                .iter()
                .enumerate()
                .map(|(i, entry)| EntryView {
                    seq: entry.seq,
                    label: entry.action.label(),
                    applied: i < self.applied,
                })
                .collect(),
            cursor: self.cursor(),
            capacity: self.capacity,
        }
    }

    /// Drops the redo branch, culling in ascending index order.
    fn prune(&mut self, target: &mut T, failure: &mut Option<anyhow::Error>) {
        if self.applied == self.entries.len() {
            return;
        }
        let future = self.entries.split_off(self.applied);
        tracing::debug!("Pruning {} redo entries", future.len());
        for entry in future {
            entry.cull(target, failure);
        }
    }

    /// Evicts oldest entries until the length is within capacity.
    fn trim(&mut self, target: &mut T, failure: &mut Option<anyhow::Error>) {
        while self.entries.len() > self.capacity {
            let Some(entry) = self.entries.pop_front() else {
                break;
            };
            self.applied = self.applied.saturating_sub(1);
            tracing::debug!("Evicting oldest entry #{}", entry.seq);
            entry.cull(target, failure);
        }
    }
}
