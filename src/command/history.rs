use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::document::ImageState;
use crate::util::time;

/// A snapshot captured into history. Immutable once pushed.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    state: ImageState,
}

impl HistoryEntry {
    /// Read-only view of the stored snapshot
    pub fn state(&self) -> &ImageState {
        &self.state
    }
}

/// Summary of where the history cursor sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryInfo {
    pub can_undo: bool,
    pub can_redo: bool,
    /// `None` when history is empty
    pub current_index: Option<usize>,
    pub total_entries: usize,
}

/// Bounded, linear undo/redo history over whole-image snapshots.
///
/// Pushing after an undo discards the redo branch. When capacity is
/// exceeded the oldest entry is evicted. Every state going in or coming out
/// is an owned copy, so callers can never alias a stored snapshot.
///
/// Mutating methods take `&mut self`; share it across threads only behind a
/// lock (see [`SharedEditor`](crate::state::SharedEditor)).
#[derive(Debug)]
pub struct HistoryManager {
    entries: VecDeque<HistoryEntry>,
    current_index: Option<usize>,
    max_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(crate::config::AppSettings::default().max_history_size)
    }
}

impl HistoryManager {
    /// Creates an empty history holding at most `max_size` entries (minimum 1)
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current_index: None,
            max_size: max_size.max(1),
        }
    }

    /// Record a copy of `state` as the newest entry
    pub fn push(&mut self, state: &ImageState, description: impl Into<String>) {
        // Drop the redo branch
        let keep = self.current_index.map_or(0, |index| index + 1);
        self.entries.truncate(keep);

        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: time::now(),
            description: description.into(),
            state: state.clone(),
        };
        log::debug!("History push: {} ({})", entry.description, entry.id);
        self.entries.push_back(entry);

        if self.entries.len() > self.max_size {
            if let Some(evicted) = self.entries.pop_front() {
                log::debug!("History full, evicted {}", evicted.description);
            }
        }
        self.current_index = Some(self.entries.len() - 1);
    }

    /// Step back one entry, returning a copy of it
    pub fn undo(&mut self) -> Option<ImageState> {
        if !self.can_undo() {
            return None;
        }
        let index = self.current_index? - 1;
        self.current_index = Some(index);
        log::debug!("Undo to entry {}", index);
        self.entries.get(index).map(|entry| entry.state.clone())
    }

    /// Step forward one entry, returning a copy of it
    pub fn redo(&mut self) -> Option<ImageState> {
        if !self.can_redo() {
            return None;
        }
        let index = self.current_index.map_or(0, |index| index + 1);
        self.current_index = Some(index);
        log::debug!("Redo to entry {}", index);
        self.entries.get(index).map(|entry| entry.state.clone())
    }

    /// True only when an entry exists before the cursor
    pub fn can_undo(&self) -> bool {
        self.current_index.is_some_and(|index| index > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.current_index {
            Some(index) => index + 1 < self.entries.len(),
            None => false,
        }
    }

    /// Copy of the entry under the cursor
    pub fn current_state(&self) -> Option<ImageState> {
        self.current_index
            .and_then(|index| self.entries.get(index))
            .map(|entry| entry.state.clone())
    }

    /// Reset to empty, keeping the capacity
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_index = None;
    }

    pub fn history_info(&self) -> HistoryInfo {
        HistoryInfo {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            current_index: self.current_index,
            total_entries: self.entries.len(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
