//! Panel state and its transitions.
//!
//! One [`PanelState`] tracks the list lifecycle (idle/loading/loaded/failed)
//! and, independently, the open/closed detail view. Transitions are driven
//! by the controller: scheduler ticks and filter changes begin a refresh,
//! fetch completion ends it, and user selection opens the detail view.
//!
//! Refreshes are guarded by a monotonic sequence token: a slow response from
//! an earlier refresh that lands after a later one began is discarded instead
//! of overwriting fresher state.

use crate::domain::{DetailRecord, FilterSelection, Importance, ItemId, ItemKind, ListItem};

/// Token identifying one refresh cycle.
///
/// Returned by [`PanelState::begin_refresh`] and required to complete the
/// cycle; completions carrying a stale token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshToken(u64);

/// The full UI-relevant state of one panel instance.
#[derive(Debug, Default)]
pub struct PanelState {
    /// Active filter selection; exactly one at a time.
    pub filter: FilterSelection,
    /// Items from the most recent successful load.
    pub items: Vec<ListItem>,
    /// Whether a list request is in flight.
    pub loading: bool,
    /// Error from the most recent failed load, cleared on the next request.
    pub error: Option<String>,
    /// The expanded record backing the open detail view.
    pub active_detail: Option<DetailRecord>,
    /// Whether the detail view is open.
    pub detail_open: bool,
    refresh_seq: u64,
}

impl PanelState {
    /// Creates a state with the given initial filter selection.
    pub fn with_filter(filter: FilterSelection) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Begins a refresh cycle: marks the panel loading, clears any previous
    /// error, and clears the item set eagerly.
    ///
    /// Returns the token the eventual completion must present.
    pub fn begin_refresh(&mut self) -> RefreshToken {
        self.refresh_seq += 1;
        self.loading = true;
        self.error = None;
        self.items.clear();
        RefreshToken(self.refresh_seq)
    }

    /// Completes the refresh cycle identified by `token`.
    ///
    /// A success installs the payload (an empty payload is a valid success);
    /// a failure records the message. Either way the panel stops loading.
    /// Returns `false` without touching state when a newer refresh has begun
    /// since `token` was issued.
    pub fn complete_refresh(
        &mut self,
        token: RefreshToken,
        result: Result<Vec<ListItem>, String>,
    ) -> bool {
        if token.0 != self.refresh_seq {
            tracing::debug!(
                stale = token.0,
                current = self.refresh_seq,
                "discarding stale refresh result"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
        true
    }

    /// Switches the active filter selection. The caller follows up with a
    /// new refresh; the selection change alone does not touch the items.
    pub fn change_filter(&mut self, filter: FilterSelection) {
        self.filter = filter;
    }

    /// Records a non-refresh error, e.g. a failed detail fetch.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Opens the detail view over the given record.
    pub fn open_detail(&mut self, detail: DetailRecord) {
        self.active_detail = Some(detail);
        self.detail_open = true;
    }

    /// Closes the detail view and drops the record so a reopen never flashes
    /// stale content.
    pub fn dismiss_detail(&mut self) {
        self.detail_open = false;
        self.active_detail = None;
    }

    /// Returns the item with the given id, if present.
    pub fn item(&self, id: &ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Flips the read flag on a mail item in place.
    pub fn mark_item_read(&mut self, id: &ItemId) {
        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            if let ItemKind::Message(meta) = &mut item.kind {
                meta.is_read = true;
            }
        }
    }

    /// Sets the importance marker on a task item in place.
    pub fn set_task_importance(&mut self, id: &ItemId, importance: Importance) {
        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            if let ItemKind::Task(meta) = &mut item.kind {
                meta.importance = importance;
            }
        }
    }

    /// Removes an item from the list, e.g. after a delete or a task
    /// completion.
    pub fn remove_item(&mut self, id: &ItemId) {
        self.items.retain(|item| &item.id != id);
    }
}
