//! Panel orchestration.
//!
//! A [`Panel`] owns the state for one panel instance and mediates between
//! the refresh scheduler, the query builder, and the remote source. All
//! operations run on the caller's task; remote mutations are dispatched
//! fire-and-forget and reconciled optimistically in local state.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;

use crate::config::{ClickAction, PanelKind, PanelSettings};
use crate::domain::{
    DetailRecord, FilterSelection, ItemId, ListItem, Resource, TaskList, TaskStatus,
};
use crate::providers::{ItemPatch, ProviderError, RemoteSource};

use super::query::{calendar_query, mail_query, task_query};
use super::scheduler::RefreshSignal;
use super::state::PanelState;

/// One panel instance: settings, state, and the remote source handle.
///
/// The source handle is created once per panel lifetime and shared read-only
/// across all operations; operations are sequenced by user and timer action,
/// never run in parallel against the same panel.
pub struct Panel {
    settings: PanelSettings,
    source: Arc<dyn RemoteSource>,
    state: PanelState,
    active_task_list: Option<TaskList>,
}

impl Panel {
    /// Creates a panel over the given source. The initial filter selection
    /// comes from the settings; no data is loaded until the first refresh.
    pub fn new(settings: PanelSettings, source: Arc<dyn RemoteSource>) -> Self {
        let state = PanelState::with_filter(settings.mail_filter);
        Self {
            settings,
            source,
            state,
            active_task_list: None,
        }
    }

    /// The panel's current state, for rendering.
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// The panel's settings.
    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    /// Reloads the list from the remote source.
    ///
    /// A remote failure lands in `state.error`; there is no automatic retry.
    /// The next scheduler tick or filter change is the recovery path.
    pub async fn refresh(&mut self) {
        let token = self.state.begin_refresh();
        let result = self.load_items().await.map_err(|e| e.to_string());
        self.state.complete_refresh(token, result);
    }

    /// Switches the filter selection and reloads.
    pub async fn change_filter(&mut self, filter: FilterSelection) {
        self.state.change_filter(filter);
        self.refresh().await;
    }

    /// Handles selection of a list item.
    ///
    /// With the open-externally click action this performs no fetch and
    /// returns the item's external link for the host to open. Otherwise the
    /// item's detail record is fetched and the detail view opened; with the
    /// preview-read click action an unread message is additionally marked
    /// read, remotely and in the local list.
    pub async fn select_item(&mut self, id: &ItemId) -> Option<String> {
        let item = self.state.item(id)?;

        if self.settings.click_action == ClickAction::OpenExternally {
            return item.web_link.clone();
        }

        let was_unread = item.as_message().is_some_and(|meta| !meta.is_read);

        let fetched = match self.settings.kind {
            PanelKind::Calendar => self.fetch_event_detail(id).await,
            _ => match self.detail_resource() {
                Some(resource) => self.source.fetch_detail(&resource, id, None).await,
                None => {
                    tracing::warn!("no active task list; detail fetch skipped");
                    return None;
                }
            },
        };

        match fetched {
            Ok(detail) => {
                if self.settings.click_action == ClickAction::PreviewRead && was_unread {
                    self.push_patch(Resource::Mail, id.clone(), ItemPatch::ReadStatus(true));
                    self.state.mark_item_read(id);
                }
                self.state.open_detail(detail);
            }
            Err(e) => self.state.set_error(e.to_string()),
        }

        None
    }

    /// Closes the detail view.
    pub fn dismiss_detail(&mut self) {
        self.state.dismiss_detail();
    }

    /// Deletes a mail message: remote delete dispatched fire-and-forget, the
    /// local item removed immediately.
    pub fn delete_message(&mut self, id: &ItemId) {
        if self.state.item(id).and_then(|item| item.as_message()).is_none() {
            return;
        }

        let source = Arc::clone(&self.source);
        let remote_id = id.clone();
        tokio::spawn(async move {
            if let Err(e) = source.delete_item(&Resource::Mail, &remote_id).await {
                tracing::warn!(item = %remote_id, "remote delete failed: {e}");
            }
        });

        self.state.remove_item(id);
    }

    /// Marks a task completed: remote status patch dispatched
    /// fire-and-forget, the local item removed immediately (the list shows
    /// open tasks only).
    pub fn complete_task(&mut self, id: &ItemId) {
        let Some(list) = self.active_task_list.clone() else {
            tracing::warn!("no active task list; completion skipped");
            return;
        };
        if self.state.item(id).and_then(|item| item.as_task()).is_none() {
            return;
        }

        self.push_patch(
            Resource::Tasks { list: list.id },
            id.clone(),
            ItemPatch::TaskStatus(TaskStatus::Completed),
        );
        self.state.remove_item(id);
    }

    /// Toggles a task between normal and high importance, remotely and in
    /// the local list.
    pub fn toggle_task_importance(&mut self, id: &ItemId) {
        let Some(list) = self.active_task_list.clone() else {
            tracing::warn!("no active task list; importance toggle skipped");
            return;
        };
        let Some(current) = self
            .state
            .item(id)
            .and_then(|item| item.as_task())
            .map(|meta| meta.importance)
        else {
            return;
        };

        let next = current.toggled();
        self.push_patch(
            Resource::Tasks { list: list.id },
            id.clone(),
            ItemPatch::Importance(next),
        );
        self.state.set_task_importance(id, next);
    }

    /// Link for creating a new item externally, when the panel kind has one.
    pub fn compose_link(&self) -> Option<&'static str> {
        self.settings.kind.compose_link()
    }

    /// Link to the full remote UI for this panel's resource.
    pub fn view_all_link(&self) -> &'static str {
        self.settings.kind.view_all_link()
    }

    /// Drives refreshes from a scheduler subscription until the scheduler
    /// goes away.
    pub async fn run(&mut self, mut signals: broadcast::Receiver<RefreshSignal>) {
        loop {
            match signals.recv().await {
                Ok(RefreshSignal) => self.refresh().await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "refresh signals lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Builds and runs the list query for the panel's resource.
    async fn load_items(&mut self) -> Result<Vec<ListItem>, ProviderError> {
        match self.settings.kind {
            PanelKind::Mail => {
                let query = mail_query(self.state.filter, self.settings.item_count);
                self.source.fetch_items(&Resource::Mail, &query).await
            }
            PanelKind::Calendar => {
                let query = calendar_query(
                    Utc::now(),
                    self.settings.days_in_advance,
                    self.settings.item_count,
                );
                self.source.fetch_items(&Resource::Calendar, &query).await
            }
            PanelKind::Tasks => {
                let list = self.resolve_task_list().await?;
                let query = task_query(self.settings.item_count);
                self.source
                    .fetch_items(&Resource::Tasks { list: list.id }, &query)
                    .await
            }
        }
    }

    /// Returns the default task list, fetching and caching it on first use.
    async fn resolve_task_list(&mut self) -> Result<TaskList, ProviderError> {
        if let Some(list) = &self.active_task_list {
            return Ok(list.clone());
        }

        let lists = self.source.fetch_task_lists().await?;
        let list = lists
            .into_iter()
            .find(TaskList::is_default)
            .ok_or_else(|| ProviderError::NotFound("default task list".to_string()))?;
        self.active_task_list = Some(list.clone());
        Ok(list)
    }

    /// Fetches an event detail: the mailbox time zone lookup must complete
    /// first so the event times come back localized.
    async fn fetch_event_detail(&self, id: &ItemId) -> Result<DetailRecord, ProviderError> {
        let time_zone = self.source.fetch_mailbox_time_zone().await?;
        self.source
            .fetch_detail(&Resource::Calendar, id, Some(&time_zone))
            .await
    }

    /// The resource detail fetches and mutations address for this panel.
    fn detail_resource(&self) -> Option<Resource> {
        match self.settings.kind {
            PanelKind::Mail => Some(Resource::Mail),
            PanelKind::Calendar => Some(Resource::Calendar),
            PanelKind::Tasks => self.active_task_list.as_ref().map(|list| Resource::Tasks {
                list: list.id.clone(),
            }),
        }
    }

    /// Dispatches a remote patch without waiting for it. Failures are
    /// logged, never rolled back locally.
    fn push_patch(&self, resource: Resource, id: ItemId, patch: ItemPatch) {
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            if let Err(e) = source.update_item(&resource, &id, &patch).await {
                tracing::warn!(item = %id, "remote update failed: {e}");
            }
        });
    }
}
