//! Remote source trait definition.
//!
//! This module defines the [`RemoteSource`] trait which abstracts over the
//! REST-style data source the panels read from (Microsoft Graph in the
//! shipped adapter). The panel core performs no I/O of its own; every remote
//! call goes through this seam, which keeps the core testable against
//! scripted sources.

use async_trait::async_trait;

use crate::domain::{
    DetailRecord, Importance, ItemId, ListItem, Resource, TaskList, TaskStatus,
};
use crate::panel::ItemQuery;

/// Result type alias for remote source operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur during remote source operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Authentication failed or credentials expired.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network or connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, if known.
        retry_after_secs: Option<u64>,
    },

    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request or parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Source-specific error.
    #[error("source error: {0}")]
    Provider(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A field-level change applied to a single remote item.
///
/// Patches are issued fire-and-forget: the panel updates its local copy
/// optimistically and does not roll back if the remote write later fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPatch {
    /// Set the read flag on a mail message.
    ReadStatus(bool),
    /// Set the importance marker on a message or task.
    Importance(Importance),
    /// Set the completion state of a task.
    TaskStatus(TaskStatus),
}

/// Trait for remote data source implementations.
///
/// The capability set mirrors what the panels need: a filtered list query, a
/// single-item detail fetch, two prerequisite lookups (mailbox time zone for
/// calendar details, task lists for the tasks panel), and field-level
/// mutations.
///
/// All methods are async and return [`Result`] to surface source errors.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Runs a list query against a resource collection.
    ///
    /// # Arguments
    ///
    /// * `resource` - The collection to query
    /// * `query` - Field selection, filter predicate, sort, and page size
    ///
    /// # Returns
    ///
    /// Summary records suitable for the panel list. An empty result is a
    /// valid success, not an error.
    async fn fetch_items(&self, resource: &Resource, query: &ItemQuery) -> Result<Vec<ListItem>>;

    /// Fetches the expanded form of a single item.
    ///
    /// # Arguments
    ///
    /// * `resource` - The collection the item belongs to
    /// * `id` - The item identifier
    /// * `time_zone` - For calendar events, the viewer's time zone; event
    ///   times in the result are localized to it
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] if the item does not exist.
    async fn fetch_detail(
        &self,
        resource: &Resource,
        id: &ItemId,
        time_zone: Option<&str>,
    ) -> Result<DetailRecord>;

    /// Looks up the viewer's configured mailbox time zone.
    ///
    /// Calendar detail fetches depend on this value; the lookup must
    /// complete before the detail request is issued.
    async fn fetch_mailbox_time_zone(&self) -> Result<String>;

    /// Fetches the account's to-do task lists.
    ///
    /// Used to discover the default list before querying tasks.
    async fn fetch_task_lists(&self) -> Result<Vec<TaskList>>;

    /// Applies a field-level change to a single item.
    async fn update_item(&self, resource: &Resource, id: &ItemId, patch: &ItemPatch)
        -> Result<()>;

    /// Deletes a single item.
    async fn delete_item(&self, resource: &Resource, id: &ItemId) -> Result<()>;
}
