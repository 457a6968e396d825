//! Microsoft Graph adapter.
//!
//! This module provides a [`RemoteSource`] implementation over the Graph
//! v1.0 REST surface using the endpoints the panels need:
//!
//! - `me/mailFolders/Inbox/messages` for the mail list and detail
//! - `me/calendar/calendarView` and `me/calendar/events` for the agenda
//! - `me/todo/lists` and `me/todo/lists/{id}/tasks` for to-do tasks
//! - `me/mailboxSettings` for the viewer's time zone
//!
//! # Authentication
//!
//! The adapter is handed a pre-acquired bearer token and attaches it to
//! every request. Acquiring and refreshing tokens is the host's concern;
//! an expired token surfaces as [`ProviderError::Authentication`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{ItemPatch, ProviderError, RemoteSource, Result};
use crate::domain::{
    Address, BodyContent, BodyType, DetailKind, DetailRecord, EventMeta, FlagStatus, Importance,
    ItemId, ItemKind, ListItem, MessageMeta, Resource, ShowAs, TaskList, TaskListId, TaskMeta,
    TaskStatus,
};
use crate::panel::ItemQuery;

const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Fields requested for the mail detail view, a superset of the list fields.
const MAIL_DETAIL_FIELDS: &str = "id,bodyPreview,receivedDateTime,from,subject,webLink,isRead,\
                                  importance,flag,hasAttachments,body,toRecipients,ccRecipients";

/// A Graph collection response.
#[derive(Debug, Deserialize)]
struct Collection<T> {
    value: Option<Vec<T>>,
}

/// Graph email address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphEmailAddress {
    name: Option<String>,
    address: Option<String>,
}

/// Graph recipient wrapper.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphRecipient {
    email_address: Option<GraphEmailAddress>,
}

/// Graph follow-up flag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphFlag {
    flag_status: Option<FlagStatus>,
}

/// Graph item body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphBody {
    content_type: Option<BodyType>,
    content: Option<String>,
}

/// Graph mail message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphMessage {
    id: String,
    subject: Option<String>,
    body_preview: Option<String>,
    received_date_time: Option<DateTime<Utc>>,
    from: Option<GraphRecipient>,
    web_link: Option<String>,
    is_read: Option<bool>,
    importance: Option<Importance>,
    flag: Option<GraphFlag>,
    has_attachments: Option<bool>,
    body: Option<GraphBody>,
    to_recipients: Option<Vec<GraphRecipient>>,
    cc_recipients: Option<Vec<GraphRecipient>>,
}

/// Graph date-time paired with a named time zone.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphDateTimeTimeZone {
    date_time: String,
    time_zone: Option<String>,
}

/// Graph event location.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphLocation {
    display_name: Option<String>,
}

/// Graph calendar event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphEvent {
    id: String,
    subject: Option<String>,
    body_preview: Option<String>,
    start: Option<GraphDateTimeTimeZone>,
    end: Option<GraphDateTimeTimeZone>,
    show_as: Option<ShowAs>,
    web_link: Option<String>,
    location: Option<GraphLocation>,
    is_all_day: Option<bool>,
    body: Option<GraphBody>,
}

/// Graph to-do task.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphTask {
    id: String,
    title: Option<String>,
    status: Option<TaskStatus>,
    importance: Option<Importance>,
    created_date_time: Option<DateTime<Utc>>,
    due_date_time: Option<GraphDateTimeTimeZone>,
    body: Option<GraphBody>,
}

/// Graph to-do task list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphTaskList {
    id: String,
    display_name: Option<String>,
    wellknown_list_name: Option<String>,
}

/// Graph mailbox settings (only the field the panels use).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphMailboxSettings {
    time_zone: Option<String>,
}

/// Parses a Graph local date-time such as `2017-08-29T04:00:00.0000000`.
fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Serializes a patch into the Graph request body.
fn patch_body(patch: &ItemPatch) -> serde_json::Value {
    match patch {
        ItemPatch::ReadStatus(read) => serde_json::json!({ "isRead": read }),
        ItemPatch::Importance(importance) => serde_json::json!({ "importance": importance }),
        ItemPatch::TaskStatus(status) => serde_json::json!({ "status": status }),
    }
}

/// Synthesizes the external link for a to-do task; Graph does not return one.
fn task_web_link(id: &str) -> String {
    format!("https://to-do.office.com/tasks/id/{id}/details")
}

/// Microsoft Graph implementation of [`RemoteSource`].
///
/// # Example
///
/// ```ignore
/// use glance::providers::GraphSource;
///
/// let source = GraphSource::new(bearer_token);
/// let items = source.fetch_items(&Resource::Mail, &query).await?;
/// ```
pub struct GraphSource {
    /// HTTP client for API requests.
    client: reqwest::Client,
    /// Pre-acquired bearer token.
    token: String,
    /// API base, overridable for tests and proxies.
    base: String,
}

impl GraphSource {
    /// Creates a source against the public Graph v1.0 endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base(token, GRAPH_API_BASE)
    }

    /// Creates a source against a custom base URL.
    pub fn with_base(token: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base: base.into(),
        }
    }

    /// Builds authorization headers for API requests.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|e| ProviderError::Internal(format!("invalid header: {e}")))?,
        );
        Ok(headers)
    }

    /// Makes an authenticated GET request.
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        url: Url,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T> {
        let mut headers = self.auth_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Makes an authenticated PATCH request, discarding the response body.
    async fn patch_no_response<B: Serialize>(&self, url: Url, body: &B) -> Result<()> {
        let mut headers = self.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .patch(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }
        Ok(())
    }

    /// Makes an authenticated DELETE request.
    async fn delete_no_response(&self, url: Url) -> Result<()> {
        let headers = self.auth_headers()?;

        let response = self
            .client
            .delete(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }
        Ok(())
    }

    /// Handles an API response, checking for errors.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Internal(format!("parse response: {e}")))
    }

    /// Maps an API error response onto the provider error taxonomy.
    async fn handle_error(&self, response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => ProviderError::Authentication(format!("unauthorized: {body}")),
            404 => ProviderError::NotFound(body),
            429 => ProviderError::RateLimited {
                retry_after_secs: None,
            },
            400 => ProviderError::InvalidRequest(body),
            _ => ProviderError::Internal(format!("API error ({status}): {body}")),
        }
    }

    /// Joins a relative path onto the API base.
    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}/{}", self.base, path))
            .map_err(|e| ProviderError::Internal(format!("invalid endpoint {path}: {e}")))
    }

    /// The collection path a resource is listed from.
    fn collection_path(resource: &Resource) -> String {
        match resource {
            Resource::Mail => "me/mailFolders/Inbox/messages".to_string(),
            Resource::Calendar => "me/calendar/calendarView".to_string(),
            Resource::Tasks { list } => format!("me/todo/lists/{}/tasks", list.0),
        }
    }

    /// The path a single item's detail is fetched from.
    fn detail_path(resource: &Resource, id: &ItemId) -> String {
        match resource {
            Resource::Mail => format!("me/mailFolders/Inbox/messages/{}", id.0),
            Resource::Calendar => format!("me/calendar/events/{}", id.0),
            Resource::Tasks { list } => format!("me/todo/lists/{}/tasks/{}", list.0, id.0),
        }
    }

    /// The path mutations address. Mail writes go through the flat messages
    /// collection rather than the folder-scoped one.
    fn mutation_path(resource: &Resource, id: &ItemId) -> String {
        match resource {
            Resource::Mail => format!("me/messages/{}", id.0),
            Resource::Calendar => format!("me/calendar/events/{}", id.0),
            Resource::Tasks { list } => format!("me/todo/lists/{}/tasks/{}", list.0, id.0),
        }
    }

    /// Builds the list URL for a resource and query.
    fn collection_url(&self, resource: &Resource, query: &ItemQuery) -> Result<Url> {
        let mut url = self.endpoint(&Self::collection_path(resource))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(window) = &query.window {
                pairs.append_pair(
                    "startDateTime",
                    &window.start.to_rfc3339_opts(SecondsFormat::Millis, true),
                );
                pairs.append_pair(
                    "endDateTime",
                    &window.end.to_rfc3339_opts(SecondsFormat::Millis, true),
                );
            }
            if !query.select.is_empty() {
                pairs.append_pair("$select", &query.select.join(","));
            }
            if let Some(filter) = &query.filter {
                pairs.append_pair("$filter", filter);
            }
            if let Some(order_by) = query.order_by {
                pairs.append_pair("$orderby", order_by);
            }
            pairs.append_pair("$top", &query.top.to_string());
        }

        Ok(url)
    }

    /// Converts a recipient wrapper to a domain address.
    fn to_address(recipient: &GraphRecipient) -> Address {
        let (name, address) = recipient
            .email_address
            .as_ref()
            .map(|e| (e.name.clone(), e.address.clone()))
            .unwrap_or((None, None));
        Address {
            address: address.unwrap_or_default(),
            name: name.filter(|n| !n.is_empty()),
        }
    }

    /// Converts a wire body to domain content.
    fn to_body(body: Option<GraphBody>) -> BodyContent {
        match body {
            Some(body) => BodyContent {
                content_type: body.content_type.unwrap_or_default(),
                content: body.content.unwrap_or_default(),
            },
            None => BodyContent::default(),
        }
    }

    /// Converts a Graph message to a list item.
    fn message_to_item(msg: GraphMessage) -> ListItem {
        ListItem {
            id: ItemId::from(msg.id),
            title: msg.subject.unwrap_or_default(),
            preview: msg.body_preview.unwrap_or_default(),
            timestamp: msg.received_date_time.unwrap_or_else(Utc::now),
            web_link: msg.web_link,
            kind: ItemKind::Message(MessageMeta {
                from: msg
                    .from
                    .as_ref()
                    .map(Self::to_address)
                    .unwrap_or_else(|| Address::new("")),
                is_read: msg.is_read.unwrap_or(false),
                importance: msg.importance.unwrap_or_default(),
                flag_status: msg
                    .flag
                    .and_then(|f| f.flag_status)
                    .unwrap_or_default(),
                has_attachments: msg.has_attachments.unwrap_or(false),
            }),
        }
    }

    /// Converts a Graph message to a detail record.
    fn message_to_detail(msg: GraphMessage) -> DetailRecord {
        let from = msg
            .from
            .as_ref()
            .map(Self::to_address)
            .unwrap_or_else(|| Address::new(""));
        let to_recipients = msg
            .to_recipients
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Self::to_address)
            .collect();
        let cc_recipients = msg
            .cc_recipients
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Self::to_address)
            .collect();

        DetailRecord {
            id: ItemId::from(msg.id),
            subject: msg.subject.unwrap_or_default(),
            body: Self::to_body(msg.body),
            web_link: msg.web_link,
            kind: DetailKind::Message {
                from,
                received: msg.received_date_time.unwrap_or_else(Utc::now),
                is_read: msg.is_read.unwrap_or(false),
                to_recipients,
                cc_recipients,
            },
        }
    }

    /// Converts a Graph event to a list item. List times come back in UTC.
    fn event_to_item(event: GraphEvent) -> ListItem {
        let start = event
            .start
            .as_ref()
            .and_then(|dt| parse_local_datetime(&dt.date_time))
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        let end = event
            .end
            .as_ref()
            .and_then(|dt| parse_local_datetime(&dt.date_time))
            .map(|dt| dt.and_utc())
            .unwrap_or(start);

        ListItem {
            id: ItemId::from(event.id),
            title: event.subject.unwrap_or_default(),
            preview: event.body_preview.unwrap_or_default(),
            timestamp: start,
            web_link: event.web_link,
            kind: ItemKind::Event(EventMeta {
                start,
                end,
                location: event.location.and_then(|l| l.display_name),
                show_as: event.show_as.unwrap_or_default(),
                is_all_day: event.is_all_day.unwrap_or(false),
            }),
        }
    }

    /// Converts a Graph event to a detail record. Detail times are local to
    /// the time zone the request asked for.
    fn event_to_detail(event: GraphEvent, requested_time_zone: &str) -> DetailRecord {
        let start = event
            .start
            .as_ref()
            .and_then(|dt| parse_local_datetime(&dt.date_time))
            .unwrap_or_else(|| Utc::now().naive_utc());
        let end = event
            .end
            .as_ref()
            .and_then(|dt| parse_local_datetime(&dt.date_time))
            .unwrap_or(start);
        let time_zone = event
            .start
            .and_then(|dt| dt.time_zone)
            .unwrap_or_else(|| requested_time_zone.to_string());

        DetailRecord {
            id: ItemId::from(event.id),
            subject: event.subject.unwrap_or_default(),
            body: Self::to_body(event.body),
            web_link: event.web_link,
            kind: DetailKind::Event {
                start,
                end,
                time_zone,
                location: event.location.and_then(|l| l.display_name),
            },
        }
    }

    /// Extracts the due date from a task's due wrapper.
    fn task_due(task: &GraphTask) -> Option<NaiveDate> {
        task.due_date_time
            .as_ref()
            .and_then(|dt| parse_local_datetime(&dt.date_time))
            .map(|dt| dt.date())
    }

    /// Converts a Graph task to a list item.
    fn task_to_item(task: GraphTask) -> ListItem {
        let due = Self::task_due(&task);
        let timestamp = due
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .or(task.created_date_time)
            .unwrap_or_else(Utc::now);

        ListItem {
            web_link: Some(task_web_link(&task.id)),
            id: ItemId::from(task.id),
            title: task.title.unwrap_or_default(),
            preview: String::new(),
            timestamp,
            kind: ItemKind::Task(TaskMeta {
                status: task.status.unwrap_or_default(),
                importance: task.importance.unwrap_or_default(),
                due,
            }),
        }
    }

    /// Converts a Graph task to a detail record.
    fn task_to_detail(task: GraphTask) -> DetailRecord {
        let due = Self::task_due(&task);
        DetailRecord {
            web_link: Some(task_web_link(&task.id)),
            id: ItemId::from(task.id),
            subject: task.title.unwrap_or_default(),
            body: Self::to_body(task.body),
            kind: DetailKind::Task {
                status: task.status.unwrap_or_default(),
                importance: task.importance.unwrap_or_default(),
                due,
            },
        }
    }
}

#[async_trait]
impl RemoteSource for GraphSource {
    async fn fetch_items(&self, resource: &Resource, query: &ItemQuery) -> Result<Vec<ListItem>> {
        let url = self.collection_url(resource, query)?;

        let items = match resource {
            Resource::Mail => {
                let response: Collection<GraphMessage> = self.get(url, None).await?;
                response
                    .value
                    .unwrap_or_default()
                    .into_iter()
                    .map(Self::message_to_item)
                    .collect()
            }
            Resource::Calendar => {
                let response: Collection<GraphEvent> = self.get(url, None).await?;
                response
                    .value
                    .unwrap_or_default()
                    .into_iter()
                    .map(Self::event_to_item)
                    .collect()
            }
            Resource::Tasks { .. } => {
                let response: Collection<GraphTask> = self.get(url, None).await?;
                response
                    .value
                    .unwrap_or_default()
                    .into_iter()
                    .map(Self::task_to_item)
                    .collect()
            }
        };

        Ok(items)
    }

    async fn fetch_detail(
        &self,
        resource: &Resource,
        id: &ItemId,
        time_zone: Option<&str>,
    ) -> Result<DetailRecord> {
        let mut url = self.endpoint(&Self::detail_path(resource, id))?;

        match resource {
            Resource::Mail => {
                url.query_pairs_mut().append_pair("$select", MAIL_DETAIL_FIELDS);
                let message: GraphMessage = self.get(url, None).await?;
                Ok(Self::message_to_detail(message))
            }
            Resource::Calendar => {
                let requested = time_zone.unwrap_or("UTC");
                let mut headers = HeaderMap::new();
                headers.insert(
                    "Prefer",
                    HeaderValue::from_str(&format!("outlook.timezone=\"{requested}\""))
                        .map_err(|e| ProviderError::Internal(format!("invalid header: {e}")))?,
                );
                let event: GraphEvent = self.get(url, Some(headers)).await?;
                Ok(Self::event_to_detail(event, requested))
            }
            Resource::Tasks { .. } => {
                let task: GraphTask = self.get(url, None).await?;
                Ok(Self::task_to_detail(task))
            }
        }
    }

    async fn fetch_mailbox_time_zone(&self) -> Result<String> {
        let url = self.endpoint("me/mailboxSettings")?;
        let settings: GraphMailboxSettings = self.get(url, None).await?;
        Ok(settings.time_zone.unwrap_or_else(|| "UTC".to_string()))
    }

    async fn fetch_task_lists(&self) -> Result<Vec<TaskList>> {
        let url = self.endpoint("me/todo/lists")?;
        let response: Collection<GraphTaskList> = self.get(url, None).await?;

        Ok(response
            .value
            .unwrap_or_default()
            .into_iter()
            .map(|list| TaskList {
                id: TaskListId::from(list.id),
                display_name: list.display_name.unwrap_or_default(),
                wellknown_list_name: list.wellknown_list_name,
            })
            .collect())
    }

    async fn update_item(&self, resource: &Resource, id: &ItemId, patch: &ItemPatch) -> Result<()> {
        let url = self.endpoint(&Self::mutation_path(resource, id))?;
        self.patch_no_response(url, &patch_body(patch)).await?;
        tracing::debug!(item = %id, ?patch, "remote item updated");
        Ok(())
    }

    async fn delete_item(&self, resource: &Resource, id: &ItemId) -> Result<()> {
        let url = self.endpoint(&Self::mutation_path(resource, id))?;
        self.delete_no_response(url).await?;
        tracing::debug!(item = %id, "remote item deleted");
        Ok(())
    }
}
