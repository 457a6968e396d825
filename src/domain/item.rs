//! List and detail record types.
//!
//! A [`ListItem`] is the summary record shown in the panel list; it is
//! replaced wholesale on every refresh. A [`DetailRecord`] is the expanded
//! form fetched on demand when an item is selected, held only while the
//! detail view is open.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ItemId, TaskListId};

/// An address with optional display name, as carried by message headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// The raw address.
    pub address: String,
    /// Display name, when the source provides one.
    pub name: Option<String>,
}

impl Address {
    /// Creates an address with no display name.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    /// Creates an address with a display name.
    pub fn with_name(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: Some(name.into()),
        }
    }

    /// Returns the name when present, the address otherwise.
    pub fn display(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }
}

/// Message/task importance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// Low importance.
    Low,
    /// Normal importance.
    #[default]
    Normal,
    /// High importance.
    High,
}

impl Importance {
    /// The opposite end of the importance toggle used by the tasks panel:
    /// normal and low flip to high, high flips back to normal.
    pub fn toggled(&self) -> Importance {
        match self {
            Importance::High => Importance::Normal,
            _ => Importance::High,
        }
    }
}

/// Follow-up flag state on a mail message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlagStatus {
    /// No flag set.
    #[default]
    NotFlagged,
    /// Follow-up completed.
    Complete,
    /// Flagged for follow-up.
    Flagged,
}

/// Completion state of a to-do task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    NotStarted,
    /// Work in progress.
    InProgress,
    /// Done.
    Completed,
    /// Blocked on someone else.
    WaitingOnOthers,
    /// Deferred to later.
    Deferred,
}

/// Free/busy status of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShowAs {
    /// Free.
    Free,
    /// Tentatively accepted.
    Tentative,
    /// Busy.
    #[default]
    Busy,
    /// Out of office.
    Oof,
    /// Working elsewhere.
    WorkingElsewhere,
    /// Any status this crate does not recognize.
    #[serde(other)]
    Unknown,
}

/// Summary fields specific to a mail message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMeta {
    /// Sender address.
    pub from: Address,
    /// Whether the message has been read.
    pub is_read: bool,
    /// Importance marker.
    pub importance: Importance,
    /// Follow-up flag state.
    pub flag_status: FlagStatus,
    /// Whether the message carries attachments.
    pub has_attachments: bool,
}

/// Summary fields specific to a calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMeta {
    /// Event start.
    pub start: DateTime<Utc>,
    /// Event end.
    pub end: DateTime<Utc>,
    /// Location display name, when set.
    pub location: Option<String>,
    /// Free/busy status.
    pub show_as: ShowAs,
    /// Whether the event spans the whole day.
    pub is_all_day: bool,
}

/// Summary fields specific to a to-do task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMeta {
    /// Completion state.
    pub status: TaskStatus,
    /// Importance marker (drives the star toggle).
    pub importance: Importance,
    /// Due date, when one is set.
    pub due: Option<NaiveDate>,
}

/// Resource-specific summary fields of a [`ListItem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// A mail message.
    Message(MessageMeta),
    /// A calendar event.
    Event(EventMeta),
    /// A to-do task.
    Task(TaskMeta),
}

/// A summary record shown in the panel list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Opaque identifier assigned by the remote source.
    pub id: ItemId,
    /// Subject or title; may be empty.
    pub title: String,
    /// Short preview of the content, empty when the source has none.
    pub preview: String,
    /// Primary timestamp: received time, event start, or due date.
    pub timestamp: DateTime<Utc>,
    /// Link to the full content in the remote UI.
    pub web_link: Option<String>,
    /// Resource-specific fields.
    pub kind: ItemKind,
}

impl ListItem {
    /// Returns the message metadata when this item is a mail message.
    pub fn as_message(&self) -> Option<&MessageMeta> {
        match &self.kind {
            ItemKind::Message(meta) => Some(meta),
            _ => None,
        }
    }

    /// Returns the event metadata when this item is a calendar event.
    pub fn as_event(&self) -> Option<&EventMeta> {
        match &self.kind {
            ItemKind::Event(meta) => Some(meta),
            _ => None,
        }
    }

    /// Returns the task metadata when this item is a to-do task.
    pub fn as_task(&self) -> Option<&TaskMeta> {
        match &self.kind {
            ItemKind::Task(meta) => Some(meta),
            _ => None,
        }
    }
}

/// Body content type of a detail record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    /// Plain text body.
    #[default]
    Text,
    /// HTML body.
    Html,
}

/// Body content of a detail record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BodyContent {
    /// Whether the content is plain text or HTML.
    pub content_type: BodyType,
    /// The content itself.
    pub content: String,
}

/// Resource-specific fields of a [`DetailRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailKind {
    /// Expanded mail message: adds recipients to the summary fields.
    Message {
        /// Sender address.
        from: Address,
        /// When the message arrived.
        received: DateTime<Utc>,
        /// Whether the message has been read.
        is_read: bool,
        /// Primary recipients.
        to_recipients: Vec<Address>,
        /// Carbon-copy recipients.
        cc_recipients: Vec<Address>,
    },
    /// Expanded calendar event. Times are local to `time_zone`, which is the
    /// viewer's configured mailbox time zone looked up before the fetch.
    Event {
        /// Localized event start.
        start: NaiveDateTime,
        /// Localized event end.
        end: NaiveDateTime,
        /// The time zone the times are expressed in.
        time_zone: String,
        /// Location display name, when set.
        location: Option<String>,
    },
    /// Expanded to-do task.
    Task {
        /// Completion state.
        status: TaskStatus,
        /// Importance marker.
        importance: Importance,
        /// Due date, when one is set.
        due: Option<NaiveDate>,
    },
}

/// The expanded record shown in the detail flyout.
///
/// Fetched on demand when an item is selected and discarded when the detail
/// view is dismissed; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    /// Opaque identifier, same namespace as the list item's.
    pub id: ItemId,
    /// Subject or title.
    pub subject: String,
    /// Full body content.
    pub body: BodyContent,
    /// Link to the full content in the remote UI.
    pub web_link: Option<String>,
    /// Resource-specific fields.
    pub kind: DetailKind,
}

/// A remote to-do task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    /// Opaque list identifier.
    pub id: TaskListId,
    /// Display name.
    pub display_name: String,
    /// Well-known name for built-in lists, e.g. `defaultList`.
    pub wellknown_list_name: Option<String>,
}

impl TaskList {
    /// Whether this is the account's built-in default list.
    pub fn is_default(&self) -> bool {
        self.wellknown_list_name.as_deref() == Some("defaultList")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_display_prefers_name() {
        let addr = Address::with_name("megan@contoso.com", "Megan Bowen");
        assert_eq!(addr.display(), "Megan Bowen");
    }

    #[test]
    fn address_display_falls_back_to_address() {
        let addr = Address::new("megan@contoso.com");
        assert_eq!(addr.display(), "megan@contoso.com");
    }

    #[test]
    fn importance_toggle_round_trip() {
        assert_eq!(Importance::Normal.toggled(), Importance::High);
        assert_eq!(Importance::High.toggled(), Importance::Normal);
        assert_eq!(Importance::Low.toggled(), Importance::High);
    }

    #[test]
    fn importance_wire_names() {
        let json = serde_json::to_string(&Importance::High).unwrap();
        assert_eq!(json, "\"high\"");

        let parsed: Importance = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, Importance::Low);
    }

    #[test]
    fn flag_status_wire_names() {
        let parsed: FlagStatus = serde_json::from_str("\"notFlagged\"").unwrap();
        assert_eq!(parsed, FlagStatus::NotFlagged);

        let parsed: FlagStatus = serde_json::from_str("\"flagged\"").unwrap();
        assert_eq!(parsed, FlagStatus::Flagged);
    }

    #[test]
    fn task_status_wire_names() {
        let parsed: TaskStatus = serde_json::from_str("\"notStarted\"").unwrap();
        assert_eq!(parsed, TaskStatus::NotStarted);

        let json = serde_json::to_string(&TaskStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }

    #[test]
    fn show_as_unknown_catch_all() {
        let parsed: ShowAs = serde_json::from_str("\"somethingNew\"").unwrap();
        assert_eq!(parsed, ShowAs::Unknown);

        let parsed: ShowAs = serde_json::from_str("\"workingElsewhere\"").unwrap();
        assert_eq!(parsed, ShowAs::WorkingElsewhere);
    }

    #[test]
    fn list_item_kind_accessors() {
        let item = ListItem {
            id: ItemId::from("msg-1"),
            title: "Status report".to_string(),
            preview: String::new(),
            timestamp: Utc::now(),
            web_link: None,
            kind: ItemKind::Message(MessageMeta {
                from: Address::new("megan@contoso.com"),
                is_read: false,
                importance: Importance::Normal,
                flag_status: FlagStatus::NotFlagged,
                has_attachments: false,
            }),
        };

        assert!(item.as_message().is_some());
        assert!(item.as_event().is_none());
        assert!(item.as_task().is_none());
    }

    #[test]
    fn task_list_default_detection() {
        let default_list = TaskList {
            id: TaskListId::from("list-1"),
            display_name: "Tasks".to_string(),
            wellknown_list_name: Some("defaultList".to_string()),
        };
        let flagged = TaskList {
            id: TaskListId::from("list-2"),
            display_name: "Flagged Emails".to_string(),
            wellknown_list_name: Some("flaggedEmails".to_string()),
        };
        let custom = TaskList {
            id: TaskListId::from("list-3"),
            display_name: "Groceries".to_string(),
            wellknown_list_name: None,
        };

        assert!(default_list.is_default());
        assert!(!flagged.is_default());
        assert!(!custom.is_default());
    }
}
